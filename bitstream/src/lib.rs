//! Bit packing for the lexpack dictionary codec.
//!
//! Three pieces, none of which know anything about words or code tables:
//!
//! - [`BitWriter`] appends MSB-first bit fields and little-endian integers.
//! - [`BitReader`] reads them back from a borrowed slice with bounds checks.
//! - [`BitBuf`] is an owned bit string with the prefix queries front coding
//!   needs (first difference, zero counting, zero-padded ordering).
//!
//! Every operation is checked; malformed input yields a [`BitError`].
//!
//! ```
//! use bitstream::{BitReader, BitWriter};
//!
//! let mut writer = BitWriter::new();
//! writer.write_bits(0b110, 3).unwrap();
//! writer.align_to_byte();
//! writer.write_u16_aligned(513).unwrap();
//! let bytes = writer.finish();
//! assert_eq!(bytes, [0b1100_0000, 0x01, 0x02]);
//!
//! let mut reader = BitReader::new(&bytes);
//! assert_eq!(reader.read_bits(3).unwrap(), 0b110);
//! reader.align_to_byte().unwrap();
//! assert_eq!(reader.read_u16_aligned().unwrap(), 513);
//! ```

mod bitbuf;
mod error;
mod reader;
mod writer;

pub use bitbuf::{BitBuf, Iter as BitIter};
pub use error::{BitError, BitResult};
pub use reader::BitReader;
pub use writer::BitWriter;
