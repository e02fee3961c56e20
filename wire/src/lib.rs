//! Artifact header layout and limits for the lexpack dictionary codec.
//!
//! A packed dictionary is persisted as three byte streams: the header defined
//! here, the table blob, and the data stream. This crate owns the header (the
//! metadata neither payload describes about itself), the limits enforced before
//! decoding, and the payload hash. It does not know how code tables or records
//! are laid out.
//!
//! # Design Principles
//!
//! - **Stable format** - The header is versioned and changes are documented.
//! - **Bounded decoding** - All length fields are validated against limits before allocation.
//! - **No codec knowledge** - This crate frames payloads, it does not parse them.
//!
//! See `FORMAT.md` for the complete layout.

mod error;
mod hash;
mod header;
mod limits;

pub use error::{AlphabetReason, DecodeError, EncodeError, LimitKind, Stream, WireResult};
pub use hash::payload_hash;
pub use header::{
    decode_header, encode_header, validate_alphabet, ArtifactHeader, HEADER_FIXED_SIZE, MAGIC,
    MAX_ALPHABET_LEN, VERSION,
};
pub use limits::Limits;
