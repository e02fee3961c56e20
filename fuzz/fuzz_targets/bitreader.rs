#![no_main]

use bitstream::{BitBuf, BitReader};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut reader = BitReader::new(data);
    let mut idx = 0usize;

    while idx < data.len() && idx < 1024 {
        let op = data[idx] % 7;
        idx += 1;

        match op {
            0 => {
                let _ = reader.read_bit();
            }
            1 => {
                let bits = usize::from(data[idx - 1] % 65);
                let _ = reader.read_bits(bits);
            }
            2 => {
                let _ = reader.align_to_byte();
            }
            3 => {
                let _ = reader.read_u32_aligned();
            }
            4 => {
                let _ = reader.read_u16_aligned();
            }
            5 => {
                let len = usize::from(data[idx - 1] >> 3);
                let _ = reader.read_byte_slice(len);
            }
            _ => {
                let buf = BitBuf::from_bytes(data, data.len() * 8).unwrap_or_default();
                let n = usize::from(data[idx - 1]);
                if let Some(pos) = buf.nth_zero(n) {
                    assert_eq!(buf.count_zeros_before(pos), n);
                }
            }
        }
    }
});
