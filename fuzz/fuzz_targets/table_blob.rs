#![no_main]

use codec::{decode_table, encode_table, TableId};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok((table, used)) = decode_table(data, TableId::Delta, 128) else {
        return;
    };

    // Anything that parses must serialize back to the bytes it came from.
    let bytes = encode_table(&table).expect("decoded table re-encodes");
    assert_eq!(bytes.as_slice(), &data[..used]);
});
