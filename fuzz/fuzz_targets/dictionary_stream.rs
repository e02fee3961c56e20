#![no_main]

use codec::{decode_dictionary_with_header, encode_dictionary, Alphabet, Corpus};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // First byte picks the word length, the rest is split into words.
    let Some((&len, rest)) = data.split_first() else {
        return;
    };
    let word_len = usize::from(len % 8) + 1;
    let words: Vec<String> = rest
        .chunks_exact(word_len)
        .map(|chunk| chunk.iter().map(|&b| char::from(b'A' + b % 4)).collect())
        .collect();
    let Ok(corpus) = Corpus::new(Alphabet::latin_uppercase(), word_len, &words) else {
        return;
    };

    let artifact = encode_dictionary(&corpus).expect("small corpora encode");
    let decoded = decode_dictionary_with_header(&artifact.header, &artifact.tables, &artifact.data)
        .expect("fresh artifact decodes");
    assert_eq!(decoded, corpus.to_strings());

    // Flip one data bit, reseal, and require a clean result either way.
    if let Some(first) = artifact.data.first() {
        let mut data = artifact.data.clone();
        data[0] = first ^ (rest.first().copied().unwrap_or(1) | 1);
        if let Ok(header) = artifact.header.clone().seal(&artifact.tables, &data) {
            let _ = decode_dictionary_with_header(&header, &artifact.tables, &data);
        }
    }
});
