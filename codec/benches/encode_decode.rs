use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

use codec::{decode_dictionary, encode_dictionary, Alphabet, Corpus, WireLimits};

const WORD_LEN: usize = 5;
const WORD_COUNT: usize = 20_000;

/// Deterministic pseudo-words with English-like letter skew.
fn generate_words(count: usize) -> Vec<String> {
    const COMMON: &[u8] = b"EEEEAAAARRRIIIOOOTTTNNNSSLLCCUDPMHGBFYWKVXZJQ";
    let mut state = 0x2545_F491_4F6C_DD1Du64;
    let mut words = Vec::with_capacity(count);
    while words.len() < count {
        let word: String = (0..WORD_LEN)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 7;
                state ^= state << 17;
                char::from(COMMON[(state % COMMON.len() as u64) as usize])
            })
            .collect();
        words.push(word);
    }
    words
}

fn bench_dictionary(c: &mut Criterion) {
    let words = generate_words(WORD_COUNT);
    let corpus = Corpus::new(Alphabet::latin_uppercase(), WORD_LEN, &words).unwrap();
    let artifact = encode_dictionary(&corpus).unwrap();
    let header = artifact.header_bytes().unwrap();

    let mut group = c.benchmark_group("dictionary");
    group.throughput(Throughput::Elements(corpus.len() as u64));

    group.bench_function("encode", |b| {
        b.iter(|| encode_dictionary(black_box(&corpus)).unwrap());
    });

    group.bench_function("decode", |b| {
        b.iter(|| {
            decode_dictionary(
                black_box(&header),
                black_box(&artifact.tables),
                black_box(&artifact.data),
                &WireLimits::default(),
            )
            .unwrap()
        });
    });

    group.finish();
}

criterion_group!(benches, bench_dictionary);
criterion_main!(benches);
