use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rs_gaddag::*;

use std::fs::File;
use std::io;

fn sample_gaddag() -> Gaddag {
    let words_reader = io::BufReader::new(
        File::open("../data/sample-words-shuffled.txt").expect("sample words should exist"),
    );
    let words = WordList::from_reader(words_reader).expect("sample words should be readable");
    Gaddag::from_bytes(build_gaddag(&words)).expect("built gaddag should load")
}

fn bench_find_words(c: &mut Criterion) {
    let gaddag = sample_gaddag();
    let mut group = c.benchmark_group("find_words");

    for text in ["retains", "retain?", "retai??", "stare"] {
        let rack: Rack = text.parse().expect("rack should parse");
        group.bench_with_input(BenchmarkId::new("use_all", text), &rack, |b, rack| {
            b.iter(|| find_words(&gaddag, black_box(rack), SearchMode::UseAll))
        });
        group.bench_with_input(BenchmarkId::new("subset", text), &rack, |b, rack| {
            b.iter(|| find_words(&gaddag, black_box(rack), SearchMode::Subset))
        });
    }
    group.finish();
}

fn bench_contains_word(c: &mut Criterion) {
    let gaddag = sample_gaddag();
    let word = encode_word("unimaginatively").expect("word should encode");

    c.bench_function("contains_word", |b| {
        b.iter(|| gaddag.contains_word(black_box(&word)))
    });
}

fn bench_batch(c: &mut Criterion) {
    let gaddag = sample_gaddag();
    let bag = TileBag::standard();
    let mut rng = StdRng::seed_from_u64(17);
    let racks: Vec<Rack> = (0..256).map(|_| bag.blank_rack(&mut rng, 1, 7)).collect();
    let mut group = c.benchmark_group("racks");

    group.bench_function("sequential", |b| {
        b.iter(|| {
            racks
                .iter()
                .map(|rack| find_words(&gaddag, rack, SearchMode::UseAll))
                .collect::<Vec<_>>()
        })
    });
    group.bench_function("batch", |b| {
        b.iter(|| find_words_batch(&gaddag, black_box(&racks), SearchMode::UseAll))
    });
    group.finish();
}

criterion_group!(benches, bench_find_words, bench_contains_word, bench_batch);
criterion_main!(benches);
