//! Criterion benchmarks for the Magpie search engine.
//!
//! Covers the hot paths a host exercises continuously:
//! - Text analysis and tokenization
//! - Incremental indexing
//! - Query execution (exact, fuzzy, multi-term)
//! - Edit distance for fuzzy expansion

use std::hint::black_box;
use std::sync::Arc;

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use magpie::analysis::{Analyzer, note_analyzer};
use magpie::config::SearchConfig;
use magpie::engine::SearchEngine;
use magpie::index::IndexEngine;
use magpie::search::SearchScope;
use magpie::util::levenshtein::damerau_levenshtein_within;
use magpie::vault::MemoryVault;

const VOCABULARY: &[&str] = &[
    "garden", "tomato", "harvest", "meeting", "project", "deadline", "recipe", "butter",
    "morning", "journal", "travel", "harbor", "lantern", "archive", "sketch", "piano",
    "practice", "weather", "autumn", "birding", "magpie", "feather", "library", "borrow",
    "return", "kitchen", "simmer", "notebook", "pencil", "ledger", "balance", "window",
    "stretch", "routine", "compost", "seedling", "trellis", "almanac", "thread", "needle",
];

/// Generate a deterministic corpus of `(path, content)` notes.
fn generate_notes(count: usize) -> Vec<(String, String)> {
    let mut rng = StdRng::seed_from_u64(42);
    let mut notes = Vec::with_capacity(count);

    for i in 0..count {
        let word_count = rng.random_range(50..150);
        let mut words = Vec::with_capacity(word_count + 2);

        if i % 3 == 0 {
            let heading = VOCABULARY[rng.random_range(0..VOCABULARY.len())];
            words.push(format!("# Notes on {heading}\n"));
        }
        for _ in 0..word_count {
            words.push(VOCABULARY[rng.random_range(0..VOCABULARY.len())].to_string());
        }

        notes.push((format!("notes/note{i:04}.md"), words.join(" ")));
    }

    notes
}

/// Build a ready engine over a generated corpus.
fn ready_engine(count: usize) -> (SearchEngine, SearchConfig) {
    let vault = Arc::new(MemoryVault::from_notes(generate_notes(count)));
    let engine = SearchEngine::new(vault);
    let config = SearchConfig::default();
    engine.start_build(&config).unwrap();
    engine.build_until_ready(&config).unwrap();
    (engine, config)
}

/// Benchmark text analysis and tokenization.
fn bench_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("analysis");

    let analyzer = note_analyzer();
    let notes = generate_notes(100);

    group.bench_function("analyze_single_note", |b| {
        b.iter(|| {
            let tokens: Vec<_> = analyzer
                .analyze(black_box(notes[0].1.as_str()))
                .unwrap()
                .collect();
            black_box(tokens)
        })
    });

    group.throughput(Throughput::Elements(notes.len() as u64));
    group.bench_function("analyze_batch_notes", |b| {
        b.iter(|| {
            for (_, content) in &notes {
                let tokens: Vec<_> = analyzer.analyze(black_box(content.as_str())).unwrap().collect();
                black_box(tokens);
            }
        })
    });

    group.finish();
}

/// Benchmark index mutation.
fn bench_indexing(c: &mut Criterion) {
    let mut group = c.benchmark_group("indexing");
    group.sample_size(20);

    let notes = generate_notes(100);
    let config = SearchConfig::default();

    group.throughput(Throughput::Elements(notes.len() as u64));
    group.bench_function("index_100_notes", |b| {
        b.iter_with_setup(IndexEngine::new, |engine| {
            for (path, content) in &notes {
                engine.add_or_update(path, content, &config).unwrap();
            }
            black_box(engine);
        })
    });

    // Repeated update of one note, the steady-state editing path.
    let engine = IndexEngine::new();
    for (path, content) in &notes {
        engine.add_or_update(path, content, &config).unwrap();
    }
    group.throughput(Throughput::Elements(1));
    group.bench_function("update_one_note", |b| {
        b.iter(|| {
            engine
                .add_or_update(black_box(&notes[0].0), black_box(&notes[0].1), &config)
                .unwrap();
        })
    });

    group.finish();
}

/// Benchmark query execution against a built index.
fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");

    let (engine, config) = ready_engine(1000);

    group.bench_function("exact_single_term", |b| {
        b.iter(|| {
            let hits = engine
                .search(black_box("tomato"), &SearchScope::Vault, &config)
                .unwrap();
            black_box(hits)
        })
    });

    group.bench_function("fuzzy_typo_term", |b| {
        b.iter(|| {
            let hits = engine
                .search(black_box("tomatto"), &SearchScope::Vault, &config)
                .unwrap();
            black_box(hits)
        })
    });

    group.bench_function("two_term_query", |b| {
        b.iter(|| {
            let hits = engine
                .search(black_box("garden harvest"), &SearchScope::Vault, &config)
                .unwrap();
            black_box(hits)
        })
    });

    group.finish();
}

/// Benchmark the bounded edit distance used by fuzzy expansion.
fn bench_edit_distance(c: &mut Criterion) {
    let mut group = c.benchmark_group("edit_distance");

    let pairs: Vec<(&str, &str)> = VOCABULARY
        .iter()
        .zip(VOCABULARY.iter().skip(1))
        .map(|(a, b)| (*a, *b))
        .collect();

    group.throughput(Throughput::Elements(pairs.len() as u64));
    group.bench_function("damerau_within_two", |b| {
        b.iter(|| {
            for (a, w) in &pairs {
                black_box(damerau_levenshtein_within(black_box(a), black_box(w), 2));
            }
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_analysis,
    bench_indexing,
    bench_search,
    bench_edit_distance
);

criterion_main!(benches);
