//! Benchmarks for full rule-set scans
//!
//! These benchmarks measure a whole scan over synthetic posts, sequential
//! against parallel, and the candidate scan with consolidation.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use sourcelint_core::Config;
use sourcelint_engine::{IncompleteScanner, PostSources, RuleSet};

const SOURCE_SHAPES: &[&str] = &[
    "https://www.furaffinity.net/view/{n}/",
    "https://d.facdn.net/art/artist{n}/{n}/{n}.artist{n}_pic.png",
    "twitter.com/user{n}",
    "https://pbs.twimg.com/media/ABC{n}.jpg:orig",
    "http://www.furaffinity.net/user/artist{n}/",
    "https://vxtwitter.com/user{n}/status/{n}?s=20",
    "canine fox male solo digital_media_(artwork) sitting smiling looking_at_viewer {n}",
    "https://artist{n}.deviantart.com/art/Thing-{n}",
];

/// Generate N posts with two or three sources each
fn generate_posts(count: usize) -> Vec<PostSources> {
    (0..count)
        .map(|i| {
            let sources: Vec<String> = (0..2 + i % 2)
                .map(|j| SOURCE_SHAPES[(i + j * 3) % SOURCE_SHAPES.len()].replace("{n}", &i.to_string()))
                .collect();
            PostSources::from_sources(i.to_string(), &sources)
        })
        .collect()
}

fn bench_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan");
    let config = Config::default();

    for size in [100, 1_000, 10_000] {
        let posts = generate_posts(size);

        let sequential = RuleSet::from_config(&config).unwrap().with_parallel(false);
        group.bench_with_input(BenchmarkId::new("sequential", size), &posts, |b, posts| {
            b.iter(|| sequential.scan(black_box(posts)).unwrap())
        });

        let parallel = RuleSet::from_config(&config).unwrap();
        group.bench_with_input(BenchmarkId::new("parallel", size), &posts, |b, posts| {
            b.iter(|| parallel.scan(black_box(posts)).unwrap())
        });
    }

    group.finish();
}

fn bench_candidates(c: &mut Criterion) {
    let posts = generate_posts(1_000);
    let scanner = IncompleteScanner::from_config(&Config::default());

    c.bench_function("candidates_1000", |b| {
        b.iter(|| {
            let issues = scanner.scan(black_box(&posts)).unwrap();
            issues.values().map(|i| i.unique_match_info().len()).sum::<usize>()
        })
    });
}

criterion_group!(benches, bench_scan, bench_candidates);
criterion_main!(benches);
