//! Benchmark for reading database text.

use criterion::{Criterion, Throughput};
use pvdb_rs::db::{parse_db, parse_db_strict};

/// The fixture blocks repeated under fresh ids.
fn large_db(copies: usize) -> String {
    let fixture = include_str!("../tests/files/fixture_pack.txt");
    let body: Vec<_> = fixture
        .lines()
        .filter(|line| line.starts_with("pv_"))
        .collect();
    (0..copies)
        .flat_map(|copy| {
            body.iter().map(move |line| {
                line.replacen("pv_801", &format!("pv_{:04}", copy * 2 + 1), 1)
                    .replacen("pv_802", &format!("pv_{:04}", copy * 2 + 2), 1)
            })
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn bench_parse_db(c: &mut Criterion) {
    let source = large_db(500);
    let mut group = c.benchmark_group("parse_db");
    group.throughput(Throughput::Bytes(source.len() as u64));

    group.bench_function("lenient", |b| {
        b.iter(|| parse_db(std::hint::black_box(&source)));
    });
    group.bench_function("strict", |b| {
        b.iter(|| parse_db_strict(std::hint::black_box(&source)));
    });

    group.finish();
}

fn main() {
    let mut criterion = Criterion::default();
    bench_parse_db(&mut criterion);
}
