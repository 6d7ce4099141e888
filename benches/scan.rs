use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use leadmatch::{scan, scan_with, Blocking, Lead, LeadId, MatcherConfig, ScanOptions};

const STATES: &[&str] = &["AL", "GA", "TN", "MS", "FL"];
const STEMS: &[&str] = &[
    "Jefferson County",
    "Montgomery Parks",
    "Baldwin Schools",
    "Mobile Water Works",
    "Shelby Sheriff",
    "Tuscaloosa Transit",
    "Madison Public Library",
    "Morgan Health",
];

/// Deterministic synthetic table: every eighth lead is a near-duplicate
/// ("Dept" suffix) of an earlier one, so the matcher does real work instead
/// of rejecting everything at the state gate.
fn synthetic_leads(n: usize) -> Vec<Lead> {
    (0..n)
        .map(|i| {
            let stem = STEMS[i % STEMS.len()];
            let state = STATES[(i / STEMS.len()) % STATES.len()];
            let name = if i % 8 == 7 {
                format!("{stem} Dept")
            } else {
                format!("{stem} {i}")
            };
            Lead::with_id(LeadId::new(i as i64 + 1), name, state)
        })
        .collect()
}

fn bench_full_scan(c: &mut Criterion) {
    let config = MatcherConfig::default();
    let mut group = c.benchmark_group("scan/full");

    for &n in &[100usize, 250, 500] {
        let leads = synthetic_leads(n);
        let pairs = (n * (n - 1) / 2) as u64;
        group.throughput(Throughput::Elements(pairs));
        group.bench_with_input(BenchmarkId::from_parameter(n), &leads, |b, leads| {
            b.iter(|| scan(leads, &config));
        });
    }
    group.finish();
}

fn bench_blocked_scan(c: &mut Criterion) {
    let config = MatcherConfig::default();
    let options = ScanOptions {
        blocking: Blocking::StatePrefix { prefix_len: 4 },
    };
    let mut group = c.benchmark_group("scan/blocked");

    for &n in &[100usize, 250, 500] {
        let leads = synthetic_leads(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &leads, |b, leads| {
            b.iter(|| scan_with(leads, &config, options));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_full_scan, bench_blocked_scan);
criterion_main!(benches);
