//! Criterion benchmarks for the ingest hot path in `lc-core`.
//!
//! Logs are synthesized in memory so the numbers do not depend on disk.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use lc_config::AccumulatorSettings;
use lc_core::cycle::{fold_events, CostParams};
use lc_core::events::{classify_line, Event, LogReader};
use std::io::Cursor;

/// One engagement: three shots, a scrap drop and an item drop.
fn synthetic_log(engagements: usize) -> String {
    let mut log = String::new();
    for i in 0..engagements {
        let (m, s) = ((i / 60) % 60, i % 60);
        log.push_str(&format!(
            "2021-09-04 19:{m:02}:{s:02} [System] [] You inflicted 12.5 points of damage\n\
             2021-09-04 19:{m:02}:{s:02} [System] [] You missed\n\
             2021-09-04 19:{m:02}:{s:02} [System] [] Critical hit - Additional damage! You inflicted 30.0 points of damage\n\
             2021-09-04 19:{m:02}:{s:02} [System] [] You received Shrapnel x (1234) Value: 0.12 PED\n\
             2021-09-04 19:{m:02}:{s:02} [System] [] You received Animal Hide x (2) Value: 0.0400 PED\n"
        ));
    }
    log
}

fn bench_classify_line(c: &mut Criterion) {
    let lines = [
        ("hit", "2021-09-04 19:23:11 [System] [] You inflicted 12.5 points of damage"),
        ("loot", "2021-09-04 19:23:11 [System] [] You received Shrapnel x (1234) Value: 0.12 PED"),
        ("team", "2021-09-04 19:23:11 [Team] [] Alli Golden received Shrapnel (9373)"),
        ("other", "2021-09-04 19:23:11 [Local] [Someone] hello there"),
    ];

    let mut group = c.benchmark_group("classify_line");
    for (name, line) in lines {
        group.bench_with_input(BenchmarkId::from_parameter(name), &line, |b, input| {
            b.iter(|| black_box(classify_line(black_box(input))));
        });
    }
    group.finish();
}

fn bench_fold(c: &mut Criterion) {
    let settings = AccumulatorSettings::default();
    let cost = CostParams::new(0.05);

    let mut group = c.benchmark_group("accumulate");
    for engagements in [1_000usize, 10_000] {
        let log = synthetic_log(engagements);
        let events: Vec<Event> = log.lines().filter_map(classify_line).collect();
        group.throughput(Throughput::Elements(events.len() as u64));

        group.bench_with_input(
            BenchmarkId::new("fold_events", engagements),
            &events,
            |b, events| {
                b.iter(|| black_box(fold_events(events, &settings, cost)));
            },
        );
        group.bench_with_input(
            BenchmarkId::new("read_and_fold", engagements),
            &log,
            |b, log| {
                b.iter(|| {
                    let events: Vec<Event> = LogReader::new(Cursor::new(log.as_bytes()))
                        .filter_map(Result::ok)
                        .collect();
                    black_box(fold_events(&events, &settings, cost))
                });
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_classify_line, bench_fold);
criterion_main!(benches);
