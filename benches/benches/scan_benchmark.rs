//! Directive parsing and file pre-analysis benchmarks.
//!
//! Run with: `cargo bench --package m73eta-bench`

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use m73eta_bench::GcodeFixture;
use m73eta_lib::{
    FilePreAnalyzer, LiveEstimateTracker, NoBaseAnalysis, PrintMode, parse_line, remaining_time,
};
use std::hint::black_box;

fn parse_benchmark(c: &mut Criterion) {
    let lines = [
        ("directive", "M73 P45 R120 Q44 S131"),
        ("motion", "G1 X102.45 Y88.1 E0.0412 ; perimeter"),
        ("comment", "; M73 P45 R120"),
    ];

    let mut group = c.benchmark_group("parse_line");
    for (name, line) in lines {
        group.bench_with_input(BenchmarkId::from_parameter(name), line, |b, line| {
            b.iter(|| {
                parse_line(black_box(line)).map(|directive| directive.remaining_times().count())
            });
        });
    }
    group.finish();
}

fn tracker_benchmark(c: &mut Criterion) {
    let text = GcodeFixture::periodic(10_000, 100).render();
    let (writer, _reader) = remaining_time();
    let tracker = LiveEstimateTracker::new(writer);

    let mut group = c.benchmark_group("tracker");
    group.throughput(Throughput::Elements(10_000));
    group.bench_function("observe_10k_lines", |b| {
        b.iter(|| {
            for line in text.lines() {
                tracker.observe(black_box(line), PrintMode::Silent);
            }
        });
    });
    group.finish();
}

fn analyze_benchmark(c: &mut Criterion) {
    let analyzer = FilePreAnalyzer::new(NoBaseAnalysis);
    let never = || false;

    let mut group = c.benchmark_group("analyze");
    group.sample_size(20);

    for lines in [10_000usize, 100_000] {
        let file = GcodeFixture::trailing_directives(lines)
            .write()
            .expect("write fixture");
        group.throughput(Throughput::Elements(lines as u64));
        group.bench_with_input(BenchmarkId::new("full_scan", lines), &file, |b, file| {
            b.iter(|| analyzer.analyze(file.path(), true, PrintMode::Silent, &never));
        });
    }
    group.finish();
}

criterion_group!(benches, parse_benchmark, tracker_benchmark, analyze_benchmark);
criterion_main!(benches);
