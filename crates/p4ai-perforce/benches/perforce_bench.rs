// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use p4ai_perforce::{DiffVariant, parse_diff_dump, parse_summary};

/// Build `p4 describe -s` and `p4 describe -du3` output for `files` edits
fn sample_change(files: usize) -> (String, String) {
    let mut summary = String::from(
        "Change 4242 by bench@bench-ws on 2026/03/01 12:00:00 *submitted*\n\n\
         \tBenchmark change\n\tspanning several lines\n\nAffected files ...\n\n",
    );
    let mut dump = String::from("Differences ...\n\n");
    for i in 0..files {
        summary.push_str(&format!("... //depot/bench/src/file_{i}.cpp#{} edit\n", i + 1));
        dump.push_str(&format!("==== //depot/bench/src/file_{i}.cpp#{} (text) ====\n\n", i + 1));
        dump.push_str("@@ -10,7 +10,8 @@\n");
        for line in 0..40 {
            dump.push_str(&format!(" context line {line}\n"));
        }
        dump.push_str("-    old();\n+    new();\n+    extra();\n\n");
    }
    (summary, dump)
}

fn parser_benchmarks(c: &mut Criterion) {
    let (summary, dump) = sample_change(25);
    let mut group = c.benchmark_group("parser");

    group.bench_function("parse_summary_25", |b| {
        b.iter(|| parse_summary(std::hint::black_box(&summary), 4242))
    });

    group.bench_function("parse_diff_dump_25", |b| {
        let base = parse_summary(&summary, 4242);
        b.iter(|| {
            let mut record = base.clone();
            parse_diff_dump(std::hint::black_box(&dump), &mut record, DiffVariant::Short)
        })
    });

    group.finish();
}

fn scaling_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("scaling");

    for size in [10, 100, 1000].iter() {
        let (summary, dump) = sample_change(*size);
        group.bench_with_input(BenchmarkId::new("summary_and_dump", size), size, |b, _| {
            b.iter(|| {
                let mut record = parse_summary(&summary, 4242);
                parse_diff_dump(&dump, &mut record, DiffVariant::Short)
            })
        });
    }

    group.finish();
}

criterion_group!(benches, parser_benchmarks, scaling_benchmarks);
criterion_main!(benches);
