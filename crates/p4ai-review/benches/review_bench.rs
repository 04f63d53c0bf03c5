// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use p4ai_perforce::{FileAction, FileChange};
use p4ai_review::prelude::*;

fn sample_files(count: usize, lines: usize) -> Vec<FileChange> {
    (0..count)
        .map(|i| {
            let mut file = FileChange::new(format!("//depot/bench/f{i}.cpp"), 1, FileAction::Edit);
            file.set_both_diffs(vec!["+bench line"; lines].join("\n"));
            file
        })
        .collect()
}

fn sample_responses(count: usize) -> Vec<ReviewResponse> {
    (0..count)
        .map(|i| ReviewResponse {
            success: i % 7 != 0,
            overall_score: 60 + (i % 40) as i64,
            summary: format!("batch {i}"),
            comments: (0..20)
                .map(|c| ReviewComment {
                    file_path: format!("//depot/bench/f{c}.cpp"),
                    line_number: c,
                    severity: Severity::ALL[c as usize % 4],
                    category: "bug".into(),
                    message: "finding".into(),
                    suggestion: None,
                })
                .collect(),
            ..ReviewResponse::default()
        })
        .collect()
}

fn planner_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("planner");

    for size in [25, 250, 2500].iter() {
        let files = sample_files(*size, 60);
        group.bench_with_input(BenchmarkId::new("plan", size), size, |b, _| {
            b.iter(|| BatchPlanner::default().plan(std::hint::black_box(&files)).len())
        });
    }

    group.finish();
}

fn merger_benchmarks(c: &mut Criterion) {
    let responses = sample_responses(50);
    c.bench_function("merge_50_batches", |b| {
        b.iter(|| ReviewMerger::default().merge(std::hint::black_box(&responses)))
    });
}

criterion_group!(benches, planner_benchmarks, merger_benchmarks);
criterion_main!(benches);
