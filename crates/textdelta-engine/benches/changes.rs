use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use textdelta_engine::{ChangeSetBuilder, CleanupPolicy, apply, reverse};
mod common;

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    group.sample_size(20);

    let source = common::generate_prose(100);
    let modified = common::edit_prose(&source, 3);
    let builder = ChangeSetBuilder::default();

    for policy in [
        CleanupPolicy::None,
        CleanupPolicy::Semantic,
        CleanupPolicy::Efficiency,
    ] {
        group.bench_function(format!("characters_{policy}"), |b| {
            b.iter(|| {
                builder.build_character_changes(black_box(&source), black_box(&modified), policy)
            });
        });
    }

    group.bench_function("lines", |b| {
        b.iter(|| builder.build_line_changes(black_box(&source), black_box(&modified)));
    });

    group.finish();
}

fn bench_apply_and_reverse(c: &mut Criterion) {
    let mut group = c.benchmark_group("replay");
    group.sample_size(20);

    let source = common::generate_prose(100);
    let modified = common::edit_prose(&source, 3);
    let changes = ChangeSetBuilder::default().build_character_changes(
        &source,
        &modified,
        CleanupPolicy::Efficiency,
    );

    group.bench_function("apply", |b| {
        b.iter(|| apply(black_box(&source), black_box(&changes)).unwrap());
    });

    group.bench_function("reverse", |b| {
        b.iter(|| reverse(black_box(&changes)).unwrap());
    });

    group.finish();
}

criterion_group!(benches, bench_build, bench_apply_and_reverse);
criterion_main!(benches);
