use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use textdelta_engine::{ChangeSetBuilder, CleanupPolicy, Selection, remap};
mod common;

fn bench_remap(c: &mut Criterion) {
    let mut group = c.benchmark_group("remap");
    group.sample_size(20);

    let source = common::generate_prose(200);
    let modified = common::edit_prose(&source, 2);
    let changes = ChangeSetBuilder::default().build_character_changes(
        &source,
        &modified,
        CleanupPolicy::Semantic,
    );
    let middle = source.chars().count() / 2;

    group.bench_function("caret", |b| {
        b.iter(|| remap(black_box(Selection::caret(middle)), black_box(&changes)).unwrap());
    });

    group.bench_function("selection", |b| {
        let selection = Selection::new(middle / 2, middle + middle / 2).unwrap();
        b.iter(|| remap(black_box(selection), black_box(&changes)).unwrap());
    });

    group.finish();
}

criterion_group!(benches, bench_remap);
criterion_main!(benches);
