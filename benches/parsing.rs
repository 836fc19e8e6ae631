use criterion::{Criterion, criterion_group, criterion_main};
use pefunds::report::render_presets;
use pefunds::sources::{CALPERS_DATA, DEFAULT_OPERS_LIMIT, SourceKind, load_source, split_columns};
use std::hint::black_box;

fn bench_split_columns(c: &mut Criterion) {
    let line = CALPERS_DATA.lines().nth(2).unwrap_or_default();
    c.bench_function("split_columns", |b| {
        b.iter(|| split_columns(black_box(line)));
    });
}

fn bench_calpers_pipeline(c: &mut Criterion) {
    c.bench_function("calpers_pipeline", |b| {
        b.iter(|| {
            let output = load_source(
                SourceKind::Calpers,
                black_box(CALPERS_DATA),
                DEFAULT_OPERS_LIMIT,
            )
            .expect("embedded table parses");
            render_presets(output.kind, &output.presets)
        });
    });
}

criterion_group!(benches, bench_split_columns, bench_calpers_pipeline);
criterion_main!(benches);
