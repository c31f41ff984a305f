use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use sqlforge::column::{pk, varchar};
use sqlforge::sql::{Sql, SqlBuilder, param};
use sqlforge::{Column, Table, sql, table};

fn wide_table(n: usize) -> Table {
    let mut builder = table("Wide").column("id", pk());
    for i in 0..n {
        builder = builder.column(format!("col{i}"), varchar(50));
    }
    builder.build().unwrap()
}

fn columns(t: &Table) -> Vec<Column> {
    t.columns().to_vec()
}

/// `col0 = :col0 AND col1 = :col1 ...` built from nested fragments.
fn build_filter(columns: &[Column]) -> Sql {
    let parts = columns.iter().map(|c| sql!("{} = {}", c, param(c)));
    Sql::join(parts, " AND ")
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/build");

    for n in [1, 5, 10, 50, 100] {
        let cols = columns(&wide_table(n));
        group.bench_with_input(BenchmarkId::from_parameter(n), &cols, |b, cols| {
            b.iter(|| black_box(build_filter(cols)));
        });
    }

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/render");

    for n in [1, 5, 10, 50, 100] {
        let filter = build_filter(&columns(&wide_table(n)));
        group.bench_with_input(BenchmarkId::from_parameter(n), &filter, |b, filter| {
            b.iter(|| black_box(filter.to_string()));
        });
    }

    group.finish();
}

fn bench_splice(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/splice");

    for n in [5, 20, 100, 500] {
        let cols = columns(&wide_table(10));
        let fragment = build_filter(&cols);
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| {
                let mut builder = SqlBuilder::new();
                for i in 0..n {
                    if i > 0 {
                        builder.push(" OR ");
                    }
                    builder.push("(").push_sql(&fragment).push(")");
                }
                black_box(builder.build())
            });
        });
    }

    group.finish();
}

fn bench_inputs(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_builder/inputs");

    for n in [1, 10, 100] {
        let filter = build_filter(&columns(&wide_table(n)));
        group.bench_with_input(BenchmarkId::from_parameter(n), &filter, |b, filter| {
            b.iter(|| black_box(filter.inputs()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_build, bench_render, bench_splice, bench_inputs);
criterion_main!(benches);
