//! Selection micro-benchmarks

use criterion::{Criterion, criterion_group, criterion_main};
use tabstore::array::TypedArray;
use tabstore::store::{OpenOptions, StoreType};
use tabstore::table::{IndexArray, RecordArray, SelectKey, Table};
use tempfile::TempDir;

const ROWS: usize = 10_000;

fn bench_table(dir: &TempDir) -> Table {
    let data = RecordArray::new(vec![
        (
            "id".to_string(),
            TypedArray::from_i64((0..ROWS as i64).collect()),
        ),
        (
            "value".to_string(),
            TypedArray::from_f64((0..ROWS).map(|i| i as f64).collect()),
        ),
    ]);
    Table::open(
        dir.path().join("bench.tbl"),
        Some(&data),
        StoreType::File,
        &OpenOptions::default(),
    )
    .unwrap()
}

fn bench_select_by_mask(c: &mut Criterion) {
    let dir = TempDir::new().unwrap();
    let table = bench_table(&dir);
    let mask: Vec<bool> = (0..ROWS).map(|i| i % 3 == 0).collect();

    c.bench_function("select_by_mask_10k", |b| {
        b.iter(|| table.select(SelectKey::ByMask(mask.clone())).unwrap())
    });
}

fn bench_select_by_index(c: &mut Criterion) {
    let dir = TempDir::new().unwrap();
    let table = bench_table(&dir);
    let indices: Vec<i64> = (0..ROWS as i64).step_by(3).collect();

    c.bench_function("select_by_index_10k", |b| {
        b.iter(|| {
            table
                .select(SelectKey::ByIndex(IndexArray::Int64(indices.clone())))
                .unwrap()
        })
    });
}

criterion_group!(benches, bench_select_by_mask, bench_select_by_index);
criterion_main!(benches);
