//! Index and join benchmarks for relcore
//!
//! Measures point inserts and lookups on both index structures, and the
//! keyed-probe join against the nested-loop join on the same data.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use relcore::{BPlusTree, IndexKind, LinearHashMap, NameSeq, Schema, Table, Tuple};

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("index_insert");

    for count in [1_000u64, 10_000].iter() {
        group.throughput(Throughput::Elements(*count));
        group.bench_with_input(BenchmarkId::new("bptree", count), count, |b, &count| {
            b.iter(|| {
                let mut tree = BPlusTree::new();
                for i in 0..count {
                    tree.put(black_box(i.wrapping_mul(2_654_435_761) % count), i);
                }
                tree
            });
        });
        group.bench_with_input(BenchmarkId::new("linear_hash", count), count, |b, &count| {
            b.iter(|| {
                let mut map = LinearHashMap::new();
                for i in 0..count {
                    map.put(black_box(i.wrapping_mul(2_654_435_761) % count), i);
                }
                map
            });
        });
    }

    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("index_lookup");
    let count = 10_000u64;

    let mut tree = BPlusTree::new();
    let mut map = LinearHashMap::new();
    for i in 0..count {
        tree.put(i, i);
        map.put(i, i);
    }

    group.throughput(Throughput::Elements(count));
    group.bench_function("bptree", |b| {
        b.iter(|| {
            for i in 0..count {
                black_box(tree.get(&i));
            }
        });
    });
    group.bench_function("linear_hash", |b| {
        b.iter(|| {
            for i in 0..count {
                black_box(map.get(&i));
            }
        });
    });

    group.finish();
}

fn tables(rows: i32, kind: IndexKind) -> (Table, Table, Table) {
    let fk_schema = Schema::from_names(&["id", "ref"], &["Integer", "Integer"]).unwrap();
    let pk_schema = Schema::from_names(&["key", "payload"], &["Integer", "String"]).unwrap();

    let mut fact = Table::with_index_kind("fact", fk_schema, &["id"], kind).unwrap();
    let mut dim = Table::with_index_kind("dim", pk_schema.clone(), &["key"], kind).unwrap();
    let mut dim_unkeyed = Table::with_index_kind("dim2", pk_schema, &["payload"], kind).unwrap();

    for i in 0..rows {
        let row: Tuple = vec![i.into(), (i % 100).into()];
        fact.insert(row).unwrap();
    }
    for i in 0..100 {
        let row: Tuple = vec![i.into(), format!("d{}", i).into()];
        dim.insert(row.clone()).unwrap();
        dim_unkeyed.insert(row).unwrap();
    }
    (fact, dim, dim_unkeyed)
}

fn bench_join(c: &mut Criterion) {
    let mut group = c.benchmark_group("equi_join");

    for kind in [IndexKind::tree(), IndexKind::linear_hash()] {
        let label = match kind {
            IndexKind::BPlusTree { .. } => "bptree",
            IndexKind::LinearHash { .. } => "linear_hash",
        };
        let (fact, dim, dim_unkeyed) = tables(2_000, kind);

        group.bench_function(BenchmarkId::new("keyed_probe", label), |b| {
            b.iter(|| {
                let mut names = NameSeq::new();
                fact.join(&["ref"], &["key"], &dim, &mut names).unwrap()
            });
        });
        group.bench_function(BenchmarkId::new("nested_loop", label), |b| {
            b.iter(|| {
                let mut names = NameSeq::new();
                fact.join(&["ref"], &["key"], &dim_unkeyed, &mut names).unwrap()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_insert, bench_lookup, bench_join);
criterion_main!(benches);
