use criterion::{black_box, Criterion};

use minibase::{BPlusTree, ExtHashMap};

use super::{gen_tuples, movie_schema};

const ITEMS: usize = 1_000;

pub fn bench_indexes(c: &mut Criterion) {
    let schema = movie_schema();
    let keys: Vec<_> = gen_tuples(ITEMS)
        .iter()
        .map(|tuple| schema.key_of(tuple))
        .collect();

    c.bench_function("indexes/btree_put", |b| {
        b.iter(|| {
            let mut tree = BPlusTree::new();
            for (row, key) in keys.iter().enumerate() {
                tree.put(key.clone(), row);
            }
            black_box(tree.len())
        })
    });

    let mut tree = BPlusTree::new();
    for (row, key) in keys.iter().enumerate() {
        tree.put(key.clone(), row);
    }
    c.bench_function("indexes/btree_get", |b| {
        b.iter(|| {
            for key in &keys {
                black_box(tree.get(key));
            }
        })
    });

    c.bench_function("indexes/exthash_put", |b| {
        b.iter(|| {
            let mut map = ExtHashMap::new(2);
            for (row, key) in keys.iter().enumerate() {
                map.put(key.clone(), row);
            }
            black_box(map.population())
        })
    });

    let mut map = ExtHashMap::new(2);
    for (row, key) in keys.iter().enumerate() {
        map.put(key.clone(), row);
    }
    c.bench_function("indexes/exthash_get", |b| {
        b.iter(|| {
            for key in &keys {
                black_box(map.get(key));
            }
        })
    });
}
