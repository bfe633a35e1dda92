use criterion::{black_box, Criterion};

use minibase::codec;

use super::{gen_tuples, movie_schema};

const CHUNK_SIZE: usize = 64;

pub fn bench_encoding(c: &mut Criterion) {
    let schema = movie_schema();
    let tuples = gen_tuples(CHUNK_SIZE);
    c.bench_function("encoding/pack_tuple", |b| {
        b.iter(|| {
            for tuple in &tuples {
                black_box(codec::pack_tuple(&schema, tuple));
            }
        })
    });

    let rows: Vec<Vec<u8>> = tuples
        .iter()
        .map(|tuple| codec::pack_tuple(&schema, tuple))
        .collect();
    c.bench_function("encoding/unpack_tuple", |b| {
        b.iter(|| {
            for row in &rows {
                black_box(codec::unpack_tuple(&schema, row).expect("packed row"));
            }
        })
    });
}
