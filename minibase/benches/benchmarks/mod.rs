use minibase::{Domain, Schema, Value};
use rand::{Rng, SeedableRng};
use rand_xorshift::XorShiftRng;

pub mod encoding;
pub mod indexes;

const SEED: [u8; 16] = [100; 16];

pub(super) fn movie_schema() -> Schema {
    Schema::new(
        &[
            ("title", Domain::Str),
            ("year", Domain::I16),
            ("length", Domain::I32),
            ("rating", Domain::F64),
        ],
        &["title", "year"],
    )
    .expect("valid bench schema")
}

pub(super) fn gen_tuples(count: usize) -> Vec<Vec<Value>> {
    let mut rng = XorShiftRng::from_seed(SEED);
    (0..count)
        .map(|i| {
            vec![
                Value::Str(format!("movie_{:08}", i)),
                Value::I16(rng.gen_range(1920..2030)),
                Value::I32(rng.gen_range(60..240)),
                Value::F64(f64::from(rng.gen_range(0..100)) / 10.0),
            ]
        })
        .collect()
}
