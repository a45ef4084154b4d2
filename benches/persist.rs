use criterion::{Criterion, criterion_group, criterion_main};
use polysurrogate::Polynomial;
use rand::{Rng as _, SeedableRng as _};
use std::hint::black_box;

fn make_polynomial() -> Polynomial {
    let mut rng = rand::rngs::SmallRng::seed_from_u64(9);
    let degrees = vec![5u32, 3, 4, 2];
    let num_coeffs = degrees.iter().map(|&d| d as usize + 1).product();
    let coeffs = (0..num_coeffs)
        .map(|_| rng.random_range(-1.0..1.0))
        .collect::<Vec<_>>();
    Polynomial::with_coefficients(degrees, coeffs).unwrap()
}

fn encode(c: &mut Criterion) {
    let poly = make_polynomial();
    c.bench_function("encode", |b| b.iter(|| black_box(poly.to_bytes().unwrap())));
}

fn decode(c: &mut Criterion) {
    let bytes = make_polynomial().to_bytes().unwrap();
    c.bench_function("decode", |b| {
        b.iter(|| black_box(Polynomial::from_bytes(black_box(&bytes)).unwrap()))
    });
}

criterion_group!(benches, encode, decode);
criterion_main!(benches);
