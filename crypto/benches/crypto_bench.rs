use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn id_generate_bench(c: &mut Criterion) {
    let gen = petition_crypto::IdGenerator::new("bench-secret");

    c.bench_function("id_generate", |b| b.iter(|| gen.generate()));
}

fn id_derive_bench(c: &mut Criterion) {
    let gen = petition_crypto::IdGenerator::new("bench-secret");
    let input = [0xABu8; 32];

    c.bench_function("id_derive_32B", |b| {
        b.iter(|| gen.derive(black_box(&input)))
    });
}

fn hash_to_field_bench(c: &mut Criterion) {
    c.bench_function("hash_to_field_short", |b| {
        b.iter(|| petition_crypto::hash_to_field(black_box("sign-petition-42")))
    });
}

fn hash_nonce_bench(c: &mut Criterion) {
    c.bench_function("hash_nonce", |b| {
        b.iter(|| petition_crypto::hash_nonce(black_box(b"secret"), black_box("abcdefgh12345678")))
    });
}

criterion_group!(
    benches,
    id_generate_bench,
    id_derive_bench,
    hash_to_field_bench,
    hash_nonce_bench
);
criterion_main!(benches);
