use apicmap_core::{synthesize, NamingStrategy};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

fn bench_synthesize(c: &mut Criterion) {
    let canonical = "Production Web Tier -- Frontend Load Balancer Members";
    let resource_id = "8d4e2bce-7b3b-4b88-96d0-f0e1d9dbd2a5";

    c.bench_function("naming/synthesize_uuid", |b| {
        b.iter(|| {
            let name = synthesize(
                black_box(Some(canonical)),
                black_box(resource_id),
                NamingStrategy::UseUuid,
            );
            black_box(name);
        });
    });

    c.bench_function("naming/synthesize_name", |b| {
        b.iter(|| {
            let name = synthesize(
                black_box(Some(canonical)),
                black_box(resource_id),
                NamingStrategy::UseName,
            );
            black_box(name);
        });
    });
}

criterion_group!(benches, bench_synthesize);
criterion_main!(benches);
