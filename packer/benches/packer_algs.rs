use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use packer::{Kind, PackerEngine, Size};
use rand::{Rng, SeedableRng, rngs::SmallRng};
use std::hint::black_box;

fn bench_algos(c: &mut Criterion) {
    let mut rng = SmallRng::seed_from_u64(42);
    let sizes: Vec<Size> = (0..26)
        .map(|_| Size::new(rng.random_range(50..110), rng.random_range(50..110)))
        .collect();

    for (name, kind) in [("shelf", Kind::Shelf), ("guillotine", Kind::Guillotine)] {
        c.bench_function(name, |b| {
            b.iter_batched(
                || PackerEngine::new(kind, Size::new(416, 416)).unwrap(),
                |mut eng| {
                    black_box(eng.pack(&sizes));
                },
                BatchSize::SmallInput,
            )
        });
    }
}

criterion_group!(benches, bench_algos);
criterion_main!(benches);
