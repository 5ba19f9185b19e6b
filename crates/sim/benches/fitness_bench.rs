use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use fwdsel_sim::base::{FitnessEffects, Mutation, MutationType};
use fwdsel_sim::evolution::{DiploidFitness, MultiplicativeFitness};
use fwdsel_sim::genome::{ChromosomeType, Genome};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Two genomes with `n` mutations each, sharing roughly half their alleles.
fn genome_pair(n: usize) -> (Genome, Genome) {
    let t = Arc::new(MutationType::new(1, 0.5, FitnessEffects::Fixed { s: -0.001 }).unwrap());
    let mut rng = StdRng::seed_from_u64(42);

    let mut a = Vec::with_capacity(n);
    let mut b = Vec::with_capacity(n);
    for k in 0..n as u64 {
        let position = k * 10;
        let m = Arc::new(Mutation::new(k, position, -0.001, Arc::clone(&t), 0));
        if rng.random_bool(0.5) {
            a.push(Arc::clone(&m));
            b.push(m);
        } else {
            a.push(m);
            b.push(Arc::new(Mutation::new(n as u64 + k, position + 5, -0.001, Arc::clone(&t), 0)));
        }
    }

    (
        Genome::from_sorted(ChromosomeType::Autosome, a),
        Genome::from_sorted(ChromosomeType::Autosome, b),
    )
}

fn bench_diploid_fitness(c: &mut Criterion) {
    let mut group = c.benchmark_group("diploid_fitness");
    let model = MultiplicativeFitness::default();

    for n in [10, 100, 1_000, 10_000] {
        let (a, b) = genome_pair(n);
        group.throughput(Throughput::Elements(2 * n as u64));
        group.bench_with_input(BenchmarkId::new("merge", n), &n, |bench, _| {
            bench.iter(|| black_box(model.diploid_fitness(black_box(&a), black_box(&b))))
        });
    }

    let (x, _) = genome_pair(1_000);
    let y = Genome::unmodeled(ChromosomeType::Y);
    group.bench_function("hemizygous_1000", |bench| {
        bench.iter(|| black_box(model.diploid_fitness(black_box(&x), black_box(&y))))
    });

    group.finish();
}

criterion_group!(benches, bench_diploid_fitness);
criterion_main!(benches);
