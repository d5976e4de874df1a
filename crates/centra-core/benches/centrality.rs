use centra_core::{
    AdaptablePriorityQueue, CentralityConfig, Graph, ShortestPathEngine, closeness_centrality,
};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// `(vertices, average out-degree)` tiers.
const TIERS: [(usize, usize); 3] = [(100, 4), (400, 6), (1_000, 8)];

fn random_graph(vertices: usize, degree: usize, seed: u64) -> Graph {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut graph = Graph::with_capacity(vertices, vertices * degree);
    for from in 0..vertices {
        for _ in 0..degree {
            let to = rng.gen_range(0..vertices);
            let weight = rng.gen_range(1..100);
            graph
                .add_edge(from, to, weight)
                .expect("generated edge is in range");
        }
    }
    graph
}

fn bench_centrality(c: &mut Criterion) {
    let mut group = c.benchmark_group("centrality");
    group.sample_size(10);

    for (vertices, degree) in TIERS {
        let graph = random_graph(vertices, degree, 0xCE47_u64 + vertices as u64);
        let label = format!("{vertices}v");
        group.throughput(Throughput::Elements(vertices as u64));

        group.bench_with_input(BenchmarkId::new("sequential", &label), &graph, |b, g| {
            b.iter(|| black_box(closeness_centrality(g, &CentralityConfig::default())))
        });

        group.bench_with_input(BenchmarkId::new("parallel", &label), &graph, |b, g| {
            b.iter(|| black_box(closeness_centrality(g, &CentralityConfig { workers: 0 })))
        });

        group.bench_with_input(BenchmarkId::new("single_source", &label), &graph, |b, g| {
            let mut engine = ShortestPathEngine::new(g);
            b.iter(|| black_box(engine.run(0)))
        });
    }

    group.finish();
}

fn bench_queue(c: &mut Criterion) {
    c.bench_function("queue.decrease_key_10k", |b| {
        b.iter(|| {
            let mut pq = AdaptablePriorityQueue::with_capacity(10_000);
            let handles: Vec<_> = (0..10_000_u64).map(|v| pq.insert(u64::MAX, v)).collect();
            for (i, handle) in handles.iter().enumerate() {
                let _ = pq.replace_key(*handle, (i as u64 * 7_919) % 10_000);
            }
            while pq.remove_min().is_ok() {}
            black_box(pq.len())
        });
    });
}

criterion_group!(benches, bench_centrality, bench_queue);
criterion_main!(benches);
