// Copyright 2026 the Marginalia Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{
    BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};
use kurbo::Point;
use marginalia_ong::{Graph, NodeId};

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

fn gen_uniform_points(count: usize, extent: f64) -> Vec<Point> {
    let mut rng = Rng::new(0x3C6E_F35F_4750_2932);
    (0..count)
        .map(|_| Point::new(rng.next_f64() * extent, rng.next_f64() * extent))
        .collect()
}

fn gen_clustered_points(n_clusters: usize, per_cluster: usize, spread: f64) -> Vec<Point> {
    let mut out = Vec::with_capacity(n_clusters * per_cluster);
    let mut rng = Rng::new(0xC1A5_7E55_9999_ABCD);
    let mut centers = Vec::with_capacity(n_clusters);
    for _ in 0..n_clusters {
        centers.push((rng.next_f64() * 2000.0, rng.next_f64() * 2000.0));
    }
    for (cx, cy) in centers {
        for _ in 0..per_cluster {
            let dx = (rng.next_f64() - 0.5) * spread;
            let dy = (rng.next_f64() - 0.5) * spread;
            out.push(Point::new(cx + dx, cy + dy));
        }
    }
    out
}

fn build_graph(points: &[Point]) -> (Graph, Vec<NodeId>) {
    let mut graph = Graph::new();
    let ids = points.iter().map(|&p| graph.insert(p)).collect();
    (graph, ids)
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");
    for &n in &[256usize, 1024, 4096] {
        let uniform = gen_uniform_points(n, 2000.0);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(BenchmarkId::new("uniform", n), |b| {
            b.iter_batched(
                Graph::new,
                |mut graph| {
                    for &p in &uniform {
                        black_box(graph.insert(p));
                    }
                    graph
                },
                BatchSize::SmallInput,
            )
        });
    }
    let clustered = gen_clustered_points(16, 256, 128.0);
    group.throughput(Throughput::Elements(clustered.len() as u64));
    group.bench_function("clustered", |b| {
        b.iter_batched(
            Graph::new,
            |mut graph| {
                for &p in &clustered {
                    black_box(graph.insert(p));
                }
                graph
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_nearest(c: &mut Criterion) {
    let mut group = c.benchmark_group("nearest");
    for &n in &[256usize, 1024, 4096] {
        let points = gen_uniform_points(n, 2000.0);
        let queries = gen_clustered_points(8, 128, 400.0);
        let (mut graph, _) = build_graph(&points);
        group.throughput(Throughput::Elements(queries.len() as u64));
        group.bench_function(BenchmarkId::new("graph", n), |b| {
            b.iter(|| {
                let mut total = 0.0;
                for &q in &queries {
                    total += graph.nearest(q).map_or(0.0, |hit| hit.dist_sq);
                }
                total
            })
        });
        // Linear-scan baseline over the same point set.
        group.bench_function(BenchmarkId::new("linear_scan", n), |b| {
            b.iter(|| {
                let mut total = 0.0;
                for &q in &queries {
                    let best = points
                        .iter()
                        .map(|&p| (p - q).hypot2())
                        .fold(f64::INFINITY, f64::min);
                    total += best;
                }
                total
            })
        });
    }
    group.finish();
}

fn bench_neighborhood(c: &mut Criterion) {
    let mut group = c.benchmark_group("neighborhood");
    for &n in &[256usize, 1024, 4096] {
        let points = gen_uniform_points(n, 2000.0);
        let queries = gen_uniform_points(512, 2000.0);
        let (graph, _) = build_graph(&points);
        group.throughput(Throughput::Elements(queries.len() as u64));
        group.bench_function(BenchmarkId::new("resolve", n), |b| {
            b.iter(|| {
                let mut filled = 0usize;
                for &q in &queries {
                    filled += graph.neighborhood(q).iter().count();
                }
                filled
            })
        });
    }
    group.finish();
}

fn bench_churn(c: &mut Criterion) {
    // Interleaved removes and moves against a standing population, the
    // pointer-tracking workload the structure exists for.
    let mut group = c.benchmark_group("churn");
    let points = gen_uniform_points(1024, 2000.0);
    let targets = gen_uniform_points(256, 2000.0);
    group.throughput(Throughput::Elements(targets.len() as u64));
    group.bench_function("move_quarter", |b| {
        b.iter_batched(
            || build_graph(&points),
            |(mut graph, ids)| {
                for (id, &target) in ids.iter().step_by(4).zip(&targets) {
                    black_box(graph.move_to(*id, target));
                }
                graph
            },
            BatchSize::SmallInput,
        )
    });
    group.bench_function("remove_quarter", |b| {
        b.iter_batched(
            || build_graph(&points),
            |(mut graph, ids)| {
                for id in ids.iter().step_by(4) {
                    black_box(graph.remove(*id));
                }
                graph
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_insert,
    bench_nearest,
    bench_neighborhood,
    bench_churn,
);
criterion_main!(benches);
