//! Benchmarks for build order resolution
//!
//! Layered graphs approximate large solutions: every project depends on a
//! few projects from the layer below it.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pkganalyzer::graph::{build_graph, build_graph_in_order, resolve, DependencyGraph};

/// Edges for `layers` layers of `width` nodes, each depending on `fan_out`
/// nodes of the previous layer.
fn layered_edges(layers: usize, width: usize, fan_out: usize) -> Vec<(String, String)> {
    let mut edges = Vec::new();
    for layer in 1..layers {
        for i in 0..width {
            for k in 0..fan_out {
                let target = (i + k * 7) % width;
                edges.push((
                    format!("p{}-{}", layer, i),
                    format!("p{}-{}", layer - 1, target),
                ));
            }
        }
    }
    edges
}

fn layered_graph(layers: usize, width: usize, fan_out: usize) -> DependencyGraph<String> {
    build_graph(layered_edges(layers, width, fan_out), Vec::new())
}

/// Benchmark Kahn resolution on growing graphs
fn bench_resolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve");

    for layers in [10, 50, 100, 200].iter() {
        let graph = layered_graph(*layers, 50, 3);

        group.bench_with_input(
            BenchmarkId::new("nodes", graph.node_count()),
            &graph,
            |b, g| {
                b.iter(|| black_box(resolve(g)));
            },
        );
    }

    group.finish();
}

/// Benchmark graph construction from an edge list
fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_graph");

    for layers in [10, 50, 100].iter() {
        let edges = layered_edges(*layers, 50, 3);

        group.bench_with_input(BenchmarkId::new("edges", edges.len()), &edges, |b, e| {
            b.iter(|| black_box(build_graph(e.iter().cloned(), Vec::new())));
        });
    }

    group.finish();
}

/// Benchmark the per-project construction path used for solutions
fn bench_build_in_order(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_graph_in_order");

    for width in [100, 500, 1000].iter() {
        let entries: Vec<(String, Vec<String>)> = (0..*width)
            .map(|i| {
                let deps = (0..i.min(4)).map(|k| format!("proj-{}", i - k - 1)).collect();
                (format!("proj-{}", i), deps)
            })
            .collect();

        group.bench_with_input(BenchmarkId::new("projects", width), &entries, |b, e| {
            b.iter(|| {
                let graph = build_graph_in_order(e.iter().cloned());
                black_box(resolve(&graph))
            });
        });
    }

    group.finish();
}

/// Benchmark cycle diagnostics on an acyclic graph
fn bench_detect_cycles(c: &mut Criterion) {
    let graph = layered_graph(100, 50, 3);

    c.bench_function("detect_cycles_5000_nodes", |b| {
        b.iter(|| black_box(graph.detect_cycles()));
    });
}

criterion_group!(
    benches,
    bench_resolve,
    bench_build,
    bench_build_in_order,
    bench_detect_cycles
);
criterion_main!(benches);
