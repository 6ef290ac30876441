extern crate graph_engine;

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use graph_engine::algorithms::{all_pairs, max_flow, mst, shortest_path};
use graph_engine::{AllPairsMethod, Capacity, FlowNetwork, Weight, WeightedGraph};
use std::hint::black_box;

/// Deterministic sparse edge list: a ring plus `extra` chords per vertex.
fn sparse_edges(n: usize, extra: usize) -> Vec<(usize, usize, f64)> {
    let mut state: u64 = 0x9e37_79b9_7f4a_7c15;
    let mut next = move || {
        state = state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
        (state >> 33) as usize
    };
    let mut edges = Vec::with_capacity(n * (extra + 1));
    for u in 0..n {
        edges.push((u, (u + 1) % n, 1.0 + (next() % 10) as f64));
        for _ in 0..extra {
            let v = next() % n;
            if v != u {
                edges.push((u, v, 1.0 + (next() % 100) as f64));
            }
        }
    }
    edges.sort_by_key(|&(u, v, _)| (u, v));
    edges.dedup_by_key(|e| (e.0, e.1));
    edges
}

fn weight_lists(n: usize, edges: &[(usize, usize, f64)]) -> Vec<Vec<(usize, Weight)>> {
    let mut lists = vec![Vec::new(); n];
    for &(u, v, w) in edges {
        lists[u].push((v, Weight(w)));
    }
    lists
}

fn symmetric_lists(n: usize, edges: &[(usize, usize, f64)]) -> Vec<Vec<(usize, Weight)>> {
    let mut lists = vec![Vec::new(); n];
    for &(u, v, w) in edges {
        lists[u].push((v, Weight(w)));
        lists[v].push((u, Weight(w)));
    }
    for list in &mut lists {
        list.sort_by_key(|&(to, _)| to);
        list.dedup_by_key(|&mut (to, _)| to);
    }
    lists
}

fn bench_single_source(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_source");
    for n in [256usize, 1024] {
        let lists = weight_lists(n, &sparse_edges(n, 4));
        group.bench_with_input(BenchmarkId::new("dijkstra", n), &lists, |b, lists| {
            b.iter(|| black_box(shortest_path::dijkstra(black_box(lists), 0)));
        });
        group.bench_with_input(BenchmarkId::new("bellman_ford", n), &lists, |b, lists| {
            b.iter(|| black_box(shortest_path::bellman_ford(black_box(lists), 0).unwrap()));
        });
    }
    group.finish();
}

fn bench_all_pairs(c: &mut Criterion) {
    let mut group = c.benchmark_group("all_pairs");
    group.sample_size(20);
    for n in [64usize, 128] {
        let lists = weight_lists(n, &sparse_edges(n, 3));
        let matrix = all_pairs::DistanceMatrix::from_lists(&lists);
        group.bench_with_input(BenchmarkId::new("floyd_warshall", n), &matrix, |b, m| {
            b.iter(|| black_box(all_pairs::floyd_warshall(black_box(m)).unwrap()));
        });
        group.bench_with_input(BenchmarkId::new("johnson", n), &lists, |b, lists| {
            b.iter(|| black_box(all_pairs::johnson(black_box(lists)).unwrap()));
        });
    }
    group.finish();
}

fn bench_spanning_tree(c: &mut Criterion) {
    let n = 1024;
    let lists = symmetric_lists(n, &sparse_edges(n, 4));
    let mut group = c.benchmark_group("spanning_tree");
    group.bench_function("kruskal", |b| {
        b.iter(|| black_box(mst::kruskal(black_box(&lists)).unwrap()));
    });
    group.bench_function("prim", |b| {
        b.iter(|| black_box(mst::prim(black_box(&lists), 0)));
    });
    group.finish();
}

fn bench_max_flow(c: &mut Criterion) {
    let n = 256;
    let edges = sparse_edges(n, 3);
    let mut capacities: Vec<Vec<(usize, Capacity)>> = vec![Vec::new(); n];
    for &(u, v, c) in &edges {
        capacities[u].push((v, Capacity(c)));
    }
    c.bench_function("edmonds_karp", |b| {
        b.iter(|| black_box(max_flow::edmonds_karp(black_box(&capacities), 0, n - 1).unwrap()));
    });

    let network = FlowNetwork::new(0..n, edges.iter().copied(), [0, 1], [n - 2, n - 1]).unwrap();
    c.bench_function("flow_network_multi_terminal", |b| {
        b.iter_batched(
            || network.clone(),
            |mut net| black_box(net.max_flow().unwrap()),
            BatchSize::SmallInput,
        );
    });
}

fn bench_cached_queries(c: &mut Criterion) {
    let n = 128;
    let mut graph = WeightedGraph::new(0..n, sparse_edges(n, 3), true).unwrap();
    graph.all_pairs_shortest_paths(AllPairsMethod::FloydWarshall).unwrap();
    c.bench_function("shortest_path_from_table", |b| {
        b.iter(|| black_box(graph.shortest_path(black_box(&3), black_box(&97)).unwrap()));
    });
}

criterion_group!(
    benches,
    bench_single_source,
    bench_all_pairs,
    bench_spanning_tree,
    bench_max_flow,
    bench_cached_queries
);
criterion_main!(benches);
