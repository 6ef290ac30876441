//! Single-source shortest paths: DAG relaxation, Bellman-Ford and Dijkstra.
//!
//! All three share [`ShortestPathTree::relax`]. They operate on index-based adjacency
//! lists; vertex translation happens in [`crate::WeightedGraph`].

use std::collections::BTreeSet;

use tracing::warn;

use crate::collections::PriorityQueue;
use crate::error::{Error, GraphResult};
use crate::graph::Weight;

/// Distances and predecessors from one source.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortestPathTree {
    /// Source node
    pub source: usize,
    /// Distance from source to each node. Infinity for unreachable nodes.
    pub distance: Vec<f64>,
    /// Predecessor on the best known path. `None` for source/unreachable.
    pub parent: Vec<Option<usize>>,
}

impl ShortestPathTree {
    /// Source at distance zero, everything else unreached.
    pub fn new(n: usize, source: usize) -> Self {
        let mut distance = vec![f64::INFINITY; n];
        if source < n {
            distance[source] = 0.0;
        }
        Self {
            source,
            distance,
            parent: vec![None; n],
        }
    }

    /// Relax edge `(from, to, weight)`. Returns whether `to` improved.
    pub fn relax(&mut self, from: usize, to: usize, weight: f64) -> bool {
        let candidate = self.distance[from] + weight;
        if self.distance[to] > candidate {
            self.distance[to] = candidate;
            self.parent[to] = Some(from);
            true
        } else {
            false
        }
    }

    /// Nodes on the recorded path from the source to `target`, both included.
    pub fn path_to(&self, target: usize) -> Option<Vec<usize>> {
        if self.distance.get(target)?.is_infinite() {
            return None;
        }
        let mut path = vec![target];
        let mut node = target;
        while let Some(p) = self.parent[node] {
            if path.len() > self.parent.len() {
                return None;
            }
            path.push(p);
            node = p;
        }
        path.reverse();
        Some(path)
    }
}

/// Shortest paths on a DAG: relax every edge once in topological order.
///
/// Time: O(V + E). Correct with negative weights because there are no cycles.
pub fn dag_shortest_paths(
    lists: &[Vec<(usize, Weight)>],
    topological_order: &[usize],
    source: usize,
) -> ShortestPathTree {
    let mut tree = ShortestPathTree::new(lists.len(), source);
    for &u in topological_order {
        if tree.distance[u].is_infinite() {
            continue;
        }
        for &(v, Weight(w)) in &lists[u] {
            tree.relax(u, v, w);
        }
    }
    tree
}

/// Bellman-Ford single-source shortest paths.
///
/// Time: O(V * E). Relaxes every edge |V|-1 times, stopping early on a quiet pass. An edge
/// that still relaxes afterwards proves a reachable negative cycle; its vertices are
/// returned in [`Error::NegativeCycle`].
pub fn bellman_ford(
    lists: &[Vec<(usize, Weight)>],
    source: usize,
) -> GraphResult<ShortestPathTree, usize> {
    let n = lists.len();
    let mut tree = ShortestPathTree::new(n, source);

    for _ in 1..n {
        let mut updated = false;
        for (u, edges) in lists.iter().enumerate() {
            if tree.distance[u].is_infinite() {
                continue;
            }
            for &(v, Weight(w)) in edges {
                updated |= tree.relax(u, v, w);
            }
        }
        if !updated {
            return Ok(tree);
        }
    }

    for (u, edges) in lists.iter().enumerate() {
        if tree.distance[u].is_infinite() {
            continue;
        }
        for &(v, Weight(w)) in edges {
            if tree.relax(u, v, w) {
                let cycle = trace_cycle(&tree.parent, v);
                warn!(source, cycle_len = cycle.len(), "negative-weight cycle detected");
                return Err(Error::NegativeCycle { vertices: cycle });
            }
        }
    }

    Ok(tree)
}

/// Follow predecessors back from `start` until a node repeats; the repeated stretch is
/// the cycle.
fn trace_cycle(parent: &[Option<usize>], start: usize) -> BTreeSet<usize> {
    let mut seen = vec![false; parent.len()];
    let mut walk = Vec::new();
    let mut node = start;
    while !seen[node] {
        seen[node] = true;
        walk.push(node);
        match parent[node] {
            Some(p) => node = p,
            None => return walk.into_iter().collect(),
        }
    }
    let first = walk.iter().position(|&v| v == node).unwrap_or(0);
    walk[first..].iter().copied().collect()
}

/// Dijkstra single-source shortest paths.
///
/// Requires non-negative weights. Priority queue holds every node keyed by its current
/// estimate; improvements are applied with decrease-key.
///
/// # Complexity
/// O((V + E) log V).
pub fn dijkstra(lists: &[Vec<(usize, Weight)>], source: usize) -> ShortestPathTree {
    let mut tree = ShortestPathTree::new(lists.len(), source);
    let mut queue: PriorityQueue<usize, f64> = tree.distance.iter().copied().enumerate().collect();

    while let Some((u, d)) = queue.extract_min_with_priority() {
        if d.is_infinite() {
            // Everything left is unreachable
            break;
        }
        for &(v, Weight(w)) in &lists[u] {
            // Settled nodes never improve with non-negative weights
            if tree.relax(u, v, w) && queue.contains(&v) {
                queue.set_priority(&v, tree.distance[v]).ok();
            }
        }
    }

    tree
}
