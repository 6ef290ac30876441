//! All-pairs shortest paths: Floyd-Warshall and Johnson.

use std::collections::BTreeSet;

use tracing::warn;

use crate::error::{Error, GraphResult};
use crate::graph::Weight;

use super::shortest_path::{bellman_ford, dijkstra};

/// Dense `n x n` matrix of distances, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    n: usize,
    data: Vec<f64>,
}

impl DistanceMatrix {
    /// Matrix with zero diagonal and infinity elsewhere.
    pub fn unreachable(n: usize) -> Self {
        let mut data = vec![f64::INFINITY; n * n];
        for i in 0..n {
            data[i * n + i] = 0.0;
        }
        Self { n, data }
    }

    /// Dense adjacency matrix of a weighted graph.
    ///
    /// Missing edges are infinity, the diagonal is zero unless a negative self-loop makes
    /// it smaller.
    pub fn from_lists(lists: &[Vec<(usize, Weight)>]) -> Self {
        let mut matrix = Self::unreachable(lists.len());
        for (u, edges) in lists.iter().enumerate() {
            for &(v, Weight(w)) in edges {
                if u != v || w < 0.0 {
                    matrix.set(u, v, w);
                }
            }
        }
        matrix
    }

    /// Number of rows (and columns).
    pub fn size(&self) -> usize {
        self.n
    }

    /// Entry at row `i`, column `j`.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.n + j]
    }

    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        self.data[i * self.n + j] = value;
    }

    /// One row as a slice.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.n..(i + 1) * self.n]
    }
}

/// Floyd-Warshall over a dense adjacency matrix.
///
/// Time: O(V^3), memory O(V^2). Handles negative edges. A negative diagonal entry after
/// the last round means the vertex lies on a negative cycle; all such vertices are
/// reported in [`Error::NegativeCycle`].
pub fn floyd_warshall(adjacency: &DistanceMatrix) -> GraphResult<DistanceMatrix, usize> {
    let n = adjacency.size();
    let mut d = adjacency.clone();

    for k in 0..n {
        for i in 0..n {
            let d_ik = d.get(i, k);
            if d_ik.is_infinite() {
                continue;
            }
            for j in 0..n {
                let through_k = d_ik + d.get(k, j);
                if through_k < d.get(i, j) {
                    d.set(i, j, through_k);
                }
            }
        }
    }

    let on_cycle: BTreeSet<usize> = (0..n).filter(|&i| d.get(i, i) < 0.0).collect();
    if !on_cycle.is_empty() {
        warn!(vertices = on_cycle.len(), "negative-weight cycle detected by Floyd-Warshall");
        return Err(Error::NegativeCycle { vertices: on_cycle });
    }

    Ok(d)
}

/// Johnson's all-pairs shortest paths.
///
/// Time: O(V^2 log V + VE). A synthetic node with zero-weight edges to every vertex gives
/// Bellman-Ford potentials `h`; edges are reweighted to `w + h(u) - h(v) >= 0`, Dijkstra
/// runs from every vertex, and distances are shifted back by `- h(u) + h(v)`.
pub fn johnson(lists: &[Vec<(usize, Weight)>]) -> GraphResult<DistanceMatrix, usize> {
    let n = lists.len();

    let mut augmented = lists.to_vec();
    augmented.push((0..n).map(|v| (v, Weight(0.0))).collect());
    let h = bellman_ford(&augmented, n)?.distance;

    // Rounding can leave tiny negative residues on tight edges
    let reweighted: Vec<Vec<(usize, Weight)>> = lists
        .iter()
        .enumerate()
        .map(|(u, edges)| {
            edges
                .iter()
                .map(|&(v, Weight(w))| (v, Weight((w + h[u] - h[v]).max(0.0))))
                .collect()
        })
        .collect();

    let mut result = DistanceMatrix::unreachable(n);
    for source in 0..n {
        let tree = dijkstra(&reweighted, source);
        for (target, &d) in tree.distance.iter().enumerate() {
            if d.is_finite() {
                result.set(source, target, d - h[source] + h[target]);
            }
        }
    }

    Ok(result)
}
