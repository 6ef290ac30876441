//! Maximum flow via Edmonds-Karp (BFS-based Ford-Fulkerson).
//!
//! The residual network is rebuilt from the current flow before every search, and BFS
//! picks the augmenting path with the fewest edges, which bounds the number of rounds
//! by O(V * E).

use std::collections::BTreeMap;

use tracing::trace;

use crate::error::{Error, GraphResult};
use crate::graph::{Capacity, Neighbors};

use super::bfs::breadth_first_search;

/// Flow on every edge, aligned with the capacity lists: `flow[u][k]` is the flow on the
/// `k`-th outgoing edge of `u`.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowAssignment {
    flow: Vec<Vec<f64>>,
}

impl FlowAssignment {
    /// Zero flow on every edge.
    pub fn zero(capacities: &[Vec<(usize, Capacity)>]) -> Self {
        Self {
            flow: capacities.iter().map(|out| vec![0.0; out.len()]).collect(),
        }
    }

    /// Flow on edge `from -> to`, if that edge exists.
    pub fn on_edge(
        &self,
        capacities: &[Vec<(usize, Capacity)>],
        from: usize,
        to: usize,
    ) -> Option<f64> {
        slot(capacities, from, to).map(|k| self.flow[from][k])
    }

    /// Net flow leaving the node set `inside` towards nodes outside it.
    pub fn net_outflow(&self, capacities: &[Vec<(usize, Capacity)>], inside: &[bool]) -> f64 {
        let mut total = 0.0;
        for (u, out) in capacities.iter().enumerate() {
            for (k, &(v, _)) in out.iter().enumerate() {
                match (inside[u], inside[v]) {
                    (true, false) => total += self.flow[u][k],
                    (false, true) => total -= self.flow[u][k],
                    _ => {}
                }
            }
        }
        total
    }
}

fn slot(capacities: &[Vec<(usize, Capacity)>], from: usize, to: usize) -> Option<usize> {
    capacities
        .get(from)?
        .binary_search_by_key(&to, |&(target, _)| target)
        .ok()
}

/// Remaining capacity under the current flow.
///
/// Each edge `(u, v, cap)` with flow `f` contributes `(u, v, cap - f)` when `f < cap` and
/// `(v, u, f)` when `f > 0`; parallel contributions add up.
#[derive(Debug, Clone, PartialEq)]
pub struct ResidualNetwork {
    lists: Vec<Vec<(usize, f64)>>,
}

impl ResidualNetwork {
    pub fn build(capacities: &[Vec<(usize, Capacity)>], flow: &FlowAssignment) -> Self {
        let mut merged: Vec<BTreeMap<usize, f64>> = vec![BTreeMap::new(); capacities.len()];
        for (u, out) in capacities.iter().enumerate() {
            for (k, &(v, Capacity(cap))) in out.iter().enumerate() {
                let f = flow.flow[u][k];
                if f < cap {
                    *merged[u].entry(v).or_insert(0.0) += cap - f;
                }
                if f > 0.0 {
                    *merged[v].entry(u).or_insert(0.0) += f;
                }
            }
        }
        Self {
            lists: merged.into_iter().map(|m| m.into_iter().collect()).collect(),
        }
    }

    /// Residual capacity of `from -> to`; zero if there is no residual edge.
    pub fn capacity(&self, from: usize, to: usize) -> f64 {
        self.lists
            .get(from)
            .and_then(|out| {
                out.binary_search_by_key(&to, |&(target, _)| target)
                    .ok()
                    .map(|k| out[k].1)
            })
            .unwrap_or(0.0)
    }
}

impl Neighbors for ResidualNetwork {
    fn node_count(&self) -> usize {
        self.lists.len()
    }

    fn neighbors(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        self.lists.as_slice().neighbors(node)
    }
}

/// Fewest-edge source-to-sink path in a residual network.
#[derive(Debug, Clone, PartialEq)]
pub struct AugmentingPath {
    /// Nodes from source to sink
    pub nodes: Vec<usize>,
    /// Smallest residual capacity along the path
    pub bottleneck: f64,
}

/// BFS for an augmenting path. [`Error::NoPathFound`] when the sink is unreachable.
pub fn find_augmenting_path(
    residual: &ResidualNetwork,
    source: usize,
    sink: usize,
) -> GraphResult<AugmentingPath, usize> {
    if source == sink {
        return Err(Error::NoPathFound);
    }
    let tree = breadth_first_search(residual, source);
    let nodes = tree.path_to(sink).ok_or(Error::NoPathFound)?;
    let bottleneck = nodes
        .windows(2)
        .map(|pair| residual.capacity(pair[0], pair[1]))
        .fold(f64::INFINITY, f64::min);
    Ok(AugmentingPath { nodes, bottleneck })
}

/// Push `path.bottleneck` units along `path`: forward capacity first, then cancel flow on
/// the reverse edge.
pub fn augment(
    capacities: &[Vec<(usize, Capacity)>],
    flow: &mut FlowAssignment,
    path: &AugmentingPath,
) {
    for pair in path.nodes.windows(2) {
        let (x, y) = (pair[0], pair[1]);
        let mut remaining = path.bottleneck;
        if let Some(k) = slot(capacities, x, y) {
            let Capacity(cap) = capacities[x][k].1;
            let room = cap - flow.flow[x][k];
            let push = remaining.min(room).max(0.0);
            flow.flow[x][k] += push;
            remaining -= push;
        }
        if remaining > 0.0 {
            if let Some(k) = slot(capacities, y, x) {
                flow.flow[y][k] -= remaining;
            }
        }
    }
}

/// Edmonds-Karp maximum flow from `source` to `sink`.
///
/// Time: O(V * E^2).
pub fn edmonds_karp(
    capacities: &[Vec<(usize, Capacity)>],
    source: usize,
    sink: usize,
) -> GraphResult<FlowAssignment, usize> {
    let mut flow = FlowAssignment::zero(capacities);
    let mut rounds = 0usize;

    loop {
        let residual = ResidualNetwork::build(capacities, &flow);
        match find_augmenting_path(&residual, source, sink) {
            Ok(path) => {
                rounds += 1;
                trace!(
                    round = rounds,
                    path_len = path.nodes.len() - 1,
                    bottleneck = path.bottleneck,
                    "augmenting"
                );
                augment(capacities, &mut flow, &path);
            }
            Err(Error::NoPathFound) => break,
            Err(err) => return Err(err),
        }
    }

    Ok(flow)
}

/// Nodes reachable from `source` in the residual network of `flow`: the source side of a
/// minimum cut once `flow` is maximal.
pub fn source_side(
    capacities: &[Vec<(usize, Capacity)>],
    flow: &FlowAssignment,
    source: usize,
) -> Vec<bool> {
    let residual = ResidualNetwork::build(capacities, flow);
    let tree = breadth_first_search(&residual, source);
    tree.distance.iter().map(Option::is_some).collect()
}
