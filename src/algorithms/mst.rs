//! Minimum spanning trees of undirected weighted graphs: Kruskal and Prim.
//!
//! Both take symmetric adjacency lists (every edge stored in both directions) and return
//! tree edges as `(from, to, weight)` triples.

use crate::collections::{DisjointSet, PriorityQueue};
use crate::error::GraphResult;
use crate::graph::Weight;

/// Tree edge `(from, to, weight)` by node index.
pub type TreeEdge = (usize, usize, f64);

/// Kruskal's minimum spanning forest.
///
/// Time: O(E log E) for sorting + O(E α(V)) for union-find. Each undirected edge is
/// considered once (from its smaller endpoint); ties keep adjacency order because the
/// sort is stable.
pub fn kruskal(lists: &[Vec<(usize, Weight)>]) -> GraphResult<Vec<TreeEdge>, usize> {
    let n = lists.len();

    let mut edges: Vec<TreeEdge> = lists
        .iter()
        .enumerate()
        .flat_map(|(u, out)| {
            out.iter()
                .filter(move |&&(v, _)| u < v)
                .map(move |&(v, Weight(w))| (u, v, w))
        })
        .collect();
    edges.sort_by(|a, b| a.2.total_cmp(&b.2));

    let mut components = DisjointSet::new();
    for v in 0..n {
        components.new_set(v)?;
    }

    let mut tree = Vec::with_capacity(n.saturating_sub(1));
    for (u, v, w) in edges {
        if components.union(&u, &v)? {
            tree.push((u, v, w));
            if tree.len() + 1 == n {
                break;
            }
        }
    }

    Ok(tree)
}

/// Prim's minimum spanning tree grown from `source`.
///
/// Time: O(E log V). Each node not yet in the tree is keyed by the cheapest edge
/// connecting it to the tree; the cheapest is extracted and its neighbours relaxed with
/// strict less-than. Stops at the first infinite key, so only the source's component is
/// spanned.
pub fn prim(lists: &[Vec<(usize, Weight)>], source: usize) -> Vec<TreeEdge> {
    let n = lists.len();
    let mut key = vec![f64::INFINITY; n];
    let mut parent: Vec<Option<usize>> = vec![None; n];
    if source < n {
        key[source] = 0.0;
    }

    let mut queue: PriorityQueue<usize, f64> = key.iter().copied().enumerate().collect();
    let mut tree = Vec::with_capacity(n.saturating_sub(1));

    while let Some((u, k)) = queue.extract_min_with_priority() {
        if k.is_infinite() {
            break;
        }
        if let Some(p) = parent[u] {
            tree.push((p, u, k));
        }
        for &(v, Weight(w)) in &lists[u] {
            if queue.contains(&v) && w < key[v] {
                parent[v] = Some(u);
                key[v] = w;
                queue.set_priority(&v, w).ok();
            }
        }
    }

    tree
}

/// Sum of tree edge weights.
pub fn total_weight(tree: &[TreeEdge]) -> f64 {
    tree.iter().map(|&(_, _, w)| w).sum()
}
