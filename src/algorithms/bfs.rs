//! Breadth-first search.
//!
//! Hop distances and BFS parents from a single source. Used directly for unweighted
//! shortest paths and, over the residual network, to find fewest-edge augmenting paths.

use std::collections::VecDeque;

use crate::graph::Neighbors;

/// BFS tree rooted at `source`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreadthFirstTree {
    /// Root of the search
    pub source: usize,
    /// Hop distance from the source; `None` if unreachable
    pub distance: Vec<Option<usize>>,
    /// BFS parent; `None` for the source and unreachable nodes
    pub parent: Vec<Option<usize>>,
}

impl BreadthFirstTree {
    /// Nodes on the tree path from the source to `target`, both included.
    pub fn path_to(&self, target: usize) -> Option<Vec<usize>> {
        self.distance.get(target).copied().flatten()?;
        let mut path = vec![target];
        let mut node = target;
        while let Some(p) = self.parent[node] {
            path.push(p);
            node = p;
        }
        path.reverse();
        Some(path)
    }
}

/// Breadth-first search from `source`.
pub fn breadth_first_search<G>(graph: &G, source: usize) -> BreadthFirstTree
where
    G: Neighbors + ?Sized,
{
    let n = graph.node_count();
    let mut distance = vec![None; n];
    let mut parent = vec![None; n];
    let mut queue = VecDeque::new();

    if source < n {
        distance[source] = Some(0);
        queue.push_back(source);
    }

    while let Some(v) = queue.pop_front() {
        let next = distance[v].map_or(0, |d| d + 1);
        for w in graph.neighbors(v) {
            if distance[w].is_none() {
                distance[w] = Some(next);
                parent[w] = Some(v);
                queue.push_back(w);
            }
        }
    }

    BreadthFirstTree {
        source,
        distance,
        parent,
    }
}
