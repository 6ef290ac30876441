//! Depth-first search with timestamps and back-edge classification.
//!
//! Runs on an explicit work stack, so depth is bounded by heap memory rather than the call
//! stack.

use crate::graph::Neighbors;

/// Result of a full depth-first traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepthFirstForest {
    /// Logical time each node was entered
    pub discover: Vec<usize>,
    /// Logical time each node was left
    pub finish: Vec<usize>,
    /// DFS parent; `None` for roots
    pub parent: Vec<Option<usize>>,
    /// Edges `(a, b)` found while `b` was still open
    pub back_edges: Vec<(usize, usize)>,
}

impl DepthFirstForest {
    /// True iff no back edge was found.
    pub fn is_acyclic(&self) -> bool {
        self.back_edges.is_empty()
    }
}

/// Depth-first search over every node.
///
/// Roots are tried in index order and neighbours in iteration order. The clock ticks on
/// every enter and exit, so all timestamps are distinct. An edge `(a, b)` is a back edge
/// when `b` is discovered but not finished; in an undirected graph the edge back to `a`'s
/// own parent is the tree edge seen from the other side and does not count.
pub fn depth_first_search<G>(graph: &G, directed: bool) -> DepthFirstForest
where
    G: Neighbors + ?Sized,
{
    let n = graph.node_count();
    let mut discover: Vec<Option<usize>> = vec![None; n];
    let mut finish: Vec<Option<usize>> = vec![None; n];
    let mut parent: Vec<Option<usize>> = vec![None; n];
    let mut back_edges = Vec::new();
    let mut time = 0;

    for root in 0..n {
        if discover[root].is_some() {
            continue;
        }
        time += 1;
        discover[root] = Some(time);
        let mut stack = vec![(root, graph.neighbors(root))];

        while let Some((node, successors)) = stack.last_mut() {
            let node = *node;
            match successors.next() {
                Some(next) => {
                    let open = discover[next].is_some() && finish[next].is_none();
                    if open && (directed || parent[node] != Some(next)) {
                        back_edges.push((node, next));
                    }
                    if discover[next].is_none() {
                        parent[next] = Some(node);
                        time += 1;
                        discover[next] = Some(time);
                        stack.push((next, graph.neighbors(next)));
                    }
                }
                None => {
                    time += 1;
                    finish[node] = Some(time);
                    stack.pop();
                }
            }
        }
    }

    DepthFirstForest {
        discover: discover.into_iter().map(|t| t.unwrap_or_default()).collect(),
        finish: finish.into_iter().map(|t| t.unwrap_or_default()).collect(),
        parent,
        back_edges,
    }
}
