//! Topological sort from depth-first finish times.
//!
//! Orders nodes such that for every edge u→v, u comes before v.
//! Drives the linear-time shortest-path relaxation on DAGs.

use crate::graph::Neighbors;

use super::dfs::{depth_first_search, DepthFirstForest};

/// Nodes ordered by strictly decreasing DFS finish time.
///
/// Finish times are unique logical timestamps, so there are no ties to break. The order
/// is only topological if `forest` has no back edges.
pub fn finish_order(forest: &DepthFirstForest) -> Vec<usize> {
    let mut order: Vec<usize> = (0..forest.finish.len()).collect();
    order.sort_unstable_by(|&a, &b| forest.finish[b].cmp(&forest.finish[a]));
    order
}

/// Topological sort of a directed graph.
///
/// # Returns
/// * `Some(order)` - node indices in topological order
/// * `None` - if the graph contains cycles
pub fn topological_sort<G>(graph: &G) -> Option<Vec<usize>>
where
    G: Neighbors + ?Sized,
{
    let forest = depth_first_search(graph, true);
    if forest.is_acyclic() {
        Some(finish_order(&forest))
    } else {
        None
    }
}
