//! Supporting containers consumed by the graph algorithms.

mod disjoint_set;
mod priority_queue;

pub use disjoint_set::DisjointSet;
pub use priority_queue::PriorityQueue;
