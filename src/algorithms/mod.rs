//! Graph algorithm implementations.
//!
//! Everything here works on dense node indices and plain adjacency lists. The graph types
//! in [`crate::graph`] own vertex translation, validation and caching.

pub mod all_pairs;
pub mod bfs;
pub mod dfs;
pub mod max_flow;
pub mod mst;
pub mod shortest_path;
pub mod topo;
