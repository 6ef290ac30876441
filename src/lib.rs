//! In-memory graph algorithms with Rust and WASM front ends.
//!
//! Three graph kinds share one adjacency model:
//!
//! - [`Graph`]: directed or undirected, unweighted. BFS, DFS with back-edge detection,
//!   acyclicity, topological sort, hop-count shortest paths.
//! - [`WeightedGraph`]: single-source shortest paths (DAG relaxation, Bellman-Ford or
//!   Dijkstra, picked from the graph shape), all-pairs shortest paths (Floyd-Warshall or
//!   Johnson), minimum spanning trees (Kruskal or Prim).
//! - [`FlowNetwork`]: Edmonds-Karp maximum flow and minimum cut, with synthetic super
//!   terminals for multiple sources or sinks.
//!
//! Derived results are cached per graph version and recomputed after `extend`.
//! Index-level implementations live in [`algorithms`]; the JS bindings in [`wasm`].

use wasm_bindgen::prelude::*;

mod cache;
mod error;

pub mod algorithms;
pub mod collections;
pub mod config;
pub mod graph;
pub mod wasm;

pub use algorithms::all_pairs::DistanceMatrix;
pub use collections::{DisjointSet, PriorityQueue};
pub use config::{AllPairsMethod, MstMethod};
pub use error::{Error, GraphResult};
pub use graph::{
    BreadthFirstSearch, Capacity, DepthFirstSearch, EdgePayload, FlowNetwork, FlowVertex, Graph,
    MinCut, Neighbors, ShortestPaths, SpanningTree, Vertex, Weight, WeightedGraph,
};

/// Initialize panic hook for better error messages in browser console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Get the crate version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
