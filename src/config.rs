//! Algorithm selection.
//!
//! Strategies are plain enums so they can be picked in Rust code, parsed from strings, or
//! deserialized from the objects JavaScript callers pass through the WASM bindings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{validation_error, Error};

/// Strategy for all-pairs shortest paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllPairsMethod {
    /// Dense O(V^3) dynamic program over the adjacency matrix.
    #[default]
    FloydWarshall,
    /// Bellman-Ford reweighting followed by Dijkstra from every vertex.
    /// Preferable on sparse graphs.
    Johnson,
}

impl From<bool> for AllPairsMethod {
    /// `true` selects Johnson's algorithm.
    fn from(use_johnson: bool) -> Self {
        if use_johnson {
            AllPairsMethod::Johnson
        } else {
            AllPairsMethod::FloydWarshall
        }
    }
}

impl FromStr for AllPairsMethod {
    type Err = Error<String>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "floyd_warshall" | "floyd" => Ok(AllPairsMethod::FloydWarshall),
            "johnson" => Ok(AllPairsMethod::Johnson),
            _ => Err(validation_error!("unknown all-pairs method {:?}", s)),
        }
    }
}

impl fmt::Display for AllPairsMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllPairsMethod::FloydWarshall => f.write_str("floyd_warshall"),
            AllPairsMethod::Johnson => f.write_str("johnson"),
        }
    }
}

/// Strategy for minimum spanning trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MstMethod {
    /// Sort edges, join components with a disjoint-set forest.
    #[default]
    Kruskal,
    /// Grow a single tree from a source with a priority queue.
    Prim,
}

impl FromStr for MstMethod {
    type Err = Error<String>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "kruskal" => Ok(MstMethod::Kruskal),
            "prim" => Ok(MstMethod::Prim),
            _ => Err(validation_error!("unknown spanning tree method {:?}", s)),
        }
    }
}

impl fmt::Display for MstMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MstMethod::Kruskal => f.write_str("kruskal"),
            MstMethod::Prim => f.write_str("prim"),
        }
    }
}
