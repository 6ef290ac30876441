//! Graph representations.
//!
//! One adjacency model, [`Graph`], parameterised by the payload its edges carry:
//! `()` for plain graphs, [`Weight`] for [`WeightedGraph`] and [`Capacity`] for
//! [`FlowNetwork`]. Traversal works over anything implementing [`Neighbors`].

use std::fmt::Debug;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

mod adjacency;
mod base;
mod flow;
mod weighted;

pub use base::{BreadthFirstSearch, DepthFirstSearch, Graph};
pub use flow::{FlowNetwork, FlowVertex, MinCut};
pub use weighted::{ShortestPaths, SpanningTree, WeightedGraph};

pub(crate) use adjacency::Adjacency;

/// Client-supplied vertex identifier.
///
/// Ordering is used for deterministic iteration: vertices are indexed in ascending order,
/// which fixes DFS root order, tie-breaking and adjacency-matrix layout.
pub trait Vertex: Clone + Eq + Hash + Ord + Debug {}

impl<T: Clone + Eq + Hash + Ord + Debug> Vertex for T {}

/// Data attached to every edge.
pub trait EdgePayload: Clone + PartialEq + Debug {
    /// Reject payloads the algorithms cannot work with.
    fn validate(&self) -> Result<(), String>;
}

impl EdgePayload for () {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Real-valued edge weight. May be negative, never NaN or infinite.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Weight(pub f64);

impl EdgePayload for Weight {
    fn validate(&self) -> Result<(), String> {
        if !self.0.is_finite() {
            return Err(format!("edge weight {} must be a finite number", self.0));
        }
        Ok(())
    }
}

/// Flow capacity. Non-negative, never NaN.
///
/// Infinite capacity is reserved for the edges wiring super-nodes to their satellites.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Capacity(pub f64);

impl EdgePayload for Capacity {
    fn validate(&self) -> Result<(), String> {
        if self.0.is_nan() || self.0 < 0.0 {
            return Err(format!("capacity {} must be a non-negative number", self.0));
        }
        Ok(())
    }
}

/// Capability shared by every structure a traversal can walk: dense node indices
/// `0..node_count()` and an outgoing-neighbour iterator per node.
pub trait Neighbors {
    /// Number of nodes; valid indices are `0..node_count()`.
    fn node_count(&self) -> usize;

    /// Outgoing neighbours of `node`.
    fn neighbors(&self, node: usize) -> impl Iterator<Item = usize> + '_;
}

impl<P> Neighbors for [Vec<(usize, P)>] {
    fn node_count(&self) -> usize {
        self.len()
    }

    fn neighbors(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        self.get(node)
            .map_or(&[][..], |list| list.as_slice())
            .iter()
            .map(|&(to, _)| to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_validation() {
        assert!(Weight(-3.5).validate().is_ok());
        assert!(Weight(f64::NAN).validate().is_err());
        assert!(Weight(f64::INFINITY).validate().is_err());
        assert!(Weight(f64::NEG_INFINITY).validate().is_err());
    }

    #[test]
    fn test_capacity_validation() {
        assert!(Capacity(0.0).validate().is_ok());
        assert!(Capacity(f64::INFINITY).validate().is_ok());
        assert!(Capacity(-1.0).validate().is_err());
        assert!(Capacity(f64::NAN).validate().is_err());
    }

    #[test]
    fn test_slice_neighbors() {
        let lists: Vec<Vec<(usize, ())>> = vec![vec![(1, ()), (2, ())], vec![], vec![(0, ())]];
        let lists = lists.as_slice();
        assert_eq!(lists.node_count(), 3);
        assert_eq!(lists.neighbors(0).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(lists.neighbors(1).count(), 0);
        assert_eq!(lists.neighbors(9).count(), 0);
    }
}
