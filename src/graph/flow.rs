//! Flow networks with one or more sources and sinks.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::debug;

use crate::algorithms::max_flow::{edmonds_karp, source_side, FlowAssignment};
use crate::cache::Cache;
use crate::error::{validation_error, Error, GraphResult};

use super::{Capacity, Graph, Vertex};

/// Vertex of a flow network: a client vertex or one of the synthetic terminals.
///
/// `SuperSource` and `SuperSink` exist only when there is more than one source (sink).
/// They are wired with infinite capacity to every real source and from every real sink.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FlowVertex<V> {
    Real(V),
    SuperSource,
    SuperSink,
}

impl<V> FlowVertex<V> {
    /// The client vertex, if this is one.
    pub fn into_real(self) -> Option<V> {
        match self {
            FlowVertex::Real(v) => Some(v),
            _ => None,
        }
    }
}

/// Minimum s-t cut certified by a maximum flow.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MinCut<V> {
    /// Vertices reachable from the sources in the final residual network
    pub source_side: BTreeSet<V>,
    /// Edges leaving the source side, with their capacities
    pub cut_edges: Vec<(V, V, f64)>,
    /// Sum of cut edge capacities; equal to the maximum flow
    pub capacity: f64,
}

/// Directed network with a non-negative capacity on every edge.
///
/// ```rust
/// use graph_engine::FlowNetwork;
///
/// let mut net = FlowNetwork::new(
///     ["s", "a", "t"],
///     [("s", "a", 3.0), ("a", "t", 2.0), ("s", "t", 1.0)],
///     ["s"],
///     ["t"],
/// )?;
/// assert_eq!(net.max_flow()?, 3.0);
/// assert_eq!(net.flow(&"a", &"t")?, Some(2.0));
/// # Ok::<(), graph_engine::Error<&str>>(())
/// ```
#[derive(Debug, Clone)]
pub struct FlowNetwork<V> {
    graph: Graph<FlowVertex<V>, Capacity>,
    sources: BTreeSet<V>,
    sinks: BTreeSet<V>,
    flow: Cache<FlowAssignment>,
}

impl<V: Vertex> FlowNetwork<V> {
    /// Build a flow network.
    ///
    /// # Errors
    /// [`Error::Validation`] if a capacity is negative, NaN or infinite, if `sources` or
    /// `sinks` is empty, if a terminal is not a declared vertex, or if a vertex is both a
    /// source and a sink.
    pub fn new<I, E, S, T>(vertices: I, edges: E, sources: S, sinks: T) -> GraphResult<Self, V>
    where
        I: IntoIterator<Item = V>,
        E: IntoIterator<Item = (V, V, f64)>,
        S: IntoIterator<Item = V>,
        T: IntoIterator<Item = V>,
    {
        let vertices: BTreeSet<V> = vertices.into_iter().collect();
        let sources: BTreeSet<V> = sources.into_iter().collect();
        let sinks: BTreeSet<V> = sinks.into_iter().collect();
        validate_terminals(&vertices, &sources, &sinks)?;
        let edges = real_edges(edges)?;

        let mut all_vertices: Vec<FlowVertex<V>> =
            vertices.into_iter().map(FlowVertex::Real).collect();
        let mut wiring = Vec::new();
        if sources.len() > 1 {
            all_vertices.push(FlowVertex::SuperSource);
            wiring.extend(sources.iter().map(|s| {
                (FlowVertex::SuperSource, FlowVertex::Real(s.clone()), Capacity(f64::INFINITY))
            }));
        }
        if sinks.len() > 1 {
            all_vertices.push(FlowVertex::SuperSink);
            wiring.extend(sinks.iter().map(|t| {
                (FlowVertex::Real(t.clone()), FlowVertex::SuperSink, Capacity(f64::INFINITY))
            }));
        }

        let graph = Graph::with_edges(all_vertices, edges.into_iter().chain(wiring), true)
            .map_err(into_real_error)?;
        debug!(
            sources = sources.len(),
            sinks = sinks.len(),
            vertices = graph.vertex_count(),
            "flow network constructed"
        );
        Ok(Self {
            graph,
            sources,
            sinks,
            flow: Cache::new(),
        })
    }

    /// Union more vertices and capacitated edges into the network. Sources and sinks stay
    /// as they were.
    pub fn extend<I, E>(&mut self, vertices: I, edges: E) -> GraphResult<(), V>
    where
        I: IntoIterator<Item = V>,
        E: IntoIterator<Item = (V, V, f64)>,
    {
        self.flow.clear();
        let edges = real_edges(edges).inspect_err(|_| self.graph.invalidate())?;
        self.graph
            .extend_with_edges(vertices.into_iter().map(FlowVertex::Real), edges)
            .map_err(into_real_error)
    }

    pub fn sources(&self) -> &BTreeSet<V> {
        &self.sources
    }

    pub fn sinks(&self) -> &BTreeSet<V> {
        &self.sinks
    }

    pub fn version(&self) -> u64 {
        self.graph.version()
    }

    /// Client vertices in ascending order.
    pub fn vertices(&self) -> impl Iterator<Item = &V> + '_ {
        self.graph.vertices().filter_map(|v| match v {
            FlowVertex::Real(v) => Some(v),
            _ => None,
        })
    }

    /// Client edges with their capacities; super-terminal wiring is left out.
    pub fn edges(&self) -> impl Iterator<Item = (&V, &V, f64)> + '_ {
        self.graph.edges().filter_map(|(u, v, &Capacity(c))| match (u, v) {
            (FlowVertex::Real(u), FlowVertex::Real(v)) => Some((u, v, c)),
            _ => None,
        })
    }

    /// The underlying network, super-terminals included.
    pub fn as_graph(&self) -> &Graph<FlowVertex<V>, Capacity> {
        &self.graph
    }

    /// Value of a maximum flow from the sources to the sinks.
    ///
    /// Measured as the net flow leaving the source set; edges between the super-source and
    /// the real sources do not count. Cached per version.
    pub fn max_flow(&mut self) -> GraphResult<f64, V> {
        let inside: Vec<bool> = self
            .graph
            .vertices()
            .map(|v| match v {
                FlowVertex::Real(v) => self.sources.contains(v),
                FlowVertex::SuperSource => true,
                FlowVertex::SuperSink => false,
            })
            .collect();
        let flow = cached_assignment(&mut self.flow, &self.graph, &self.sources, &self.sinks)?;
        let value = flow.net_outflow(self.graph.adjacency().lists(), &inside);
        debug!(value, version = self.graph.version(), "maximum flow");
        Ok(value)
    }

    /// Flow on edge `from -> to` under the maximum flow; `None` if there is no such edge.
    pub fn flow(&mut self, from: &V, to: &V) -> GraphResult<Option<f64>, V> {
        let u = index_of(&self.graph, &FlowVertex::Real(from.clone()))?;
        let v = index_of(&self.graph, &FlowVertex::Real(to.clone()))?;
        let flow = cached_assignment(&mut self.flow, &self.graph, &self.sources, &self.sinks)?;
        Ok(flow.on_edge(self.graph.adjacency().lists(), u, v))
    }

    /// Minimum cut: the residual-reachable side of a maximum flow and the edges leaving it.
    pub fn min_cut(&mut self) -> GraphResult<MinCut<V>, V> {
        let source = index_of(&self.graph, &source_of(&self.sources))?;
        let flow = cached_assignment(&mut self.flow, &self.graph, &self.sources, &self.sinks)?;
        let lists = self.graph.adjacency().lists();
        let side = source_side(lists, flow, source);

        let mut cut_edges = Vec::new();
        for (u, out) in lists.iter().enumerate() {
            for &(v, Capacity(c)) in out {
                if !(side[u] && !side[v]) {
                    continue;
                }
                if let (FlowVertex::Real(a), FlowVertex::Real(b)) =
                    (self.graph.vertex(u), self.graph.vertex(v))
                {
                    cut_edges.push((a.clone(), b.clone(), c));
                }
            }
        }
        let capacity = cut_edges.iter().map(|&(_, _, c)| c).sum();
        let source_side = self
            .graph
            .vertices()
            .zip(&side)
            .filter(|&(_, &inside)| inside)
            .filter_map(|(v, _)| v.clone().into_real())
            .collect();

        Ok(MinCut {
            source_side,
            cut_edges,
            capacity,
        })
    }
}

/// Maximum flow assignment for the current version, computed on a miss.
fn cached_assignment<'a, V: Vertex>(
    cache: &'a mut Cache<FlowAssignment>,
    graph: &Graph<FlowVertex<V>, Capacity>,
    sources: &BTreeSet<V>,
    sinks: &BTreeSet<V>,
) -> GraphResult<&'a FlowAssignment, V> {
    let source = index_of(graph, &source_of(sources))?;
    let sink = index_of(graph, &sink_of(sinks))?;
    cache.get_or_try_insert_with(graph.version(), || {
        edmonds_karp(graph.adjacency().lists(), source, sink)
            .map_err(|err| into_real_error(err.map_vertices(|i| graph.vertex(i).clone())))
    })
}

fn index_of<V: Vertex>(
    graph: &Graph<FlowVertex<V>, Capacity>,
    vertex: &FlowVertex<V>,
) -> GraphResult<usize, V> {
    graph.index_of(vertex).map_err(into_real_error)
}

/// Terminal the flow starts from: the lone source, or the super-source.
fn source_of<V: Vertex>(sources: &BTreeSet<V>) -> FlowVertex<V> {
    match sources.first() {
        Some(s) if sources.len() == 1 => FlowVertex::Real(s.clone()),
        _ => FlowVertex::SuperSource,
    }
}

fn sink_of<V: Vertex>(sinks: &BTreeSet<V>) -> FlowVertex<V> {
    match sinks.first() {
        Some(t) if sinks.len() == 1 => FlowVertex::Real(t.clone()),
        _ => FlowVertex::SuperSink,
    }
}

fn validate_terminals<V: Vertex>(
    vertices: &BTreeSet<V>,
    sources: &BTreeSet<V>,
    sinks: &BTreeSet<V>,
) -> GraphResult<(), V> {
    if sources.is_empty() {
        return Err(validation_error!("flow network needs at least one source"));
    }
    if sinks.is_empty() {
        return Err(validation_error!("flow network needs at least one sink"));
    }
    if let Some(v) = sources.iter().chain(sinks).find(|v| !vertices.contains(v)) {
        return Err(validation_error!("terminal {:?} is not a declared vertex", v));
    }
    if let Some(v) = sources.intersection(sinks).next() {
        return Err(validation_error!("vertex {:?} is both a source and a sink", v));
    }
    Ok(())
}

/// Wrap client edges, rejecting infinite capacity (reserved for super-terminal wiring).
fn real_edges<V, E>(edges: E) -> GraphResult<Vec<(FlowVertex<V>, FlowVertex<V>, Capacity)>, V>
where
    V: Vertex,
    E: IntoIterator<Item = (V, V, f64)>,
{
    edges
        .into_iter()
        .map(|(u, v, c)| {
            if c.is_infinite() {
                return Err(validation_error!("edge ({:?}, {:?}): capacity must be finite", u, v));
            }
            Ok((FlowVertex::Real(u), FlowVertex::Real(v), Capacity(c)))
        })
        .collect()
}

/// Drop super-terminals from an error raised on the internal network.
fn into_real_error<V: Vertex>(err: Error<FlowVertex<V>>) -> Error<V> {
    match err {
        Error::Validation(message) => Error::Validation(message),
        Error::Precondition(message) => Error::Precondition(message),
        Error::NegativeCycle { vertices } => Error::NegativeCycle {
            vertices: vertices.into_iter().filter_map(FlowVertex::into_real).collect(),
        },
        Error::NoPathFound => Error::NoPathFound,
        Error::KeyNotFound(FlowVertex::Real(v)) => Error::KeyNotFound(v),
        Error::KeyNotFound(other) => validation_error!("{:?} is not a client vertex", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clrs_network() -> FlowNetwork<u32> {
        FlowNetwork::new(
            1..=6,
            [
                (1, 2, 16.0),
                (1, 3, 13.0),
                (2, 4, 12.0),
                (3, 2, 4.0),
                (3, 5, 14.0),
                (4, 3, 9.0),
                (4, 6, 20.0),
                (5, 4, 7.0),
                (5, 6, 4.0),
            ],
            [1],
            [6],
        )
        .unwrap()
    }

    #[test]
    fn test_clrs_max_flow() {
        let mut net = clrs_network();
        assert_eq!(net.max_flow().unwrap(), 23.0);
    }

    #[test]
    fn test_max_flow_idempotent() {
        let mut net = clrs_network();
        let first = net.max_flow().unwrap();
        let version = net.version();
        assert_eq!(net.max_flow().unwrap(), first);
        assert_eq!(net.version(), version);
    }

    #[test]
    fn test_min_cut_equals_max_flow() {
        let mut net = clrs_network();
        let cut = net.min_cut().unwrap();
        assert_eq!(cut.capacity, net.max_flow().unwrap());
        assert!(cut.source_side.contains(&1));
        assert!(!cut.source_side.contains(&6));
        for (u, v, _) in &cut.cut_edges {
            assert!(cut.source_side.contains(u));
            assert!(!cut.source_side.contains(v));
        }
    }

    #[test]
    fn test_edge_flows_respect_capacity() {
        let mut net = clrs_network();
        let edges: Vec<(u32, u32, f64)> = net.edges().map(|(u, v, c)| (*u, *v, c)).collect();
        for (u, v, c) in edges {
            let f = net.flow(&u, &v).unwrap().unwrap();
            assert!((0.0..=c).contains(&f), "flow {f} on ({u},{v}) exceeds {c}");
        }
        assert_eq!(net.flow(&1, &6).unwrap(), None);
    }

    #[test]
    fn test_multiple_sources_and_sinks() {
        let mut net = FlowNetwork::new(
            ["a", "b", "m", "x", "y"],
            [
                ("a", "x", 3.0),
                ("a", "y", 1.0),
                ("b", "y", 4.0),
                ("b", "m", 5.0),
                ("m", "x", 2.0),
            ],
            ["a", "b"],
            ["x", "y"],
        )
        .unwrap();
        assert_eq!(net.max_flow().unwrap(), 10.0);
        assert!(net.as_graph().contains_vertex(&FlowVertex::SuperSource));
        assert!(net.as_graph().contains_vertex(&FlowVertex::SuperSink));
        assert_eq!(net.vertices().count(), 5);
        assert_eq!(net.edges().count(), 5);

        let cut = net.min_cut().unwrap();
        assert_eq!(cut.capacity, 10.0);
    }

    #[test]
    fn test_every_sink_feeds_super_sink() {
        let mut net = FlowNetwork::new(
            [1, 2, 3, 4],
            [(1, 2, 5.0), (1, 3, 6.0), (1, 4, 7.0)],
            [1],
            [2, 3, 4],
        )
        .unwrap();
        assert_eq!(net.max_flow().unwrap(), 18.0);
    }

    #[test]
    fn test_disconnected_sink() {
        let mut net = FlowNetwork::new([1, 2, 3], [(1, 2, 4.0)], [1], [3]).unwrap();
        assert_eq!(net.max_flow().unwrap(), 0.0);
        assert!(net.min_cut().unwrap().cut_edges.is_empty());
    }

    #[test]
    fn test_extend_recomputes_flow() {
        let mut net = FlowNetwork::new([1, 2], [(1, 2, 4.0)], [1], [2]).unwrap();
        assert_eq!(net.max_flow().unwrap(), 4.0);
        net.extend([3], [(1, 3, 2.0), (3, 2, 5.0)]).unwrap();
        assert_eq!(net.max_flow().unwrap(), 6.0);
    }

    #[test]
    fn test_failed_extend_drops_cached_flow() {
        let mut net = FlowNetwork::new([1, 2], [(1, 2, 4.0)], [1], [2]).unwrap();
        assert_eq!(net.max_flow().unwrap(), 4.0);
        let before = net.version();

        let err = net.extend([3], [(1, 3, -1.0)]).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(net.version() > before);
        assert!(net.flow.get(net.version()).is_none());

        assert_eq!(net.max_flow().unwrap(), 4.0);
        let err = net.extend([3], [(1, 2, 9.0)]).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(net.flow.get(net.version()).is_none());

        assert!(!net.as_graph().contains_vertex(&FlowVertex::Real(3)));
        assert_eq!(net.max_flow().unwrap(), 4.0);
        assert_eq!(net.flow(&1, &2).unwrap(), Some(4.0));
    }

    #[test]
    fn test_validation_errors() {
        let bad = |result: GraphResult<FlowNetwork<u32>, u32>| {
            assert!(matches!(result, Err(Error::Validation(_))));
        };
        bad(FlowNetwork::new([1, 2], [(1, 2, 1.0)], [], [2]));
        bad(FlowNetwork::new([1, 2], [(1, 2, 1.0)], [1], []));
        bad(FlowNetwork::new([1, 2], [(1, 2, 1.0)], [1], [9]));
        bad(FlowNetwork::new([1, 2], [(1, 2, 1.0)], [1, 2], [2]));
        bad(FlowNetwork::new([1, 2], [(1, 2, -1.0)], [1], [2]));
        bad(FlowNetwork::new([1, 2], [(1, 2, f64::NAN)], [1], [2]));
        bad(FlowNetwork::new([1, 2], [(1, 2, f64::INFINITY)], [1], [2]));
        bad(FlowNetwork::new([1, 2], [(1, 3, 1.0)], [1], [2]));
    }

    #[test]
    fn test_unknown_vertex_in_flow_query() {
        let mut net = clrs_network();
        assert!(matches!(net.flow(&1, &42), Err(Error::Validation(_))));
    }
}
