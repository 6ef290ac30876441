//! Weighted graphs: single-source and all-pairs shortest paths, minimum spanning trees.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::algorithms::all_pairs::{floyd_warshall, johnson, DistanceMatrix};
use crate::algorithms::mst::{kruskal, prim, total_weight};
use crate::algorithms::shortest_path::{
    bellman_ford, dag_shortest_paths, dijkstra, ShortestPathTree,
};
use crate::cache::Cache;
use crate::config::{AllPairsMethod, MstMethod};
use crate::error::{Error, GraphResult};

use super::{BreadthFirstSearch, DepthFirstSearch, Graph, Vertex, Weight};

/// Graph with a real-valued weight on every edge.
///
/// Shortest-path queries pick their algorithm from the graph shape: relaxation in
/// topological order on directed acyclic graphs, Bellman-Ford when any weight is negative,
/// Dijkstra otherwise. Results are cached per graph version.
///
/// ```rust
/// use graph_engine::{AllPairsMethod, WeightedGraph};
///
/// let mut g = WeightedGraph::new(
///     ["s", "a", "b"],
///     [("s", "a", 4.0), ("s", "b", 1.0), ("b", "a", 2.0)],
///     true,
/// )?;
/// assert_eq!(g.shortest_path(&"s", &"a")?, 3.0);
///
/// let table = g.all_pairs_shortest_paths(AllPairsMethod::Johnson)?;
/// assert_eq!(table[&("s", "a")], 3.0);
/// assert!(table[&("a", "s")].is_infinite());
/// # Ok::<(), graph_engine::Error<&str>>(())
/// ```
#[derive(Debug, Clone)]
pub struct WeightedGraph<V> {
    graph: Graph<V, Weight>,
    matrix: Cache<DistanceMatrix>,
    single_source: Cache<ShortestPathTree>,
    all_pairs: Cache<(AllPairsMethod, DistanceMatrix)>,
}

/// Shortest-path distances and predecessors from one source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShortestPaths<V> {
    pub source: V,
    /// Distance to every vertex; infinity when unreachable
    pub distances: BTreeMap<V, f64>,
    /// Predecessor on a shortest path, for every reachable vertex except the source
    pub parents: BTreeMap<V, V>,
}

impl<V: Vertex> ShortestPaths<V> {
    /// Distance to `vertex`; infinity if unreachable or unknown.
    pub fn distance(&self, vertex: &V) -> f64 {
        self.distances.get(vertex).copied().unwrap_or(f64::INFINITY)
    }

    /// Vertices on a shortest path from the source to `target`, both included.
    pub fn path_to(&self, target: &V) -> Option<Vec<V>> {
        if self.distance(target).is_infinite() {
            return None;
        }
        let mut path = vec![target.clone()];
        let mut node = target;
        while let Some(parent) = self.parents.get(node) {
            if path.len() > self.parents.len() {
                return None;
            }
            path.push(parent.clone());
            node = parent;
        }
        path.reverse();
        Some(path)
    }
}

/// Edges of a minimum spanning tree (or forest) and their total weight.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpanningTree<V> {
    /// Tree edges as `(from, to, weight)`
    pub edges: Vec<(V, V, f64)>,
    pub total_weight: f64,
}

impl<V: Vertex> WeightedGraph<V> {
    /// Build a weighted graph. Weights may be negative but not NaN.
    pub fn new<I, E>(vertices: I, edges: E, directed: bool) -> GraphResult<Self, V>
    where
        I: IntoIterator<Item = V>,
        E: IntoIterator<Item = (V, V, f64)>,
    {
        let graph = Graph::with_edges(
            vertices,
            edges.into_iter().map(|(u, v, w)| (u, v, Weight(w))),
            directed,
        )?;
        Ok(Self {
            graph,
            matrix: Cache::new(),
            single_source: Cache::new(),
            all_pairs: Cache::new(),
        })
    }

    /// Union more vertices and weighted edges into the graph, invalidating every cached
    /// result.
    pub fn extend<I, E>(&mut self, vertices: I, edges: E) -> GraphResult<(), V>
    where
        I: IntoIterator<Item = V>,
        E: IntoIterator<Item = (V, V, f64)>,
    {
        self.matrix.clear();
        self.single_source.clear();
        self.all_pairs.clear();
        self.graph
            .extend_with_edges(vertices, edges.into_iter().map(|(u, v, w)| (u, v, Weight(w))))
    }

    /// Underlying payload-generic graph.
    pub fn as_graph(&self) -> &Graph<V, Weight> {
        &self.graph
    }

    pub fn version(&self) -> u64 {
        self.graph.version()
    }

    pub fn is_directed(&self) -> bool {
        self.graph.is_directed()
    }

    pub fn is_acyclic(&self) -> bool {
        self.graph.is_acyclic()
    }

    pub fn vertex_count(&self) -> usize {
        self.graph.vertex_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains_vertex(&self, vertex: &V) -> bool {
        self.graph.contains_vertex(vertex)
    }

    pub fn vertices(&self) -> impl Iterator<Item = &V> + '_ {
        self.graph.vertices()
    }

    /// Stored directed edges with their weights.
    pub fn edges(&self) -> impl Iterator<Item = (&V, &V, f64)> + '_ {
        self.graph.edges().map(|(u, v, &Weight(w))| (u, v, w))
    }

    /// Weight of edge `from -> to`, if present.
    pub fn weight(&self, from: &V, to: &V) -> GraphResult<Option<f64>, V> {
        let (u, v) = (self.graph.index_of(from)?, self.graph.index_of(to)?);
        Ok(self.graph.adjacency().edge(u, v).map(|&Weight(w)| w))
    }

    pub fn breadth_first_search(&mut self, source: &V) -> GraphResult<BreadthFirstSearch<V>, V> {
        self.graph.breadth_first_search(source)
    }

    pub fn depth_first_search(&mut self) -> DepthFirstSearch<V> {
        self.graph.depth_first_search()
    }

    pub fn topological_sort(&mut self) -> GraphResult<Vec<V>, V> {
        self.graph.topological_sort()
    }

    /// Weight of a shortest path from `from` to `to`; infinity when unreachable.
    ///
    /// Read from the all-pairs table if one is current, otherwise from the single-source
    /// tree of `from` (computed on a miss).
    ///
    /// # Errors
    /// [`Error::NegativeCycle`] if a negative cycle is reachable from `from`.
    pub fn shortest_path(&mut self, from: &V, to: &V) -> GraphResult<f64, V> {
        let (s, t) = (self.graph.index_of(from)?, self.graph.index_of(to)?);
        if let Some((_, table)) = self.all_pairs.get(self.graph.version()) {
            return Ok(table.get(s, t));
        }
        Ok(self.source_tree(s)?.distance[t])
    }

    /// Distances and predecessors from `source` to every vertex.
    pub fn single_source_shortest_paths(
        &mut self,
        source: &V,
    ) -> GraphResult<ShortestPaths<V>, V> {
        let s = self.graph.index_of(source)?;
        let tree = source_tree(&mut self.single_source, &mut self.graph, s)?;
        let graph = &self.graph;
        let vertex = |i: usize| graph.vertex(i).clone();
        Ok(ShortestPaths {
            source: source.clone(),
            distances: tree.distance.iter().enumerate().map(|(i, &d)| (vertex(i), d)).collect(),
            parents: tree
                .parent
                .iter()
                .enumerate()
                .filter_map(|(i, p)| p.map(|p| (vertex(i), vertex(p))))
                .collect(),
        })
    }

    fn source_tree(&mut self, source: usize) -> GraphResult<&ShortestPathTree, V> {
        source_tree(&mut self.single_source, &mut self.graph, source)
    }

    /// Shortest-path weight for every ordered vertex pair.
    ///
    /// # Errors
    /// [`Error::NegativeCycle`] if the graph contains a negative cycle.
    pub fn all_pairs_shortest_paths(
        &mut self,
        method: AllPairsMethod,
    ) -> GraphResult<BTreeMap<(V, V), f64>, V> {
        let version = self.graph.version();
        if self.all_pairs.get(version).is_some_and(|(cached, _)| *cached != method) {
            self.all_pairs.clear();
        }

        let (graph, matrix) = (&self.graph, &mut self.matrix);
        let (_, table) = self.all_pairs.get_or_try_insert_with(version, || {
            debug!(%method, vertices = graph.vertex_count(), "computing all-pairs shortest paths");
            let result = match method {
                AllPairsMethod::FloydWarshall => {
                    floyd_warshall(cached_matrix(matrix, version, graph))
                }
                AllPairsMethod::Johnson => johnson(graph.adjacency().lists()),
            };
            result
                .map(|table| (method, table))
                .map_err(|err| err.map_vertices(|i| graph.vertex(i).clone()))
        })?;

        let vertices = graph.adjacency().vertices();
        let mut distances = BTreeMap::new();
        for (i, u) in vertices.iter().enumerate() {
            for (j, v) in vertices.iter().enumerate() {
                distances.insert((u.clone(), v.clone()), table.get(i, j));
            }
        }
        Ok(distances)
    }

    /// Dense adjacency matrix; rows and columns follow [`WeightedGraph::vertices`].
    ///
    /// Missing edges are infinity; the diagonal is zero unless a negative self-loop is
    /// present.
    pub fn adjacency_matrix(&mut self) -> &DistanceMatrix {
        cached_matrix(&mut self.matrix, self.graph.version(), &self.graph)
    }

    /// Minimum spanning tree of an undirected graph.
    ///
    /// Kruskal spans every component (a forest on disconnected graphs). Prim grows from
    /// `source`, or the smallest vertex when `None`, and spans only that component.
    ///
    /// # Errors
    /// [`Error::Precondition`] on a directed graph.
    pub fn minimum_spanning_tree(
        &self,
        method: MstMethod,
        source: Option<&V>,
    ) -> GraphResult<SpanningTree<V>, V> {
        if self.graph.is_directed() {
            return Err(Error::Precondition(
                "minimum spanning tree requires an undirected graph".to_string(),
            ));
        }
        let lists = self.graph.adjacency().lists();
        let tree = match method {
            MstMethod::Kruskal => {
                kruskal(lists).map_err(|err| err.map_vertices(|i| self.graph.vertex(i).clone()))?
            }
            MstMethod::Prim => {
                let start = match source {
                    Some(vertex) => self.graph.index_of(vertex)?,
                    None => 0,
                };
                prim(lists, start)
            }
        };
        let total_weight = total_weight(&tree);
        debug!(%method, edges = tree.len(), total_weight, "spanning tree computed");

        Ok(SpanningTree {
            edges: tree
                .into_iter()
                .map(|(u, v, w)| (self.graph.vertex(u).clone(), self.graph.vertex(v).clone(), w))
                .collect(),
            total_weight,
        })
    }
}

fn cached_matrix<'a, V: Vertex>(
    cache: &'a mut Cache<DistanceMatrix>,
    version: u64,
    graph: &Graph<V, Weight>,
) -> &'a DistanceMatrix {
    cache.get_or_insert_with(version, || DistanceMatrix::from_lists(graph.adjacency().lists()))
}

/// Single-source tree for `source`, computed with the strategy the graph shape allows.
fn source_tree<'a, V: Vertex>(
    cache: &'a mut Cache<ShortestPathTree>,
    graph: &mut Graph<V, Weight>,
    source: usize,
) -> GraphResult<&'a ShortestPathTree, V> {
    let version = graph.version();
    if cache.get(version).is_some_and(|tree| tree.source != source) {
        cache.clear();
    }
    cache.get_or_try_insert_with(version, || {
        if graph.is_directed() && graph.is_acyclic() {
            let order = graph.topological_indices()?;
            debug!(source, strategy = "dag", "single-source shortest paths");
            return Ok(dag_shortest_paths(graph.adjacency().lists(), &order, source));
        }
        let lists = graph.adjacency().lists();
        if graph.edges().any(|(_, _, &Weight(w))| w < 0.0) {
            debug!(source, strategy = "bellman_ford", "single-source shortest paths");
            return bellman_ford(lists, source)
                .map_err(|err| err.map_vertices(|i| graph.vertex(i).clone()));
        }
        debug!(source, strategy = "dijkstra", "single-source shortest paths");
        Ok(dijkstra(lists, source))
    })
}
