//! The traversal core shared by every graph kind.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::debug;

use crate::algorithms::bfs::{breadth_first_search, BreadthFirstTree};
use crate::algorithms::dfs::{depth_first_search, DepthFirstForest};
use crate::algorithms::topo::finish_order;
use crate::cache::Cache;
use crate::error::{Error, GraphResult};

use super::{Adjacency, EdgePayload, Vertex};

/// Directed or undirected graph whose edges carry a payload `P`.
///
/// `Graph<V>` (payload `()`) is the plain graph. [`crate::WeightedGraph`] and
/// [`crate::FlowNetwork`] wrap a `Graph<_, Weight>` and a `Graph<_, Capacity>`.
///
/// Derived state (BFS tree, DFS forest, topological order) is computed on demand and
/// cached against the graph version; [`Graph::extend`] bumps the version, so nothing stale
/// is ever returned. Queries that may fill a cache take `&mut self`.
#[derive(Debug, Clone)]
pub struct Graph<V, P = ()> {
    adjacency: Adjacency<V, P>,
    version: u64,
    is_acyclic: bool,
    bfs: Cache<BreadthFirstTree>,
    dfs: Cache<DepthFirstForest>,
    topo: Cache<Vec<usize>>,
}

/// Hop distances and BFS parents from one source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreadthFirstSearch<V> {
    /// Root of the search
    pub source: V,
    /// Hop distance of every reachable vertex
    pub distances: BTreeMap<V, usize>,
    /// BFS parent of every reachable vertex except the source
    pub parents: BTreeMap<V, V>,
}

impl<V: Vertex> BreadthFirstSearch<V> {
    /// Hop distance to `vertex`; `None` if unreachable.
    pub fn distance(&self, vertex: &V) -> Option<usize> {
        self.distances.get(vertex).copied()
    }

    pub fn parent(&self, vertex: &V) -> Option<&V> {
        self.parents.get(vertex)
    }
}

/// Timestamps, parents and back edges of a full depth-first traversal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepthFirstSearch<V> {
    /// Logical time each vertex was entered
    pub discover: BTreeMap<V, usize>,
    /// Logical time each vertex was left
    pub finish: BTreeMap<V, usize>,
    /// DFS parent of every non-root vertex
    pub parents: BTreeMap<V, V>,
    /// Edges pointing at a vertex that was still open
    pub back_edges: BTreeSet<(V, V)>,
}

impl<V: Vertex, P: EdgePayload> Graph<V, P> {
    /// Build a graph from vertices and payload-carrying edges.
    ///
    /// For undirected graphs every edge `(u, v)` is stored as both `(u, v)` and `(v, u)`.
    pub fn with_edges<I, E>(vertices: I, edges: E, directed: bool) -> GraphResult<Self, V>
    where
        I: IntoIterator<Item = V>,
        E: IntoIterator<Item = (V, V, P)>,
    {
        let adjacency = Adjacency::empty(directed).merged(vertices, edges)?;
        let mut graph = Self {
            adjacency,
            version: 0,
            is_acyclic: true,
            bfs: Cache::new(),
            dfs: Cache::new(),
            topo: Cache::new(),
        };
        graph.refresh_acyclicity();
        debug!(
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            directed,
            acyclic = graph.is_acyclic,
            "graph constructed"
        );
        Ok(graph)
    }

    /// Union more vertices and payload-carrying edges into the graph.
    ///
    /// Input is validated in full first; on failure the vertex and edge sets are left as
    /// they were. Either way every cached result is invalidated.
    pub fn extend_with_edges<I, E>(&mut self, vertices: I, edges: E) -> GraphResult<(), V>
    where
        I: IntoIterator<Item = V>,
        E: IntoIterator<Item = (V, V, P)>,
    {
        let merged = self.adjacency.merged(vertices, edges);
        self.invalidate();
        self.adjacency = merged?;
        self.refresh_acyclicity();
        debug!(
            version = self.version,
            vertices = self.vertex_count(),
            edges = self.edge_count(),
            acyclic = self.is_acyclic,
            "graph extended"
        );
        Ok(())
    }

    pub(crate) fn invalidate(&mut self) {
        self.version += 1;
        self.bfs.clear();
        self.dfs.clear();
        self.topo.clear();
    }

    fn refresh_acyclicity(&mut self) {
        self.is_acyclic = cached_dfs(&mut self.dfs, self.version, &self.adjacency).is_acyclic();
    }

    /// Mutation counter; derived state is tagged with the version it was computed for.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn is_directed(&self) -> bool {
        self.adjacency.is_directed()
    }

    /// True iff depth-first search finds no back edge.
    pub fn is_acyclic(&self) -> bool {
        self.is_acyclic
    }

    pub fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of stored directed edges; an undirected edge counts twice.
    pub fn edge_count(&self) -> usize {
        self.adjacency.edge_count()
    }

    pub fn contains_vertex(&self, vertex: &V) -> bool {
        self.adjacency.contains(vertex)
    }

    /// Vertices in ascending order.
    pub fn vertices(&self) -> impl Iterator<Item = &V> + '_ {
        self.adjacency.vertices().iter()
    }

    /// Stored directed edges with their payloads, in (source, target) order.
    pub fn edges(&self) -> impl Iterator<Item = (&V, &V, &P)> + '_ {
        self.adjacency.edges()
    }

    /// Outgoing neighbours of `vertex` with edge payloads.
    pub fn neighbors(&self, vertex: &V) -> GraphResult<Vec<(&V, &P)>, V> {
        let idx = self.adjacency.index_of(vertex)?;
        Ok(self
            .adjacency
            .successors(idx)
            .iter()
            .map(|(to, payload)| (self.adjacency.vertex(*to), payload))
            .collect())
    }

    pub fn out_degree(&self, vertex: &V) -> GraphResult<usize, V> {
        let idx = self.adjacency.index_of(vertex)?;
        Ok(self.adjacency.successors(idx).len())
    }

    /// Breadth-first search from `source`.
    pub fn breadth_first_search(&mut self, source: &V) -> GraphResult<BreadthFirstSearch<V>, V> {
        let idx = self.adjacency.index_of(source)?;
        let adjacency = &self.adjacency;
        let tree = cached_bfs(&mut self.bfs, self.version, adjacency, idx);
        let distances = tree
            .distance
            .iter()
            .enumerate()
            .filter_map(|(i, d)| d.map(|d| (adjacency.vertex(i).clone(), d)))
            .collect();
        let parents = tree
            .parent
            .iter()
            .enumerate()
            .filter_map(|(i, p)| {
                p.map(|p| (adjacency.vertex(i).clone(), adjacency.vertex(p).clone()))
            })
            .collect();
        Ok(BreadthFirstSearch {
            source: source.clone(),
            distances,
            parents,
        })
    }

    /// Depth-first search over every vertex.
    pub fn depth_first_search(&mut self) -> DepthFirstSearch<V> {
        let adjacency = &self.adjacency;
        let forest = cached_dfs(&mut self.dfs, self.version, adjacency);
        let vertex = |i: usize| adjacency.vertex(i).clone();
        DepthFirstSearch {
            discover: forest.discover.iter().enumerate().map(|(i, &t)| (vertex(i), t)).collect(),
            finish: forest.finish.iter().enumerate().map(|(i, &t)| (vertex(i), t)).collect(),
            parents: forest
                .parent
                .iter()
                .enumerate()
                .filter_map(|(i, p)| p.map(|p| (vertex(i), vertex(p))))
                .collect(),
            back_edges: forest.back_edges.iter().map(|&(a, b)| (vertex(a), vertex(b))).collect(),
        }
    }

    /// Vertices of a directed acyclic graph by decreasing DFS finish time.
    ///
    /// # Errors
    /// [`Error::Precondition`] if the graph is undirected or has a cycle.
    pub fn topological_sort(&mut self) -> GraphResult<Vec<V>, V> {
        let order = self.topological_indices()?;
        Ok(order.into_iter().map(|i| self.adjacency.vertex(i).clone()).collect())
    }

    pub(crate) fn topological_indices(&mut self) -> GraphResult<Vec<usize>, V> {
        if !self.is_directed() {
            return Err(Error::Precondition(
                "topological sort requires a directed graph".to_string(),
            ));
        }
        if !self.is_acyclic {
            return Err(Error::Precondition(
                "topological sort requires an acyclic graph".to_string(),
            ));
        }
        let version = self.version;
        let (adjacency, dfs) = (&self.adjacency, &mut self.dfs);
        let order = self
            .topo
            .get_or_insert_with(version, || finish_order(cached_dfs(dfs, version, adjacency)));
        Ok(order.clone())
    }

    pub(crate) fn bfs_tree(&mut self, source: usize) -> &BreadthFirstTree {
        cached_bfs(&mut self.bfs, self.version, &self.adjacency, source)
    }

    pub(crate) fn adjacency(&self) -> &Adjacency<V, P> {
        &self.adjacency
    }

    pub(crate) fn index_of(&self, vertex: &V) -> GraphResult<usize, V> {
        self.adjacency.index_of(vertex)
    }

    pub(crate) fn vertex(&self, idx: usize) -> &V {
        self.adjacency.vertex(idx)
    }
}

/// BFS tree from `source`, reusing the cached one when it has the same root and version.
fn cached_bfs<'a, V: Vertex, P: EdgePayload>(
    cache: &'a mut Cache<BreadthFirstTree>,
    version: u64,
    adjacency: &Adjacency<V, P>,
    source: usize,
) -> &'a BreadthFirstTree {
    if cache.get(version).is_some_and(|tree| tree.source != source) {
        cache.clear();
    }
    cache.get_or_insert_with(version, || breadth_first_search(adjacency, source))
}

fn cached_dfs<'a, V: Vertex, P: EdgePayload>(
    cache: &'a mut Cache<DepthFirstForest>,
    version: u64,
    adjacency: &Adjacency<V, P>,
) -> &'a DepthFirstForest {
    cache.get_or_insert_with(version, || depth_first_search(adjacency, adjacency.is_directed()))
}

impl<V: Vertex> Graph<V> {
    /// Build an unweighted graph.
    ///
    /// ```rust
    /// use graph_engine::Graph;
    ///
    /// let mut g = Graph::new([1, 2, 3], [(1, 2), (2, 3)], true)?;
    /// assert_eq!(g.shortest_path(&1, &3)?, Some(2));
    /// assert_eq!(g.topological_sort()?, vec![1, 2, 3]);
    /// # Ok::<(), graph_engine::Error<i32>>(())
    /// ```
    pub fn new<I, E>(vertices: I, edges: E, directed: bool) -> GraphResult<Self, V>
    where
        I: IntoIterator<Item = V>,
        E: IntoIterator<Item = (V, V)>,
    {
        Self::with_edges(vertices, edges.into_iter().map(|(u, v)| (u, v, ())), directed)
    }

    /// Union more vertices and edges into the graph. See [`Graph::extend_with_edges`].
    pub fn extend<I, E>(&mut self, vertices: I, edges: E) -> GraphResult<(), V>
    where
        I: IntoIterator<Item = V>,
        E: IntoIterator<Item = (V, V)>,
    {
        self.extend_with_edges(vertices, edges.into_iter().map(|(u, v)| (u, v, ())))
    }

    /// Hop distance from `from` to `to`; `None` if unreachable.
    ///
    /// Reuses the cached BFS tree when it was computed from `from` for the current
    /// version.
    pub fn shortest_path(&mut self, from: &V, to: &V) -> GraphResult<Option<usize>, V> {
        let (s, t) = (self.index_of(from)?, self.index_of(to)?);
        Ok(self.bfs_tree(s).distance[t])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Weight;

    fn chain() -> Graph<u32> {
        Graph::new([1, 2, 3, 4], [(1, 2), (2, 3), (3, 4)], true).unwrap()
    }

    #[test]
    fn test_construction_counts() {
        let g = chain();
        assert_eq!(g.vertex_count(), 4);
        assert_eq!(g.edge_count(), 3);
        assert!(g.is_directed());
        assert!(g.is_acyclic());
        assert_eq!(g.vertices().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_degree_sum_equals_edges() {
        let g = Graph::new(
            ["a", "b", "c", "d"],
            [("a", "b"), ("b", "c"), ("c", "a"), ("a", "d")],
            false,
        )
        .unwrap();
        let degree_sum: usize = g.vertices().map(|v| g.out_degree(v).unwrap()).sum();
        assert_eq!(degree_sum, g.edge_count());
        for (u, v, _) in g.edges() {
            assert!(g.neighbors(v).unwrap().iter().any(|(w, _)| *w == u));
        }
    }

    #[test]
    fn test_undeclared_vertex_in_edge() {
        let err = Graph::new([1, 2], [(1, 3)], true).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_query_unknown_vertex() {
        let mut g = chain();
        assert!(matches!(g.shortest_path(&1, &99), Err(Error::Validation(_))));
        assert!(matches!(g.breadth_first_search(&99), Err(Error::Validation(_))));
        assert!(matches!(g.out_degree(&99), Err(Error::Validation(_))));
    }

    #[test]
    fn test_bfs_distances() {
        let mut g = chain();
        let bfs = g.breadth_first_search(&2).unwrap();
        assert_eq!(bfs.distance(&2), Some(0));
        assert_eq!(bfs.distance(&4), Some(2));
        assert_eq!(bfs.distance(&1), None);
        assert_eq!(bfs.parent(&4), Some(&3));
        assert_eq!(bfs.parent(&2), None);
    }

    #[test]
    fn test_shortest_path_unweighted() {
        let mut g = Graph::new(
            1..=6,
            [(1, 2), (2, 3), (3, 4), (1, 5), (5, 4), (4, 6)],
            true,
        )
        .unwrap();
        assert_eq!(g.shortest_path(&1, &4).unwrap(), Some(2));
        assert_eq!(g.shortest_path(&1, &6).unwrap(), Some(3));
        assert_eq!(g.shortest_path(&6, &1).unwrap(), None);
        assert_eq!(g.shortest_path(&3, &3).unwrap(), Some(0));
    }

    #[test]
    fn test_shortest_path_idempotent() {
        let mut g = chain();
        let first = g.shortest_path(&1, &4).unwrap();
        let version = g.version();
        let second = g.shortest_path(&1, &4).unwrap();
        assert_eq!(first, second);
        assert_eq!(version, g.version());
        // Switching sources and back gives the same answer
        g.shortest_path(&3, &4).unwrap();
        assert_eq!(g.shortest_path(&1, &4).unwrap(), first);
    }

    #[test]
    fn test_dfs_invariants() {
        let mut g = Graph::new(
            ['a', 'b', 'c', 'd', 'e'],
            [('a', 'b'), ('b', 'c'), ('c', 'a'), ('d', 'e')],
            true,
        )
        .unwrap();
        let dfs = g.depth_first_search();
        for v in ['a', 'b', 'c', 'd', 'e'] {
            assert!(dfs.discover[&v] < dfs.finish[&v]);
        }
        assert_eq!(dfs.back_edges, [('c', 'a')].into_iter().collect());
        assert!(!g.is_acyclic());
    }

    #[test]
    fn test_undirected_tree_is_acyclic() {
        let g = Graph::new([1, 2, 3, 4], [(1, 2), (2, 3), (2, 4)], false).unwrap();
        assert!(g.is_acyclic());
        let cyclic = Graph::new([1, 2, 3], [(1, 2), (2, 3), (3, 1)], false).unwrap();
        assert!(!cyclic.is_acyclic());
    }

    #[test]
    fn test_topological_sort() {
        let mut g = Graph::new(
            ["shirt", "tie", "jacket", "belt", "pants", "shoes", "socks"],
            [
                ("shirt", "tie"),
                ("tie", "jacket"),
                ("shirt", "belt"),
                ("belt", "jacket"),
                ("pants", "belt"),
                ("pants", "shoes"),
                ("socks", "shoes"),
            ],
            true,
        )
        .unwrap();
        let order = g.topological_sort().unwrap();
        assert_eq!(order.len(), 7);
        let pos = |v: &str| order.iter().position(|x| *x == v).unwrap();
        for (u, v, _) in g.edges() {
            assert!(pos(*u) < pos(*v), "{u} must come before {v}");
        }
    }

    #[test]
    fn test_topological_sort_preconditions() {
        let mut cyclic = Graph::new([1, 2], [(1, 2), (2, 1)], true).unwrap();
        assert!(matches!(cyclic.topological_sort(), Err(Error::Precondition(_))));

        let mut undirected = Graph::new([1, 2], [(1, 2)], false).unwrap();
        assert!(matches!(undirected.topological_sort(), Err(Error::Precondition(_))));
    }

    #[test]
    fn test_extend_invalidates_cached_state() {
        let mut g = chain();
        assert_eq!(g.shortest_path(&1, &4).unwrap(), Some(3));
        let before = g.version();

        g.extend([5], [(1, 5), (5, 4)]).unwrap();
        assert!(g.version() > before);
        assert_eq!(g.shortest_path(&1, &4).unwrap(), Some(2));
        assert_eq!(g.vertex_count(), 5);
        assert!(g.is_acyclic());

        g.extend([], [(4, 1)]).unwrap();
        assert!(!g.is_acyclic());
        assert!(g.topological_sort().is_err());
    }

    #[test]
    fn test_failed_extend_keeps_graph_consistent() {
        let mut g = chain();
        let order = g.topological_sort().unwrap();
        let before = g.version();

        let err = g.extend([5], [(5, 42)]).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(g.version() > before);
        assert_eq!(g.vertex_count(), 4);
        assert!(!g.contains_vertex(&5));
        assert_eq!(g.topological_sort().unwrap(), order);
    }

    #[test]
    fn test_generic_payload_graph() {
        let g: Graph<&str, Weight> =
            Graph::with_edges(["x", "y"], [("x", "y", Weight(7.0))], true).unwrap();
        assert_eq!(g.neighbors(&"x").unwrap(), vec![(&"y", &Weight(7.0))]);
    }
}
