//! Vertex/edge sets and the index-based adjacency lists built from them.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::error::{validation_error, GraphResult};

use super::{EdgePayload, Neighbors, Vertex};

/// Owned vertex set, edge set and adjacency map of one graph.
///
/// Vertices get dense indices in ascending order. `lists[u]` holds the outgoing edges of
/// vertex `u` sorted by target index, and is exactly the edge set grouped by source.
#[derive(Debug, Clone)]
pub(crate) struct Adjacency<V, P> {
    directed: bool,
    nodes: Vec<V>,
    node_index: HashMap<V, usize>,
    edges: BTreeMap<(V, V), P>,
    lists: Vec<Vec<(usize, P)>>,
}

impl<V: Vertex, P: EdgePayload> Adjacency<V, P> {
    /// Empty adjacency.
    pub(crate) fn empty(directed: bool) -> Self {
        Self {
            directed,
            nodes: Vec::new(),
            node_index: HashMap::new(),
            edges: BTreeMap::new(),
            lists: Vec::new(),
        }
    }

    /// Copy of `self` with extra vertices and edges unioned in.
    ///
    /// Undirected edges are materialized in both directions. Fails without side effects if
    /// an endpoint is undeclared, a payload is invalid, or an edge is re-declared with a
    /// different payload.
    pub(crate) fn merged<I, E>(&self, vertices: I, edges: E) -> GraphResult<Self, V>
    where
        I: IntoIterator<Item = V>,
        E: IntoIterator<Item = (V, V, P)>,
    {
        let mut vertex_set: BTreeSet<V> = self.nodes.iter().cloned().collect();
        vertex_set.extend(vertices);

        let mut edge_set = self.edges.clone();
        for (from, to, payload) in edges {
            payload.validate().map_err(|reason| {
                validation_error!("edge ({:?}, {:?}): {}", from, to, reason)
            })?;
            for endpoint in [&from, &to] {
                if !vertex_set.contains(endpoint) {
                    return Err(validation_error!(
                        "edge ({:?}, {:?}) references undeclared vertex {:?}",
                        from,
                        to,
                        endpoint
                    ));
                }
            }
            if !self.directed && from != to {
                insert_edge(&mut edge_set, to.clone(), from.clone(), payload.clone())?;
            }
            insert_edge(&mut edge_set, from, to, payload)?;
        }

        Ok(Self::build(self.directed, vertex_set, edge_set))
    }

    fn build(directed: bool, vertices: BTreeSet<V>, edges: BTreeMap<(V, V), P>) -> Self {
        let nodes: Vec<V> = vertices.into_iter().collect();
        let node_index: HashMap<V, usize> = nodes
            .iter()
            .enumerate()
            .map(|(i, v)| (v.clone(), i))
            .collect();

        // BTreeMap order is (source, target) ascending, so each list comes out sorted.
        let mut lists: Vec<Vec<(usize, P)>> = vec![Vec::new(); nodes.len()];
        for ((from, to), payload) in &edges {
            lists[node_index[from]].push((node_index[to], payload.clone()));
        }

        Self {
            directed,
            nodes,
            node_index,
            edges,
            lists,
        }
    }

    pub(crate) fn is_directed(&self) -> bool {
        self.directed
    }

    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Number of materialized (directed) edges.
    pub(crate) fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub(crate) fn contains(&self, vertex: &V) -> bool {
        self.node_index.contains_key(vertex)
    }

    /// Index of a declared vertex.
    pub(crate) fn index_of(&self, vertex: &V) -> GraphResult<usize, V> {
        self.node_index
            .get(vertex)
            .copied()
            .ok_or_else(|| validation_error!("vertex {:?} is not declared", vertex))
    }

    /// Vertex at a dense index.
    pub(crate) fn vertex(&self, idx: usize) -> &V {
        &self.nodes[idx]
    }

    pub(crate) fn vertices(&self) -> &[V] {
        &self.nodes
    }

    /// Outgoing adjacency lists indexed by vertex.
    pub(crate) fn lists(&self) -> &[Vec<(usize, P)>] {
        &self.lists
    }

    pub(crate) fn successors(&self, idx: usize) -> &[(usize, P)] {
        self.lists.get(idx).map_or(&[], |v| v.as_slice())
    }

    /// Payload of edge `from -> to`, by index.
    pub(crate) fn edge(&self, from: usize, to: usize) -> Option<&P> {
        let list = self.successors(from);
        list.binary_search_by_key(&to, |&(target, _)| target)
            .ok()
            .map(|slot| &list[slot].1)
    }

    /// Iterate over all materialized edges in (source, target) order.
    pub(crate) fn edges(&self) -> impl Iterator<Item = (&V, &V, &P)> + '_ {
        self.edges.iter().map(|((from, to), p)| (from, to, p))
    }
}

fn insert_edge<V: Vertex, P: EdgePayload>(
    edges: &mut BTreeMap<(V, V), P>,
    from: V,
    to: V,
    payload: P,
) -> GraphResult<(), V> {
    match edges.get(&(from.clone(), to.clone())) {
        Some(existing) if *existing != payload => Err(validation_error!(
            "edge ({:?}, {:?}) declared with conflicting payloads {:?} and {:?}",
            from,
            to,
            existing,
            payload
        )),
        Some(_) => Ok(()),
        None => {
            edges.insert((from, to), payload);
            Ok(())
        }
    }
}

impl<V, P> Neighbors for Adjacency<V, P> {
    fn node_count(&self) -> usize {
        self.lists.len()
    }

    fn neighbors(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        self.lists.as_slice().neighbors(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn directed(vertices: &[u32], edges: &[(u32, u32)]) -> GraphResult<Adjacency<u32, ()>, u32> {
        Adjacency::empty(true).merged(
            vertices.iter().copied(),
            edges.iter().map(|&(a, b)| (a, b, ())),
        )
    }

    #[test]
    fn test_indices_follow_vertex_order() {
        let adj = directed(&[30, 10, 20], &[]).unwrap();
        assert_eq!(adj.vertices(), &[10, 20, 30]);
        assert_eq!(adj.index_of(&20), Ok(1));
        assert_eq!(adj.vertex(2), &30);
    }

    #[test]
    fn test_lists_group_edges_by_source() {
        let adj = directed(&[1, 2, 3], &[(1, 3), (1, 2), (3, 1)]).unwrap();
        assert_eq!(adj.edge_count(), 3);
        let degree_sum: usize = (0..adj.len()).map(|i| adj.successors(i).len()).sum();
        assert_eq!(degree_sum, adj.edge_count());
        assert_eq!(adj.neighbors(0).collect::<Vec<_>>(), vec![1, 2]);
        assert!(adj.edge(2, 0).is_some());
        assert!(adj.edge(0, 0).is_none());
    }

    #[test]
    fn test_undirected_edges_are_symmetric() {
        let adj: Adjacency<&str, ()> = Adjacency::empty(false)
            .merged(["a", "b", "c"], [("a", "b", ()), ("b", "c", ())])
            .unwrap();
        assert_eq!(adj.edge_count(), 4);
        for (from, to, _) in adj.edges() {
            let (i, j) = (adj.index_of(from).unwrap(), adj.index_of(to).unwrap());
            assert!(adj.edge(j, i).is_some());
        }
    }

    #[test]
    fn test_undeclared_endpoint_rejected() {
        let err = directed(&[1, 2], &[(1, 5)]).unwrap_err();
        assert!(matches!(err, Error::Validation(msg) if msg.contains("undeclared")));
    }

    #[test]
    fn test_unknown_vertex_lookup() {
        let adj = directed(&[1], &[]).unwrap();
        assert!(matches!(adj.index_of(&9), Err(Error::Validation(_))));
    }

    #[test]
    fn test_conflicting_payload_rejected() {
        let adj = Adjacency::empty(true)
            .merged([1u8, 2], [(1, 2, crate::Weight(1.0))])
            .unwrap();
        let err = adj.merged([], [(1, 2, crate::Weight(2.0))]).unwrap_err();
        assert!(matches!(err, Error::Validation(msg) if msg.contains("conflicting")));
        // Same payload again is idempotent
        let same = adj.merged([], [(1, 2, crate::Weight(1.0))]).unwrap();
        assert_eq!(same.edge_count(), 1);
    }

    #[test]
    fn test_merge_leaves_original_untouched() {
        let adj = directed(&[1, 2], &[(1, 2)]).unwrap();
        let bigger = adj.merged([3], [(2, 3, ())]).unwrap();
        assert_eq!(adj.len(), 2);
        assert_eq!(adj.edge_count(), 1);
        assert_eq!(bigger.len(), 3);
        assert_eq!(bigger.edge_count(), 2);
    }
}
