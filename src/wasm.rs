//! JavaScript bindings.
//!
//! Graphs are built from plain JS objects and use string vertex IDs:
//!
//! ```js
//! const g = new WasmWeightedGraph({
//!   vertices: ["a", "b", "c"],
//!   edges: [["a", "b", 2], ["b", "c", -1]],
//!   directed: true,
//! });
//! g.shortestPath("a", "c"); // 1
//! ```
//!
//! Library errors surface as thrown `Error`s.

use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::config::{AllPairsMethod, MstMethod};
use crate::error::{Error, GraphResult};
use crate::graph::{FlowNetwork, Graph, WeightedGraph};

fn default_directed() -> bool {
    true
}

/// Input object for [`WasmGraph`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GraphInput {
    pub vertices: Vec<String>,
    #[serde(default)]
    pub edges: Vec<(String, String)>,
    #[serde(default = "default_directed")]
    pub directed: bool,
}

impl GraphInput {
    pub fn build(self) -> GraphResult<Graph<String>, String> {
        Graph::new(self.vertices, self.edges, self.directed)
    }
}

/// Input object for [`WasmWeightedGraph`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WeightedGraphInput {
    pub vertices: Vec<String>,
    #[serde(default)]
    pub edges: Vec<(String, String, f64)>,
    #[serde(default = "default_directed")]
    pub directed: bool,
}

impl WeightedGraphInput {
    pub fn build(self) -> GraphResult<WeightedGraph<String>, String> {
        WeightedGraph::new(self.vertices, self.edges, self.directed)
    }
}

/// Input object for [`WasmFlowNetwork`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FlowNetworkInput {
    pub vertices: Vec<String>,
    #[serde(default)]
    pub edges: Vec<(String, String, f64)>,
    pub sources: Vec<String>,
    pub sinks: Vec<String>,
}

impl FlowNetworkInput {
    pub fn build(self) -> GraphResult<FlowNetwork<String>, String> {
        FlowNetwork::new(self.vertices, self.edges, self.sources, self.sinks)
    }
}

/// All-pairs distances as a dense table; `distances[i][j]` is from `vertices[i]` to
/// `vertices[j]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistanceTable {
    pub vertices: Vec<String>,
    pub distances: Vec<Vec<f64>>,
}

impl DistanceTable {
    fn from_graph(
        graph: &mut WeightedGraph<String>,
        method: AllPairsMethod,
    ) -> GraphResult<Self, String> {
        let pairs = graph.all_pairs_shortest_paths(method)?;
        let vertices: Vec<String> = graph.vertices().cloned().collect();
        let n = vertices.len();
        // BTreeMap order is row-major in vertex order
        let flat: Vec<f64> = pairs.into_values().collect();
        let distances = (0..n).map(|i| flat[i * n..(i + 1) * n].to_vec()).collect();
        Ok(Self { vertices, distances })
    }
}

/// Parse an optional strategy name, falling back to the default strategy.
fn parse_method<M>(name: Option<String>) -> GraphResult<M, String>
where
    M: FromStr<Err = Error<String>> + Default,
{
    name.as_deref().map(str::parse).transpose().map(Option::unwrap_or_default)
}

fn js_error<E: Display>(err: E) -> JsError {
    JsError::new(&err.to_string())
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsError> {
    serde_wasm_bindgen::to_value(value).map_err(js_error)
}

fn strings(values: impl IntoIterator<Item = impl AsRef<str>>) -> js_sys::Array {
    values
        .into_iter()
        .map(|v| JsValue::from_str(v.as_ref()))
        .collect()
}

/// Unweighted graph: traversal, hop-count shortest paths, topological sort.
#[wasm_bindgen]
pub struct WasmGraph {
    inner: Graph<String>,
}

#[wasm_bindgen]
impl WasmGraph {
    /// Build from `{ vertices, edges, directed }`.
    #[wasm_bindgen(constructor)]
    pub fn new(input: JsValue) -> Result<WasmGraph, JsError> {
        let input: GraphInput = serde_wasm_bindgen::from_value(input).map_err(js_error)?;
        Ok(WasmGraph {
            inner: input.build().map_err(js_error)?,
        })
    }

    #[wasm_bindgen(js_name = vertexCount)]
    pub fn vertex_count(&self) -> usize {
        self.inner.vertex_count()
    }

    #[wasm_bindgen(js_name = edgeCount)]
    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    #[wasm_bindgen(js_name = isDirected)]
    pub fn is_directed(&self) -> bool {
        self.inner.is_directed()
    }

    #[wasm_bindgen(js_name = isAcyclic)]
    pub fn is_acyclic(&self) -> bool {
        self.inner.is_acyclic()
    }

    /// Vertex IDs in ascending order.
    pub fn vertices(&self) -> js_sys::Array {
        strings(self.inner.vertices())
    }

    /// Add vertices (array of IDs) and edges (array of `[from, to]`).
    pub fn extend(&mut self, vertices: JsValue, edges: JsValue) -> Result<(), JsError> {
        let vertices: Vec<String> = serde_wasm_bindgen::from_value(vertices).map_err(js_error)?;
        let edges: Vec<(String, String)> = serde_wasm_bindgen::from_value(edges).map_err(js_error)?;
        self.inner.extend(vertices, edges).map_err(js_error)
    }

    /// Number of edges on a shortest path, or `undefined` if unreachable.
    #[wasm_bindgen(js_name = shortestPath)]
    pub fn shortest_path(&mut self, from: String, to: String) -> Result<Option<usize>, JsError> {
        self.inner.shortest_path(&from, &to).map_err(js_error)
    }

    /// `{ source, distances, parents }` with `Map`s keyed by vertex ID.
    #[wasm_bindgen(js_name = breadthFirstSearch)]
    pub fn breadth_first_search(&mut self, source: String) -> Result<JsValue, JsError> {
        to_js(&self.inner.breadth_first_search(&source).map_err(js_error)?)
    }

    /// `{ discover, finish, parents, back_edges }`.
    #[wasm_bindgen(js_name = depthFirstSearch)]
    pub fn depth_first_search(&mut self) -> Result<JsValue, JsError> {
        to_js(&self.inner.depth_first_search())
    }

    /// Throws on undirected or cyclic graphs.
    #[wasm_bindgen(js_name = topologicalSort)]
    pub fn topological_sort(&mut self) -> Result<js_sys::Array, JsError> {
        let order = self.inner.topological_sort().map_err(js_error)?;
        Ok(strings(order))
    }
}

/// Weighted graph: shortest paths and spanning trees.
#[wasm_bindgen]
pub struct WasmWeightedGraph {
    inner: WeightedGraph<String>,
}

#[wasm_bindgen]
impl WasmWeightedGraph {
    /// Build from `{ vertices, edges: [from, to, weight][], directed }`.
    #[wasm_bindgen(constructor)]
    pub fn new(input: JsValue) -> Result<WasmWeightedGraph, JsError> {
        let input: WeightedGraphInput = serde_wasm_bindgen::from_value(input).map_err(js_error)?;
        Ok(WasmWeightedGraph {
            inner: input.build().map_err(js_error)?,
        })
    }

    #[wasm_bindgen(js_name = vertexCount)]
    pub fn vertex_count(&self) -> usize {
        self.inner.vertex_count()
    }

    #[wasm_bindgen(js_name = edgeCount)]
    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    #[wasm_bindgen(js_name = isAcyclic)]
    pub fn is_acyclic(&self) -> bool {
        self.inner.is_acyclic()
    }

    pub fn vertices(&self) -> js_sys::Array {
        strings(self.inner.vertices())
    }

    pub fn extend(&mut self, vertices: JsValue, edges: JsValue) -> Result<(), JsError> {
        let vertices: Vec<String> = serde_wasm_bindgen::from_value(vertices).map_err(js_error)?;
        let edges: Vec<(String, String, f64)> =
            serde_wasm_bindgen::from_value(edges).map_err(js_error)?;
        self.inner.extend(vertices, edges).map_err(js_error)
    }

    #[wasm_bindgen(js_name = topologicalSort)]
    pub fn topological_sort(&mut self) -> Result<js_sys::Array, JsError> {
        let order = self.inner.topological_sort().map_err(js_error)?;
        Ok(strings(order))
    }

    /// Shortest-path weight; `Infinity` when unreachable. Throws on a negative cycle.
    #[wasm_bindgen(js_name = shortestPath)]
    pub fn shortest_path(&mut self, from: String, to: String) -> Result<f64, JsError> {
        self.inner.shortest_path(&from, &to).map_err(js_error)
    }

    #[wasm_bindgen(js_name = singleSourceShortestPaths)]
    pub fn single_source_shortest_paths(&mut self, source: String) -> Result<JsValue, JsError> {
        to_js(&self.inner.single_source_shortest_paths(&source).map_err(js_error)?)
    }

    /// `{ vertices, distances }`; `method` is `"floyd_warshall"` (default) or `"johnson"`.
    #[wasm_bindgen(js_name = allPairsShortestPaths)]
    pub fn all_pairs_shortest_paths(&mut self, method: Option<String>) -> Result<JsValue, JsError> {
        let method: AllPairsMethod = parse_method(method).map_err(js_error)?;
        to_js(&DistanceTable::from_graph(&mut self.inner, method).map_err(js_error)?)
    }

    /// `{ edges, total_weight }`; `method` is `"kruskal"` (default) or `"prim"`.
    #[wasm_bindgen(js_name = minimumSpanningTree)]
    pub fn minimum_spanning_tree(
        &self,
        method: Option<String>,
        source: Option<String>,
    ) -> Result<JsValue, JsError> {
        let method: MstMethod = parse_method(method).map_err(js_error)?;
        let tree = self
            .inner
            .minimum_spanning_tree(method, source.as_ref())
            .map_err(js_error)?;
        to_js(&tree)
    }
}

/// Flow network with one or more sources and sinks.
#[wasm_bindgen]
pub struct WasmFlowNetwork {
    inner: FlowNetwork<String>,
}

#[wasm_bindgen]
impl WasmFlowNetwork {
    /// Build from `{ vertices, edges: [from, to, capacity][], sources, sinks }`.
    #[wasm_bindgen(constructor)]
    pub fn new(input: JsValue) -> Result<WasmFlowNetwork, JsError> {
        let input: FlowNetworkInput = serde_wasm_bindgen::from_value(input).map_err(js_error)?;
        Ok(WasmFlowNetwork {
            inner: input.build().map_err(js_error)?,
        })
    }

    pub fn extend(&mut self, vertices: JsValue, edges: JsValue) -> Result<(), JsError> {
        let vertices: Vec<String> = serde_wasm_bindgen::from_value(vertices).map_err(js_error)?;
        let edges: Vec<(String, String, f64)> =
            serde_wasm_bindgen::from_value(edges).map_err(js_error)?;
        self.inner.extend(vertices, edges).map_err(js_error)
    }

    #[wasm_bindgen(js_name = maxFlow)]
    pub fn max_flow(&mut self) -> Result<f64, JsError> {
        self.inner.max_flow().map_err(js_error)
    }

    /// Flow on one edge, or `undefined` if there is no such edge.
    pub fn flow(&mut self, from: String, to: String) -> Result<Option<f64>, JsError> {
        self.inner.flow(&from, &to).map_err(js_error)
    }

    /// `{ source_side, cut_edges, capacity }`.
    #[wasm_bindgen(js_name = minCut)]
    pub fn min_cut(&mut self) -> Result<JsValue, JsError> {
        to_js(&self.inner.min_cut().map_err(js_error)?)
    }
}
