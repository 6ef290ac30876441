//! Browser-side checks of the JS bindings. Run with `wasm-pack test --node`.
#![cfg(target_arch = "wasm32")]

use graph_engine::wasm::{WasmFlowNetwork, WasmGraph, WasmWeightedGraph};
use wasm_bindgen::{JsError, JsValue};
use wasm_bindgen_test::*;

fn input(json: &str) -> JsValue {
    js_sys::JSON::parse(json).unwrap()
}

fn ok<T>(result: Result<T, JsError>) -> T {
    result.map_err(JsValue::from).unwrap()
}

#[wasm_bindgen_test]
fn graph_topological_sort() {
    let mut g = ok(WasmGraph::new(input(
        r#"{"vertices": ["c", "a", "b"], "edges": [["a", "b"], ["b", "c"]]}"#,
    )));
    assert!(g.is_acyclic());
    let order: Vec<String> = ok(g.topological_sort())
        .iter()
        .map(|v| v.as_string().unwrap())
        .collect();
    assert_eq!(order, vec!["a", "b", "c"]);
    assert_eq!(ok(g.shortest_path("a".into(), "c".into())), Some(2));
}

#[wasm_bindgen_test]
fn weighted_all_pairs_and_mst() {
    let mut g = ok(WasmWeightedGraph::new(input(
        r#"{"vertices": ["a", "b", "c"],
            "edges": [["a", "b", 1], ["b", "c", 2], ["a", "c", 4]],
            "directed": false}"#,
    )));
    assert_eq!(ok(g.shortest_path("a".into(), "c".into())), 3.0);
    assert!(g.all_pairs_shortest_paths(Some("johnson".into())).is_ok());
    assert!(g.minimum_spanning_tree(Some("prim".into()), None).is_ok());
}

#[wasm_bindgen_test]
fn negative_cycle_throws() {
    let mut g = ok(WasmWeightedGraph::new(input(
        r#"{"vertices": ["a", "b"], "edges": [["a", "b", -5], ["b", "a", 3]]}"#,
    )));
    assert!(g.shortest_path("a".into(), "b".into()).is_err());
}

#[wasm_bindgen_test]
fn flow_network_max_flow() {
    let mut net = ok(WasmFlowNetwork::new(input(
        r#"{"vertices": ["s", "a", "t"],
            "edges": [["s", "a", 3], ["a", "t", 2], ["s", "t", 1]],
            "sources": ["s"], "sinks": ["t"]}"#,
    )));
    assert_eq!(ok(net.max_flow()), 3.0);
    assert_eq!(ok(net.flow("a".into(), "t".into())), Some(2.0));
}

#[wasm_bindgen_test]
fn invalid_input_is_rejected() {
    assert!(WasmGraph::new(input(r#"{"vertices": ["a"], "edges": [["a", "b"]]}"#)).is_err());
    let no_terminals = r#"{"vertices": ["s"], "sources": [], "sinks": []}"#;
    assert!(WasmFlowNetwork::new(input(no_terminals)).is_err());
}
