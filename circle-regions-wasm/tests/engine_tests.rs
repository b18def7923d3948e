use circle_regions_wasm::RegionEngine;
use js_sys::{Array, Float64Array, Reflect, Uint32Array};
use serde::Deserialize;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[derive(Deserialize)]
struct CircleOut {
    center: PointOut,
    radius: f64,
}

#[derive(Deserialize)]
struct PointOut {
    x: f64,
    y: f64,
}

fn ok_value(v: &JsValue) -> JsValue {
    let ok = Reflect::get(v, &JsValue::from_str("ok")).unwrap();
    assert_eq!(ok.as_bool(), Some(true));
    Reflect::get(v, &JsValue::from_str("value")).unwrap()
}

#[wasm_bindgen_test]
fn circles_basic() {
    let mut g = RegionEngine::new();
    let a = g.add_circle(0.0, 0.0, 1.0).expect("circle id");
    let b = g.add_circle(5.0, 0.0, 2.0).expect("circle id");
    assert_eq!(g.circle_count(), 2);
    assert!(g.add_circle(0.0, 0.0, 1.0).is_none(), "duplicate accepted");

    let c: CircleOut = serde_wasm_bindgen::from_value(g.get_circle(b)).unwrap();
    assert_eq!((c.center.x, c.center.y, c.radius), (5.0, 0.0, 2.0));

    assert!(g.move_circle(b, 6.0, 1.0));
    assert!(g.resize_circle(b, 3.0));
    let c: CircleOut = serde_wasm_bindgen::from_value(g.get_circle(b)).unwrap();
    assert_eq!((c.center.x, c.center.y, c.radius), (6.0, 1.0, 3.0));

    assert!(g.remove_circle(a));
    assert!(!g.remove_circle(a));
    assert!(g.get_circle(a).is_null());
    assert_eq!(g.circle_ids().to_vec(), vec![b]);
}

#[wasm_bindgen_test]
fn lens_regions_and_node_data() {
    let mut g = RegionEngine::new();
    g.add_circle(0.0, 0.0, 1.0).unwrap();
    g.add_circle(1.0, 0.0, 1.0).unwrap();
    assert!(g.is_stale());

    let regions = ok_value(&g.compute_regions_res());
    assert_eq!(Array::from(&regions).length(), 4);
    assert!(!g.is_stale());
    assert_eq!(ok_value(&g.region_count_res()).as_f64(), Some(4.0));

    assert_eq!(g.node_count(), 2);
    assert_eq!(g.edge_count(), 4);
    let nd = g.node_data();
    let ids = Uint32Array::new(&Reflect::get(&nd, &JsValue::from_str("ids")).unwrap());
    let pos = Float64Array::new(&Reflect::get(&nd, &JsValue::from_str("positions")).unwrap());
    assert_eq!(ids.length(), 2);
    assert_eq!(pos.length(), 4);
    assert!((pos.get_index(0) - 0.5).abs() < 1e-9);
}

#[wasm_bindgen_test]
fn diff_follows_edits() {
    let mut g = RegionEngine::new();
    let a = g.add_circle(0.0, 0.0, 1.0).unwrap();
    ok_value(&g.compute_regions_res());
    let diff = g.last_diff();
    let added = Array::from(&Reflect::get(&diff, &JsValue::from_str("added")).unwrap());
    assert_eq!(added.length(), 2);

    let v = g.geom_version();
    assert!(g.move_circle(a, 3.0, 0.0));
    assert!(g.geom_version() > v);
    ok_value(&g.compute_regions_res());
    let diff = g.last_diff();
    let removed = Array::from(&Reflect::get(&diff, &JsValue::from_str("removed")).unwrap());
    assert_eq!(removed.length(), 2);
}

#[wasm_bindgen_test]
fn nesting_is_exposed() {
    let mut g = RegionEngine::new();
    let outer = g.add_circle(0.0, 0.0, 5.0).unwrap();
    let inner = g.add_circle(1.0, 0.0, 1.0).unwrap();
    ok_value(&g.compute_regions_res());
    assert_eq!(g.parents(inner).unwrap().to_vec(), vec![outer]);
    assert_eq!(g.children(outer).unwrap().to_vec(), vec![inner]);
    assert!(g.parents(99).is_none());
}

#[wasm_bindgen_test]
fn regions_as_json_text() {
    let mut g = RegionEngine::new();
    g.add_circle(0.0, 0.0, 2.0).unwrap();
    let text = ok_value(&g.regions_json_res()).as_string().unwrap();
    let v: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(v.as_array().map(|a| a.len()), Some(2));
    assert_eq!(v[0]["kind"], "circle");
}
