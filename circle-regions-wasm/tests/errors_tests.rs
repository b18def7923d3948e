use circle_regions_wasm::{precision_digits, set_precision_digits, RegionEngine};
use js_sys::Reflect;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn is_err(v: &JsValue, code: &str) -> bool {
    if let Ok(ok) =
        Reflect::get(v, &JsValue::from_str("ok")).and_then(|x| x.as_bool().ok_or(JsValue::NULL))
    {
        if ok {
            return false;
        }
        if let Ok(err) = Reflect::get(v, &JsValue::from_str("error")) {
            if let Ok(c) = Reflect::get(&err, &JsValue::from_str("code")) {
                return c.as_string().map_or(false, |s| s == code);
            }
        }
    }
    false
}

#[wasm_bindgen_test]
fn invalid_ids_return_typed_errors() {
    let mut g = RegionEngine::new();
    let ver = g.geom_version();
    assert!(is_err(&g.move_circle_res(42, 0.0, 0.0), "invalid_id"));
    assert!(is_err(&g.resize_circle_res(42, 1.0), "invalid_id"));
    assert!(is_err(&g.remove_circle_res(42), "invalid_id"));
    assert_eq!(g.geom_version(), ver, "state mutated on error");
}

#[wasm_bindgen_test]
fn bad_geometry_is_rejected() {
    let mut g = RegionEngine::new();
    assert!(is_err(&g.add_circle_res(f64::NAN, 0.0, 1.0), "non_finite"));
    assert!(is_err(&g.add_circle_res(0.0, f64::INFINITY, 1.0), "non_finite"));
    assert!(is_err(&g.add_circle_res(0.0, 0.0, 0.0), "out_of_range"));
    assert!(is_err(&g.add_circle_res(0.0, 0.0, -2.0), "out_of_range"));
    assert_eq!(g.circle_count(), 0);

    let r = g.add_circle_res(0.0, 0.0, 1.0);
    assert!(!is_err(&r, "duplicate"));
    let id = Reflect::get(&r, &JsValue::from_str("value")).unwrap().as_f64().unwrap() as u32;
    assert!(is_err(&g.add_circle_res(0.0, 0.0, 1.0), "duplicate"));
    assert!(is_err(&g.resize_circle_res(id, f64::NAN), "non_finite"));
    assert!(is_err(&g.move_circle_res(id, 0.0, f64::NEG_INFINITY), "non_finite"));
    assert_eq!(g.circle_count(), 1);
}

#[wasm_bindgen_test]
fn precision_digits_are_bounded() {
    let before = precision_digits();
    assert!(is_err(&set_precision_digits(99), "out_of_range"));
    assert_eq!(precision_digits(), before);
    assert!(!is_err(&set_precision_digits(before), "out_of_range"));
}
