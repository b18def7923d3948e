use circle_regions::{RegionError, RegionErrorKind};
use wasm_bindgen::prelude::*;

use crate::interop::{arr_u32, new_obj, set_kv};

pub fn ok(v: JsValue) -> JsValue {
    let o = new_obj();
    set_kv(&o, "ok", &JsValue::from_bool(true));
    set_kv(&o, "value", &v);
    o.into()
}

pub fn err(code: &'static str, message: impl Into<String>, data: Option<JsValue>) -> JsValue {
    let root = new_obj();
    set_kv(&root, "ok", &JsValue::from_bool(false));
    let e = new_obj();
    set_kv(&e, "code", &JsValue::from_str(code));
    set_kv(&e, "message", &JsValue::from_str(&message.into()));
    if let Some(d) = data { set_kv(&e, "data", &d); }
    set_kv(&root, "error", &e.into());
    root.into()
}

#[inline]
pub fn non_finite(param: &str) -> JsValue {
    let d = new_obj(); set_kv(&d, "param", &JsValue::from_str(param));
    err("non_finite", format!("parameter '{}' must be finite", param), Some(d.into()))
}

#[inline]
pub fn out_of_range(param: &str, min: f64, max: f64, got: f64) -> JsValue {
    let d = new_obj();
    set_kv(&d, "param", &JsValue::from_str(param));
    set_kv(&d, "min", &JsValue::from_f64(min));
    set_kv(&d, "max", &JsValue::from_f64(max));
    set_kv(&d, "got", &JsValue::from_f64(got));
    err("out_of_range", format!("parameter '{}' out of range", param), Some(d.into()))
}

#[inline]
pub fn invalid_id(kind: &str, id: u32) -> JsValue {
    let d = new_obj();
    set_kv(&d, "kind", &JsValue::from_str(kind));
    set_kv(&d, "id", &JsValue::from_f64(id as f64));
    err("invalid_id", format!("invalid {} id", kind), Some(d.into()))
}

#[inline]
pub fn duplicate_circle() -> JsValue {
    err("duplicate", "a circle with this center and radius already exists", None)
}

fn code_of(kind: &RegionErrorKind) -> &'static str {
    match kind {
        RegionErrorKind::MalformedTangency { .. } => "malformed_tangency",
        RegionErrorKind::DuplicateFaceSlot { .. } => "duplicate_face_slot",
        RegionErrorKind::MissingOuterContour => "missing_outer_contour",
        RegionErrorKind::UnsupportedTraversal { .. } => "unsupported_traversal",
        RegionErrorKind::MissingNextEdge { .. } => "missing_next_edge",
    }
}

/// Pipeline failure: implicated ids plus the circle snapshot for replay.
pub fn from_region_error(e: &RegionError) -> JsValue {
    let d = new_obj();
    let ids: Vec<u32> = e.implicated.iter().map(|c| c.0).collect();
    set_kv(&d, "implicated", &arr_u32(&ids).into());
    let circles = serde_wasm_bindgen::to_value(&e.circles).unwrap_or(JsValue::NULL);
    set_kv(&d, "circles", &circles);
    err(code_of(&e.kind), e.to_string(), Some(d.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use circle_regions::{CircleId, NodeId};
    use js_sys::{Array, Reflect, Uint32Array};
    use wasm_bindgen_test::*;

    fn get(v: &JsValue, k: &str) -> JsValue {
        Reflect::get(v, &JsValue::from_str(k)).unwrap()
    }

    #[wasm_bindgen_test]
    fn region_error_keeps_implicated_circles() {
        let e = RegionError::new(RegionErrorKind::MissingNextEdge { node: NodeId(2) })
            .implicating([CircleId(4), CircleId(1)]);
        let v = from_region_error(&e);
        assert_eq!(get(&v, "ok").as_bool(), Some(false));
        let err = get(&v, "error");
        assert_eq!(get(&err, "code").as_string().as_deref(), Some("missing_next_edge"));
        assert_eq!(
            get(&err, "message").as_string().as_deref(),
            Some("missing next edge at NodeId(2)")
        );
        let data = get(&err, "data");
        assert_eq!(Uint32Array::new(&get(&data, "implicated")).to_vec(), vec![4, 1]);
        assert_eq!(Array::from(&get(&data, "circles")).length(), 0);
    }
}
