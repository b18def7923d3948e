use crate::RegionEngine;
use circle_regions::{Circle, CircleId, Precision};
use js_sys::{Float64Array, Uint32Array};
use wasm_bindgen::prelude::*;
use crate::error;
use crate::interop::{arr_f64, arr_u32, new_obj, set_kv};

const MAX_DIGITS: u32 = circle_regions::geometry::tolerance::MAX_DIGITS;

#[wasm_bindgen]
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Process-wide; affects every engine's next recomputation.
#[wasm_bindgen]
pub fn set_precision_digits(digits: u32) -> JsValue {
    if digits > MAX_DIGITS {
        return error::out_of_range("digits", 0.0, MAX_DIGITS as f64, digits as f64);
    }
    circle_regions::set_precision(Precision::Digits(digits));
    error::ok(JsValue::from_f64(digits as f64))
}

#[wasm_bindgen]
pub fn precision_digits() -> u32 {
    circle_regions::precision()
}

fn check_geometry(x: f64, y: f64, r: f64) -> Option<JsValue> {
    if !x.is_finite() {
        return Some(error::non_finite("x"));
    }
    if !y.is_finite() {
        return Some(error::non_finite("y"));
    }
    if !r.is_finite() {
        return Some(error::non_finite("r"));
    }
    if r <= 0.0 {
        return Some(error::out_of_range("r", f64::MIN_POSITIVE, f64::MAX, r));
    }
    None
}

#[wasm_bindgen]
impl RegionEngine {
    #[wasm_bindgen(constructor)]
    pub fn new() -> RegionEngine {
        crate::RegionEngine::rs_new()
    }
    pub fn geom_version(&self) -> u64 {
        self.rs_geom_version()
    }

    // Circles
    pub fn add_circle(&mut self, x: f64, y: f64, r: f64) -> Option<u32> {
        self.inner.add_circle(Circle::new(x, y, r)).map(|id| id.0)
    }
    pub fn add_circle_res(&mut self, x: f64, y: f64, r: f64) -> JsValue {
        if let Some(e) = check_geometry(x, y, r) {
            return e;
        }
        match self.inner.add_circle(Circle::new(x, y, r)) {
            Some(id) => error::ok(JsValue::from_f64(id.0 as f64)),
            None => error::duplicate_circle(),
        }
    }
    pub fn add_labeled_circle(&mut self, x: f64, y: f64, r: f64, label: String) -> Option<u32> {
        self.inner
            .add_circle(Circle::new(x, y, r).with_label(label))
            .map(|id| id.0)
    }
    pub fn move_circle(&mut self, id: u32, x: f64, y: f64) -> bool {
        self.inner.move_circle(CircleId(id), x, y)
    }
    pub fn move_circle_res(&mut self, id: u32, x: f64, y: f64) -> JsValue {
        let Some(r) = self.inner.circle(CircleId(id)).map(|c| c.radius) else {
            return error::invalid_id("circle", id);
        };
        if let Some(e) = check_geometry(x, y, r) {
            return e;
        }
        if self.inner.move_circle(CircleId(id), x, y) {
            error::ok(JsValue::from_bool(true))
        } else {
            error::duplicate_circle()
        }
    }
    pub fn resize_circle(&mut self, id: u32, r: f64) -> bool {
        self.inner.resize_circle(CircleId(id), r)
    }
    pub fn resize_circle_res(&mut self, id: u32, r: f64) -> JsValue {
        let Some(c) = self.inner.circle(CircleId(id)).map(|c| c.center) else {
            return error::invalid_id("circle", id);
        };
        if let Some(e) = check_geometry(c.x, c.y, r) {
            return e;
        }
        if self.inner.resize_circle(CircleId(id), r) {
            error::ok(JsValue::from_bool(true))
        } else {
            error::duplicate_circle()
        }
    }
    pub fn remove_circle(&mut self, id: u32) -> bool {
        self.inner.remove_circle(CircleId(id))
    }
    pub fn remove_circle_res(&mut self, id: u32) -> JsValue {
        if self.inner.circle(CircleId(id)).is_none() {
            return error::invalid_id("circle", id);
        }
        error::ok(JsValue::from_bool(self.inner.remove_circle(CircleId(id))))
    }
    pub fn get_circle(&self, id: u32) -> JsValue {
        match self.inner.circle(CircleId(id)) {
            Some(c) => serde_wasm_bindgen::to_value(c).unwrap_or(JsValue::NULL),
            None => JsValue::NULL,
        }
    }
    pub fn circle_count(&self) -> u32 {
        self.inner.circle_count() as u32
    }
    pub fn circle_ids(&self) -> Uint32Array {
        let ids: Vec<u32> = self.inner.circle_ids().iter().map(|c| c.0).collect();
        arr_u32(&ids)
    }
    pub fn parents(&self, id: u32) -> Option<Uint32Array> {
        self.inner
            .parents(CircleId(id))
            .map(|s| arr_u32(&s.iter().map(|c| c.0).collect::<Vec<u32>>()))
    }
    pub fn children(&self, id: u32) -> Option<Uint32Array> {
        self.inner
            .children(CircleId(id))
            .map(|s| arr_u32(&s.iter().map(|c| c.0).collect::<Vec<u32>>()))
    }

    // Regions
    pub fn is_stale(&self) -> bool {
        self.inner.is_stale()
    }
    pub fn compute_regions_res(&mut self) -> JsValue {
        match self.inner.compute_regions() {
            Ok(regions) => match serde_wasm_bindgen::to_value(regions) {
                Ok(v) => error::ok(v),
                Err(e) => error::err("serialize", e.to_string(), None),
            },
            Err(e) => {
                web_sys::console::warn_1(&JsValue::from_str(&e.to_string()));
                error::from_region_error(&e)
            }
        }
    }
    /// Regions as a JSON string, for hosts that persist or diff them as text.
    pub fn regions_json_res(&mut self) -> JsValue {
        match self.inner.compute_regions() {
            Ok(regions) => match serde_json::to_string(regions) {
                Ok(s) => error::ok(JsValue::from_str(&s)),
                Err(e) => error::err("serialize", e.to_string(), None),
            },
            Err(e) => error::from_region_error(&e),
        }
    }
    pub fn region_count_res(&mut self) -> JsValue {
        match self.inner.compute_regions() {
            Ok(regions) => error::ok(JsValue::from_f64(regions.len() as f64)),
            Err(e) => error::from_region_error(&e),
        }
    }
    pub fn last_diff(&self) -> JsValue {
        serde_wasm_bindgen::to_value(self.inner.last_diff()).unwrap_or(JsValue::NULL)
    }

    // Graph snapshot
    pub fn node_count(&self) -> u32 {
        self.inner.node_count() as u32
    }
    pub fn edge_count(&self) -> u32 {
        self.inner.edge_count() as u32
    }
    /// `{ ids: Uint32Array, positions: Float64Array }` with x, y pairs.
    pub fn node_data(&self) -> JsValue {
        let nodes = self.inner.nodes();
        let mut ids: Vec<u32> = Vec::with_capacity(nodes.len());
        let mut pos: Vec<f64> = Vec::with_capacity(nodes.len() * 2);
        for (id, n) in nodes {
            ids.push(id.0);
            let p = n.point();
            pos.push(p.x);
            pos.push(p.y);
        }
        let o = new_obj();
        set_kv(&o, "ids", &arr_u32(&ids).into());
        let positions: Float64Array = arr_f64(&pos);
        set_kv(&o, "positions", &positions.into());
        o.into()
    }
}

impl Default for RegionEngine {
    fn default() -> Self {
        Self::new()
    }
}
