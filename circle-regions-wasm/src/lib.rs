use wasm_bindgen::prelude::*;
mod api;
mod error;
mod interop;

pub use api::{precision_digits, set_panic_hook, set_precision_digits};

#[wasm_bindgen]
pub struct RegionEngine {
    pub(crate) inner: circle_regions::RegionEngine,
}

impl RegionEngine {
    pub fn rs_new() -> RegionEngine {
        RegionEngine {
            inner: circle_regions::RegionEngine::new(),
        }
    }
    pub fn rs_geom_version(&self) -> u64 {
        self.inner.geom_version()
    }
}
