use wasm_bindgen::prelude::*;
mod api;
mod error;
mod interop;

#[wasm_bindgen]
pub struct Graph {
    pub(crate) inner: spacegrid::Graph,
}

impl Graph {
    pub fn rs_new() -> Graph {
        Graph { inner: spacegrid::Graph::new() }
    }
    pub fn rs_with_tolerance(tolerance: f64) -> spacegrid::GraphResult<Graph> {
        let config = spacegrid::GridConfig::new().with_tolerance(tolerance);
        Ok(Graph { inner: spacegrid::Graph::with_config(config)? })
    }
}
