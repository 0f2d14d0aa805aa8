use crate::error;
use crate::interop::{arr_f64, arr_u32, js_id, new_obj, points, set_kv};
use crate::Graph;
use js_sys::Uint32Array;
use serde::Serialize;
use spacegrid::{BBox3, GraphResult, Vec3};
use wasm_bindgen::prelude::*;
type JsValue = wasm_bindgen::JsValue;

#[wasm_bindgen]
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn check_finite(names: &[&str], values: &[f64]) -> Result<(), JsValue> {
    for (n, v) in names.iter().zip(values) {
        if !v.is_finite() {
            return Err(error::non_finite(n));
        }
    }
    Ok(())
}

fn parse_points(param: &str, flat: &[f64]) -> Result<Vec<Vec3>, JsValue> {
    points(flat).ok_or_else(|| error::bad_points(param, flat.len()))
}

fn to_js<T: Serialize + ?Sized>(v: &T) -> JsValue {
    v.serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .unwrap_or(JsValue::NULL)
}

fn res<T>(r: GraphResult<T>, f: impl FnOnce(T) -> JsValue) -> JsValue {
    match r {
        Ok(v) => error::ok(f(v)),
        Err(e) => error::graph(&e),
    }
}

#[wasm_bindgen]
impl Graph {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Graph {
        crate::Graph::rs_new()
    }
    /// `{ok: true, value: Graph}` or a `bad_config`-style error.
    pub fn with_tolerance_res(tolerance: f64) -> JsValue {
        if !tolerance.is_finite() {
            return error::non_finite("tolerance");
        }
        match crate::Graph::rs_with_tolerance(tolerance) {
            Ok(g) => error::ok(g.into()),
            Err(e) => error::graph(&e),
        }
    }
    pub fn tolerance(&self) -> f64 {
        self.inner.tolerance()
    }
    pub fn vertex_count(&self) -> u32 {
        self.inner.vertex_count() as u32
    }
    pub fn edge_count(&self) -> u32 {
        self.inner.edge_count() as u32
    }
    pub fn clear(&mut self) {
        self.inner.clear();
    }

    // Regions
    #[allow(clippy::too_many_arguments)]
    pub fn add_from_box(
        &mut self,
        min_x: f64,
        min_y: f64,
        min_z: f64,
        max_x: f64,
        max_y: f64,
        max_z: f64,
        key_points: &[f64],
    ) -> bool {
        !is_err(&self.add_from_box_res(min_x, min_y, min_z, max_x, max_y, max_z, key_points))
    }
    #[allow(clippy::too_many_arguments)]
    pub fn add_from_box_res(
        &mut self,
        min_x: f64,
        min_y: f64,
        min_z: f64,
        max_x: f64,
        max_y: f64,
        max_z: f64,
        key_points: &[f64],
    ) -> JsValue {
        let coords = [min_x, min_y, min_z, max_x, max_y, max_z];
        if let Err(e) = check_finite(&["min_x", "min_y", "min_z", "max_x", "max_y", "max_z"], &coords) {
            return e;
        }
        let kps = match parse_points("key_points", key_points) {
            Ok(p) => p,
            Err(e) => return e,
        };
        let bbox = BBox3::new(Vec3::new(min_x, min_y, min_z), Vec3::new(max_x, max_y, max_z));
        res(self.inner.add_from_box(&bbox, &kps), |_| JsValue::TRUE)
    }
    /// Edge ids of the inserted region; empty on invalid input.
    pub fn add_from_polygon(&mut self, boundary: &[f64], key_points: &[f64]) -> Uint32Array {
        let (Some(b), Some(k)) = (points(boundary), points(key_points)) else {
            return arr_u32(&[]);
        };
        match self.inner.add_from_polygon(&spacegrid::Polygon::new(b), &k) {
            Ok(edges) => arr_u32(&edges.into_iter().map(js_id).collect::<Vec<_>>()),
            Err(_) => arr_u32(&[]),
        }
    }
    pub fn add_from_polygon_res(&mut self, boundary: &[f64], key_points: &[f64]) -> JsValue {
        let b = match parse_points("boundary", boundary) {
            Ok(p) => p,
            Err(e) => return e,
        };
        let k = match parse_points("key_points", key_points) {
            Ok(p) => p,
            Err(e) => return e,
        };
        res(self.inner.add_from_polygon(&spacegrid::Polygon::new(b), &k), |edges| {
            arr_u32(&edges.into_iter().map(js_id).collect::<Vec<_>>()).into()
        })
    }
    #[allow(clippy::too_many_arguments)]
    pub fn add_from_extrusion(
        &mut self,
        boundary: &[f64],
        axis_x: f64,
        axis_y: f64,
        axis_z: f64,
        distance: f64,
        key_points: &[f64],
    ) -> bool {
        !is_err(&self.add_from_extrusion_res(boundary, axis_x, axis_y, axis_z, distance, key_points))
    }
    pub fn add_from_extrusion_res(
        &mut self,
        boundary: &[f64],
        axis_x: f64,
        axis_y: f64,
        axis_z: f64,
        distance: f64,
        key_points: &[f64],
    ) -> JsValue {
        if let Err(e) = check_finite(&["axis_x", "axis_y", "axis_z", "distance"], &[axis_x, axis_y, axis_z, distance]) {
            return e;
        }
        let b = match parse_points("boundary", boundary) {
            Ok(p) => p,
            Err(e) => return e,
        };
        let k = match parse_points("key_points", key_points) {
            Ok(p) => p,
            Err(e) => return e,
        };
        let axis = Vec3::new(axis_x, axis_y, axis_z);
        res(
            self.inner.add_from_extrusion(&spacegrid::Polygon::new(b), axis, distance, &k),
            |_| JsValue::TRUE,
        )
    }

    /// `{deleted, reattached, unresolved}`, or null on invalid input.
    #[allow(clippy::too_many_arguments)]
    pub fn subtract_box(
        &mut self,
        min_x: f64,
        min_y: f64,
        min_z: f64,
        max_x: f64,
        max_y: f64,
        max_z: f64,
        remove_cut_edges: bool,
    ) -> JsValue {
        let coords = [min_x, min_y, min_z, max_x, max_y, max_z];
        if coords.iter().any(|c| !c.is_finite()) {
            return JsValue::NULL;
        }
        let bbox = BBox3::new(Vec3::new(min_x, min_y, min_z), Vec3::new(max_x, max_y, max_z));
        match self.inner.subtract_box(&bbox, remove_cut_edges) {
            Ok(report) => to_js(&report),
            Err(_) => JsValue::NULL,
        }
    }

    // Vertices/Edges
    pub fn get_vertex(&self, id: u32) -> JsValue {
        match self.inner.get_vertex(id as u64) {
            Some(v) => to_js(&[v.point.x, v.point.y, v.point.z]),
            None => JsValue::NULL,
        }
    }
    pub fn try_get_vertex_index(&self, x: f64, y: f64, z: f64, tolerance: Option<f64>) -> Option<u32> {
        self.inner
            .try_get_vertex_index(Vec3::new(x, y, z), tolerance)
            .map(js_id)
    }
    pub fn add_vertex_connected_res(&mut self, x: f64, y: f64, z: f64, connections: &[u32]) -> JsValue {
        if let Err(e) = check_finite(&["x", "y", "z"], &[x, y, z]) {
            return e;
        }
        if let Some(bad) = connections.iter().find(|c| self.inner.get_vertex(**c as u64).is_none()) {
            return error::invalid_id("vertex", *bad);
        }
        let ids: Vec<u64> = connections.iter().map(|c| *c as u64).collect();
        res(self.inner.add_vertex_connected(Vec3::new(x, y, z), &ids), |id| {
            JsValue::from_f64(js_id(id) as f64)
        })
    }
    pub fn delete_edge(&mut self, id: u32) -> bool {
        self.inner.delete_edge(id as u64)
    }
    pub fn delete_edge_res(&mut self, id: u32) -> JsValue {
        if self.inner.get_edge(id as u64).is_none() {
            return error::invalid_id("edge", id);
        }
        error::ok(JsValue::from_bool(self.inner.delete_edge(id as u64)))
    }

    // Typed arrays getters
    pub fn get_vertex_data(&self) -> JsValue {
        let mut ids = Vec::with_capacity(self.inner.vertex_count());
        let mut pos = Vec::with_capacity(self.inner.vertex_count() * 3);
        for v in self.inner.get_vertices() {
            ids.push(js_id(v.id));
            pos.extend_from_slice(&[v.point.x, v.point.y, v.point.z]);
        }
        let obj = new_obj();
        set_kv(&obj, "ids", &arr_u32(&ids).into());
        set_kv(&obj, "positions", &arr_f64(&pos).into());
        obj.into()
    }
    pub fn get_edge_data(&self) -> JsValue {
        let mut ids = Vec::with_capacity(self.inner.edge_count());
        let mut endpoints = Vec::with_capacity(self.inner.edge_count() * 2);
        for e in self.inner.get_edges() {
            ids.push(js_id(e.id));
            endpoints.push(js_id(e.start));
            endpoints.push(js_id(e.end));
        }
        let obj = new_obj();
        set_kv(&obj, "ids", &arr_u32(&ids).into());
        set_kv(&obj, "endpoints", &arr_u32(&endpoints).into());
        obj.into()
    }

    // Persistence
    pub fn to_json(&self) -> JsValue {
        to_js(&self.inner.to_json_value())
    }
    pub fn from_json(&mut self, v: JsValue) -> bool {
        match serde_wasm_bindgen::from_value::<serde_json::Value>(v) {
            Ok(val) => self.inner.from_json_value(val),
            Err(e) => {
                web_sys::console::warn_1(&JsValue::from_str(&format!("from_json: {}", e)));
                false
            }
        }
    }
    pub fn from_json_res(&mut self, v: JsValue) -> JsValue {
        match serde_wasm_bindgen::from_value::<serde_json::Value>(v) {
            Ok(val) => res(self.inner.from_json_value_strict(val), |_| JsValue::TRUE),
            Err(e) => error::err("json_parse", format!("{}", e), None),
        }
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

fn is_err(v: &JsValue) -> bool {
    js_sys::Reflect::get(v, &JsValue::from_str("ok"))
        .ok()
        .and_then(|x| x.as_bool())
        .map_or(true, |ok| !ok)
}
