use js_sys::{Float64Array, Object, Reflect, Uint32Array};
use spacegrid::Vec3;
use wasm_bindgen::JsValue;

pub fn new_obj() -> Object { Object::new() }
pub fn set_kv(obj: &Object, k: &str, v: &JsValue) {
    let _ = Reflect::set(obj, &JsValue::from_str(k), v);
}
pub fn arr_u32(slice: &[u32]) -> Uint32Array {
    let arr = Uint32Array::new_with_length(slice.len() as u32);
    arr.copy_from(slice); arr
}
pub fn arr_f64(slice: &[f64]) -> Float64Array {
    let arr = Float64Array::new_with_length(slice.len() as u32);
    arr.copy_from(slice); arr
}

/// Ids cross the boundary as u32; the core never allocates that many.
pub fn js_id(id: u64) -> u32 { u32::try_from(id).unwrap_or(u32::MAX) }

/// Packed `[x0, y0, z0, x1, ...]` into points. `None` when the length is
/// not a multiple of three.
pub fn points(flat: &[f64]) -> Option<Vec<Vec3>> {
    if flat.len() % 3 != 0 {
        return None;
    }
    Some(flat.chunks_exact(3).map(|c| Vec3::new(c[0], c[1], c[2])).collect())
}
