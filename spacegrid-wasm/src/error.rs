use crate::interop::{new_obj, set_kv};
use spacegrid::GraphError;
use wasm_bindgen::prelude::*;

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
pub fn bad_points(param: &str, len: usize) -> JsValue {
    let d = new_obj();
    set_kv(&d, "param", &JsValue::from_str(param));
    set_kv(&d, "len", &JsValue::from_f64(len as f64));
    err("invalid_argument", format!("parameter '{}' must hold xyz triples", param), Some(d.into()))
}

#[inline]
pub fn invalid_id(kind: &str, id: u32) -> JsValue {
    let d = new_obj();
    set_kv(&d, "kind", &JsValue::from_str(kind));
    set_kv(&d, "id", &JsValue::from_f64(id as f64));
    err("invalid_id", format!("invalid {} id", kind), Some(d.into()))
}

/// Core errors keep their own code (`invalid_argument` or a persist code).
pub fn graph(e: &GraphError) -> JsValue {
    err(e.code(), e.to_string(), None)
}
