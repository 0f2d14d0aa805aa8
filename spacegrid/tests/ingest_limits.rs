mod helpers;

use helpers::{unit_square, v};
use serde_json::json;
use spacegrid::geometry::limits::{COORD_MAX, MAX_KEY_POINTS};
use spacegrid::{Graph, Vec3};

#[test]
fn json_coordinate_out_of_bounds() {
    let mut g = Graph::new();
    let doc = json!({
        "version": 1,
        "vertices": { "1": {"x":1.0e38,"y":0.0,"z":0.0}, "2": {"x":0.0,"y":0.0,"z":0.0} },
        "edges": { "1": {"a":1,"b":2} }
    });
    assert!(!g.from_json_value(doc.clone()));
    assert_eq!(g.from_json_value_strict(doc).unwrap_err().code(), "out_of_bounds");
}

#[test]
fn json_bad_tolerance() {
    let mut g = Graph::new();
    let doc = json!({"version": 1, "tolerance": -0.5, "vertices": {}, "edges": {}});
    assert_eq!(g.from_json_value_strict(doc).unwrap_err().code(), "bad_config");
}

#[test]
fn json_wrong_shape() {
    let mut g = Graph::new();
    let doc = json!({"version": 1, "vertices": [1, 2, 3]});
    assert_eq!(g.from_json_value_strict(doc).unwrap_err().code(), "json_parse");
}

#[test]
fn too_many_key_points() {
    let mut g = Graph::new();
    let kps = vec![v(0.5, 0.5, 0.0); MAX_KEY_POINTS + 1];
    assert!(g.add_from_polygon(&unit_square(0.0), &kps).is_err());
    assert_eq!(g.vertex_count(), 0);
}

#[test]
fn coordinates_beyond_bounds_are_rejected() {
    let mut g = Graph::new();
    let far = COORD_MAX * 2.0;
    assert!(g.add_polyline(&[v(0.0, 0.0, 0.0), v(far, 0.0, 0.0)]).is_err());
    assert!(g.add_from_polygon(&unit_square(far), &[]).is_err());
    assert_eq!(g.vertex_count(), 0);
}

#[test]
fn json_vertex_id_beyond_cap_is_rejected() {
    let mut g = Graph::new();
    let doc = json!({
        "version": 1,
        "vertices": {
            "1": {"x":0.0,"y":0.0,"z":0.0},
            "18446744073709551615": {"x":1.0,"y":0.0,"z":0.0}
        },
        "edges": { "1": {"a":1,"b":18446744073709551615u64} }
    });
    assert_eq!(g.from_json_value_strict(doc).unwrap_err().code(), "caps_exceeded");
    assert_eq!(g.vertex_count(), 0);
}

#[test]
fn json_oversized_ids_are_dropped_by_lenient_load() {
    let mut g = Graph::new();
    let doc = json!({
        "version": 1,
        "vertices": {
            "1": {"x":0.0,"y":0.0,"z":0.0},
            "2": {"x":1.0,"y":0.0,"z":0.0},
            "1000000000000": {"x":2.0,"y":0.0,"z":0.0}
        },
        "edges": {
            "1": {"a":1,"b":2},
            "2": {"a":2,"b":1000000000000u64},
            "1000000000000": {"a":1,"b":2}
        }
    });
    assert!(g.from_json_value(doc.clone()));
    assert_eq!(g.vertex_count(), 2);
    assert_eq!(g.edge_count(), 1);
    assert_eq!(g.find_edge(1, 2), Some(1));
    assert_eq!(g.from_json_value_strict(doc).unwrap_err().code(), "caps_exceeded");
}

#[test]
fn extrusion_leaving_bounds_inserts_nothing() {
    let mut g = Graph::new();
    let base = unit_square(0.9e9);
    assert!(g.add_from_extrusion(&base, Vec3::Z, 0.2e9, &[]).is_err());
    assert!(g.add_from_extrusion(&base, Vec3::Z, -2.0e9, &[]).is_err());
    assert_eq!(g.vertex_count(), 0);
    assert_eq!(g.edge_count(), 0);
    assert!(g.add_from_extrusion(&base, Vec3::Z, 0.05e9, &[]).is_ok());
}
