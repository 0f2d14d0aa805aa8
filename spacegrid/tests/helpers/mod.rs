#![allow(dead_code)]

use spacegrid::{Graph, Polygon, Vec3};
use std::collections::HashSet;

pub fn v(x: f64, y: f64, z: f64) -> Vec3 {
    Vec3::new(x, y, z)
}

pub fn unit_square(z: f64) -> Polygon {
    Polygon::new(vec![v(0.0, 0.0, z), v(1.0, 0.0, z), v(1.0, 1.0, z), v(0.0, 1.0, z)])
}

pub fn rect(x0: f64, y0: f64, x1: f64, y1: f64, z: f64) -> Polygon {
    Polygon::new(vec![v(x0, y0, z), v(x1, y0, z), v(x1, y1, z), v(x0, y1, z)])
}

/// Panics with a description of the first broken graph invariant.
pub fn assert_consistent(g: &Graph) {
    let mut pairs = HashSet::new();
    let mut edge_total = 0usize;
    for e in g.get_edges() {
        edge_total += 1;
        assert_ne!(e.start, e.end, "edge {} is a self loop", e.id);
        let a = g.get_vertex(e.start).unwrap_or_else(|| panic!("edge {} start missing", e.id));
        let b = g.get_vertex(e.end).unwrap_or_else(|| panic!("edge {} end missing", e.id));
        assert!(a.edges.contains(&e.id), "vertex {} does not list edge {}", a.id, e.id);
        assert!(b.edges.contains(&e.id), "vertex {} does not list edge {}", b.id, e.id);
        assert!(pairs.insert(e.key()), "duplicate edge for pair {:?}", e.key());
        assert_eq!(g.find_edge(e.end, e.start), Some(e.id));
    }
    assert_eq!(edge_total, g.edge_count());

    let mut vertex_total = 0usize;
    for vx in g.get_vertices() {
        vertex_total += 1;
        assert_ne!(vx.id, 0, "vertex id 0 is reserved");
        assert!(!vx.edges.is_empty(), "vertex {} is isolated", vx.id);
        for eid in &vx.edges {
            let e = g.get_edge(*eid).unwrap_or_else(|| panic!("vertex {} lists dead edge {}", vx.id, eid));
            assert!(e.start == vx.id || e.end == vx.id);
        }
        assert_eq!(g.point_index().find_exact(vx.point), Some(vx.id), "vertex {} not indexed", vx.id);
    }
    assert_eq!(vertex_total, g.vertex_count());
    assert_eq!(g.point_index().len(), g.vertex_count(), "point index holds stale entries");
}
