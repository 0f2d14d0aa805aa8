mod helpers;

use helpers::{assert_consistent, rect, v};
use proptest::prelude::*;
use spacegrid::{BBox3, Graph, Vec3};
use std::collections::BTreeSet;

#[derive(Clone, Debug)]
enum Op {
    Polyline { pts: Vec<(i8, i8, i8)> },
    AddEdge { a: u16, b: u16 },
    DeleteEdge { idx: u16 },
    CutEdge { idx: u16, t_num: u8 },
    Region { x: i8, y: i8, w: u8, h: u8, z: i8 },
    Extrude { x: i8, y: i8, w: u8, h: u8, z: i8, d: i8 },
    Subtract { x: i8, y: i8, z: i8, w: u8, h: u8, d: u8, remove: bool },
}

fn coord() -> impl Strategy<Value = i8> {
    -8i8..=8i8
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        prop::collection::vec((coord(), coord(), coord()), 2..5).prop_map(|pts| Op::Polyline { pts }),
        (any::<u16>(), any::<u16>()).prop_map(|(a, b)| Op::AddEdge { a, b }),
        any::<u16>().prop_map(|idx| Op::DeleteEdge { idx }),
        (any::<u16>(), any::<u8>()).prop_map(|(idx, t_num)| Op::CutEdge { idx, t_num }),
        (coord(), coord(), 0u8..6, 0u8..6, coord()).prop_map(|(x, y, w, h, z)| Op::Region { x, y, w, h, z }),
        (coord(), coord(), 1u8..4, 1u8..4, coord(), -3i8..=3i8)
            .prop_map(|(x, y, w, h, z, d)| Op::Extrude { x, y, w, h, z, d }),
        (coord(), coord(), coord(), 0u8..6, 0u8..6, 0u8..6, any::<bool>())
            .prop_map(|(x, y, z, w, h, d, remove)| Op::Subtract { x, y, z, w, h, d, remove }),
    ]
}

fn p(c: (i8, i8, i8)) -> Vec3 {
    v(c.0 as f64 * 0.5, c.1 as f64 * 0.5, c.2 as f64 * 0.5)
}

fn apply_op(g: &mut Graph, op: Op) {
    let vertices: Vec<u64> = g.get_vertices().map(|x| x.id).collect();
    let edges: Vec<u64> = g.get_edges().map(|e| e.id).collect();
    match op {
        Op::Polyline { pts } => {
            let pts: Vec<Vec3> = pts.into_iter().map(p).collect();
            let _ = g.add_polyline(&pts);
        }
        Op::AddEdge { a, b } => {
            if vertices.len() < 2 {
                return;
            }
            let a = vertices[a as usize % vertices.len()];
            let b = vertices[b as usize % vertices.len()];
            let _ = g.add_edge(a, b);
        }
        Op::DeleteEdge { idx } => {
            if edges.is_empty() {
                return;
            }
            g.delete_edge(edges[idx as usize % edges.len()]);
        }
        Op::CutEdge { idx, t_num } => {
            if edges.is_empty() {
                return;
            }
            let eid = edges[idx as usize % edges.len()];
            if let Some(line) = g.get_line(eid) {
                let _ = g.cut_edge(eid, line.point_at(t_num as f64 / 255.0));
            }
        }
        Op::Region { x, y, w, h, z } => {
            let (x0, y0) = (x as f64 * 0.5, y as f64 * 0.5);
            let poly = rect(x0, y0, x0 + w as f64 * 0.5, y0 + h as f64 * 0.5, z as f64 * 0.5);
            let _ = g.add_from_polygon(&poly, &[]);
        }
        Op::Extrude { x, y, w, h, z, d } => {
            let (x0, y0) = (x as f64 * 0.5, y as f64 * 0.5);
            let poly = rect(x0, y0, x0 + w as f64 * 0.5, y0 + h as f64 * 0.5, z as f64 * 0.5);
            let _ = g.add_from_extrusion(&poly, Vec3::Z, d as f64 * 0.5, &[]);
        }
        Op::Subtract { x, y, z, w, h, d, remove } => {
            let lo = p((x, y, z));
            let hi = lo + v(w as f64 * 0.5, h as f64 * 0.5, d as f64 * 0.5);
            let _ = g.subtract_box(&BBox3::new(lo, hi), remove);
        }
    }
}

fn sequence_strategy() -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(op_strategy(), 5..25)
}

/// Endpoints on a unit lattice with jitter well below the fusion tolerance.
fn jittered_segment() -> impl Strategy<Value = ((i8, i8, i8), (i8, i8, i8), [i8; 6])> {
    let site = (-3i8..=3i8, -3i8..=3i8, -3i8..=3i8);
    (site.clone(), site, prop::array::uniform6(-4i8..=4i8))
}

fn jitter(site: (i8, i8, i8), j: &[i8]) -> Vec3 {
    v(
        site.0 as f64 + j[0] as f64 * 1e-6,
        site.1 as f64 + j[1] as f64 * 1e-6,
        site.2 as f64 + j[2] as f64 * 1e-6,
    )
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 512, .. ProptestConfig::default() })]
    #[test]
    fn graph_edit_invariants(seq in sequence_strategy()) {
        let mut graph = Graph::new();
        for op in seq {
            apply_op(&mut graph, op);
            assert_consistent(&graph);
        }
        let mut reloaded = Graph::new();
        prop_assert!(reloaded.from_json_value_strict(graph.to_json_value()).is_ok());
        prop_assert_eq!(reloaded.vertex_count(), graph.vertex_count());
        prop_assert_eq!(reloaded.edge_count(), graph.edge_count());
    }

    #[test]
    fn fusion_does_not_depend_on_insertion_order(
        segs in prop::collection::vec(jittered_segment(), 1..20)
    ) {
        let mut sites = BTreeSet::new();
        let mut pairs = BTreeSet::new();
        for (a, b, _) in &segs {
            if a != b {
                sites.insert(*a);
                sites.insert(*b);
                pairs.insert(if a < b { (*a, *b) } else { (*b, *a) });
            }
        }

        let mut forward = Graph::new();
        for (a, b, j) in &segs {
            let _ = forward.add_polyline(&[jitter(*a, &j[..3]), jitter(*b, &j[3..])]);
        }
        let mut backward = Graph::new();
        for (a, b, j) in segs.iter().rev() {
            let _ = backward.add_polyline(&[jitter(*b, &j[3..]), jitter(*a, &j[..3])]);
        }

        for g in [&forward, &backward] {
            prop_assert_eq!(g.vertex_count(), sites.len());
            prop_assert_eq!(g.edge_count(), pairs.len());
            assert_consistent(g);
        }
    }
}
