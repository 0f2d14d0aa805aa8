//! Box subtraction.
//!
//! Every edge is classified against the box, then deletions are applied in
//! a second pass so that no classification sees a partially edited graph.
//! Z uses plain inequalities: an endpoint exactly at the box floor or
//! ceiling is inside. X and Y use the graph tolerance: an endpoint within
//! tolerance of a side face is outside, so edges running along the box
//! footprint survive.

use crate::error::GraphResult;
use crate::geometry::intersect::line_box;
use crate::geometry::tolerance::EPSILON;
use crate::model::{BBox3, EdgeId, Vec3, VertexId};
use crate::Graph;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{debug, trace, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Side {
    Low,
    Inside,
    High,
}

#[inline]
fn classify_exact(c: f64, lo: f64, hi: f64) -> Side {
    if c < lo {
        Side::Low
    } else if c > hi {
        Side::High
    } else {
        Side::Inside
    }
}

#[inline]
fn classify_tolerant(c: f64, lo: f64, hi: f64, tol: f64) -> Side {
    if c <= lo + tol {
        Side::Low
    } else if c >= hi - tol {
        Side::High
    } else {
        Side::Inside
    }
}

fn classify(p: Vec3, b: &BBox3, tol: f64) -> [Side; 3] {
    [
        classify_tolerant(p.x, b.min.x, b.max.x, tol),
        classify_tolerant(p.y, b.min.y, b.max.y, tol),
        classify_exact(p.z, b.min.z, b.max.z),
    ]
}

#[inline]
fn all_inside(c: &[Side; 3]) -> bool {
    c.iter().all(|s| *s == Side::Inside)
}

/// Outcome counts of one subtraction pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SubtractReport {
    /// Edges removed from the graph.
    pub deleted: usize,
    /// Edges created to reconnect trimmed remainders.
    pub reattached: usize,
    /// Partially inside edges the kernel found no crossing for; deleted.
    pub unresolved: usize,
}

pub fn subtract_box_impl(g: &mut Graph, bbox: &BBox3, remove_cut_edges: bool) -> GraphResult<SubtractReport> {
    let tol = g.tolerance();
    let scan: Vec<EdgeId> = g.get_edges().map(|e| e.id).collect();
    let mut victims: BTreeSet<EdgeId> = BTreeSet::new();
    let mut report = SubtractReport::default();

    for eid in scan {
        let Some(edge) = g.get_edge(eid).copied() else {
            continue;
        };
        let Some(line) = g.get_line(eid) else {
            debug_assert!(false, "edge {} has a missing endpoint", eid);
            continue;
        };
        let cs = classify(line.start, bbox, tol);
        let ce = classify(line.end, bbox, tol);

        let same_outside = (0..3).any(|i| cs[i] == ce[i] && cs[i] != Side::Inside);
        if same_outside {
            continue;
        }
        if all_inside(&cs) && all_inside(&ce) {
            trace!(edge = eid, "edge inside box");
            victims.insert(eid);
            continue;
        }

        let hits = line_box(&line, bbox, EPSILON);
        if hits.is_empty() {
            // Both ends outside on different axes: the segment may pass by
            // the box without touching it.
            if all_inside(&cs) || all_inside(&ce) {
                warn!(edge = eid, "partially inside edge has no box crossing; deleting");
                victims.insert(eid);
                report.unresolved += 1;
            } else {
                trace!(edge = eid, "edge misses box");
            }
            continue;
        }
        victims.insert(eid);
        match hits.len() {
            1 => {
                trace!(edge = eid, "edge crosses one box face");
                if !remove_cut_edges {
                    if !all_inside(&cs) {
                        report.reattached += reattach(g, hits[0], edge.start, eid, &victims)?;
                    }
                    if !all_inside(&ce) {
                        report.reattached += reattach(g, hits[0], edge.end, eid, &victims)?;
                    }
                }
            }
            _ => {
                trace!(edge = eid, "edge passes through box");
                if !remove_cut_edges {
                    report.reattached += reattach(g, hits[0], edge.start, eid, &victims)?;
                    report.reattached += reattach(g, hits[hits.len() - 1], edge.end, eid, &victims)?;
                }
            }
        }
    }

    for eid in &victims {
        if g.delete_edge(*eid) {
            report.deleted += 1;
        }
    }
    debug!(
        deleted = report.deleted,
        reattached = report.reattached,
        unresolved = report.unresolved,
        "subtracted box"
    );
    Ok(report)
}

/// Connects the cut point to `anchor`. Nothing is added when the cut point
/// fuses with the anchor or when the resulting edge is already slated for
/// deletion. Returns the number of edges created.
fn reattach(
    g: &mut Graph,
    point: Vec3,
    anchor: VertexId,
    current: EdgeId,
    victims: &BTreeSet<EdgeId>,
) -> GraphResult<usize> {
    if let Some(v) = g.try_get_vertex_index(point, None) {
        if v == anchor {
            return Ok(0);
        }
        if let Some(e) = g.find_edge(v, anchor) {
            if e == current || victims.contains(&e) {
                return Ok(0);
            }
        }
    }
    let before = g.edge_count();
    g.add_vertex_connected(point, &[anchor])?;
    Ok(g.edge_count() - before)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tolerant_faces_count_as_outside() {
        assert_eq!(classify_tolerant(0.25, 0.25, 0.75, 1e-5), Side::Low);
        assert_eq!(classify_tolerant(0.75 - 5e-6, 0.25, 0.75, 1e-5), Side::High);
        assert_eq!(classify_tolerant(0.5, 0.25, 0.75, 1e-5), Side::Inside);
    }

    #[test]
    fn exact_faces_count_as_inside() {
        assert_eq!(classify_exact(0.0, 0.0, 1.0), Side::Inside);
        assert_eq!(classify_exact(1.0, 0.0, 1.0), Side::Inside);
        assert_eq!(classify_exact(1.0 + 1e-9, 0.0, 1.0), Side::High);
    }
}
