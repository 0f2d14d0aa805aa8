//! Region insertion: planar faces, extrusions and boxes.
//!
//! Regions are never intersected against each other. New geometry fuses with
//! existing geometry through the point index, and a planar region is split
//! wherever a pre-existing edge pierces it so that the crossing becomes a
//! shared vertex. Callers keep adjacent regions boundary-aligned.

use crate::algorithms::subdivide::{split_interval, CellGrid};
use crate::error::{GraphError, GraphResult};
use crate::geometry::intersect::line_plane;
use crate::geometry::limits::{point_in_bounds, MAX_KEY_POINTS};
use crate::model::{edge_key, BBox3, EdgeId, Line, Polygon, Vec3, VertexId};
use crate::Graph;
use std::collections::BTreeSet;
use tracing::debug;

fn check_inputs(boundary: &Polygon, key_points: &[Vec3]) -> GraphResult<()> {
    if boundary.vertices.len() < 3 {
        return Err(GraphError::invalid(format!(
            "boundary polygon needs at least 3 vertices, got {}",
            boundary.vertices.len()
        )));
    }
    if let Some(p) = boundary.vertices.iter().find(|p| !point_in_bounds(**p)) {
        return Err(GraphError::invalid(format!("boundary vertex out of bounds: {:?}", p)));
    }
    if key_points.len() > MAX_KEY_POINTS {
        return Err(GraphError::invalid(format!(
            "too many key points: {} > {}",
            key_points.len(),
            MAX_KEY_POINTS
        )));
    }
    if let Some(p) = key_points.iter().find(|p| !point_in_bounds(**p)) {
        return Err(GraphError::invalid(format!("key point out of bounds: {:?}", p)));
    }
    Ok(())
}

pub fn add_from_polygon_impl(g: &mut Graph, boundary: &Polygon, key_points: &[Vec3]) -> GraphResult<Vec<EdgeId>> {
    check_inputs(boundary, key_points)?;
    let tol = g.tolerance();
    let mut grid = CellGrid::new(boundary, tol)
        .ok_or_else(|| GraphError::invalid("boundary polygon is degenerate (no plane or zero extent)"))?;
    let plane = grid.frame().plane();

    // Snapshot before anything is added by this call.
    let edges_before: Vec<(EdgeId, Line)> = g
        .get_edges()
        .filter_map(|e| g.get_line(e.id).map(|l| (e.id, l)))
        .collect();

    for kp in key_points {
        grid.split_at_point(*kp);
    }
    // Edges piercing the region interior are cut at the crossing once the
    // region's vertices exist, so the crossing becomes a shared vertex.
    let mut piercing: Vec<(EdgeId, Vec3)> = Vec::new();
    for (eid, line) in &edges_before {
        let Some(p) = line_plane(line, &plane, tol) else {
            continue;
        };
        if !boundary.contains(p, tol) {
            continue;
        }
        grid.split_at_point(p);
        if !p.is_almost_equal_to(line.start, tol) && !p.is_almost_equal_to(line.end, tol) {
            piercing.push((*eid, p));
        }
    }

    let cells = grid.cells();
    let mut pairs: BTreeSet<(VertexId, VertexId)> = BTreeSet::new();
    let mut touched: Vec<VertexId> = Vec::new();
    for cell in &cells {
        let mut ids = Vec::with_capacity(cell.vertices.len());
        for p in &cell.vertices {
            ids.push(g.add_vertex(*p)?);
        }
        let n = ids.len();
        for i in 0..n {
            let (a, b) = (ids[i], ids[(i + 1) % n]);
            if a != b {
                pairs.insert(edge_key(a, b));
            }
        }
        touched.extend(ids);
    }

    let mut edges = Vec::with_capacity(pairs.len());
    for (a, b) in pairs {
        edges.push(g.add_edge(a, b)?);
    }
    g.prune_isolated(touched);
    for (eid, p) in &piercing {
        g.cut_edge(*eid, *p)?;
    }
    edges.sort_unstable();

    debug!(
        cells = cells.len(),
        splits = grid.split_count(),
        stitched = piercing.len(),
        edges = edges.len(),
        "inserted planar region"
    );
    Ok(edges)
}

pub fn add_from_extrusion_impl(
    g: &mut Graph,
    boundary: &Polygon,
    axis: Vec3,
    distance: f64,
    key_points: &[Vec3],
) -> GraphResult<()> {
    check_inputs(boundary, key_points)?;
    if !distance.is_finite() {
        return Err(GraphError::invalid(format!("non-finite extrusion distance {}", distance)));
    }
    let mut axis = axis
        .unit()
        .ok_or_else(|| GraphError::invalid(format!("extrusion axis has no direction: {:?}", axis)))?;
    let mut distance = distance;
    if distance < 0.0 {
        axis = -axis;
        distance = -distance;
    }
    let tol = g.tolerance();
    if distance <= tol {
        add_from_polygon_impl(g, boundary, key_points)?;
        return Ok(());
    }
    // Levels lie between the two faces; both are in bounds before mutating.
    let top = boundary.translated(axis * distance);
    if let Some(p) = top.vertices.iter().find(|p| !point_in_bounds(**p)) {
        return Err(GraphError::invalid(format!("extruded vertex out of bounds: {:?}", p)));
    }

    let origin = boundary.vertices[0];
    let heights: Vec<f64> = key_points.iter().map(|p| (*p - origin).dot(axis)).collect();
    let intervals = split_interval(0.0, distance, &heights, tol);

    let mut vertical = 0usize;
    for (h0, h1) in &intervals {
        let face = boundary.translated(axis * *h0);
        let edges = add_from_polygon_impl(g, &face, key_points)?;
        let mut level: BTreeSet<VertexId> = BTreeSet::new();
        for eid in &edges {
            if let Some(e) = g.get_edge(*eid) {
                level.insert(e.start);
                level.insert(e.end);
            }
        }
        let step = axis * (*h1 - *h0);
        for v in level {
            let Some(p) = g.get_vertex(v).map(|v| v.point) else {
                continue;
            };
            g.add_vertex_connected(p + step, &[v])?;
            vertical += 1;
        }
    }
    add_from_polygon_impl(g, &top, key_points)?;

    debug!(
        levels = intervals.len() + 1,
        vertical, "inserted extrusion"
    );
    Ok(())
}

pub fn add_from_box_impl(g: &mut Graph, bbox: &BBox3, key_points: &[Vec3]) -> GraphResult<()> {
    let (lo, hi) = (bbox.min, bbox.max);
    let boundary = Polygon::new(vec![
        Vec3::new(lo.x, lo.y, lo.z),
        Vec3::new(hi.x, lo.y, lo.z),
        Vec3::new(hi.x, hi.y, lo.z),
        Vec3::new(lo.x, hi.y, lo.z),
    ]);
    add_from_extrusion_impl(g, &boundary, Vec3::Z, hi.z - lo.z, key_points)
}
