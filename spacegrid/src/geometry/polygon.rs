//! Planar polygon helpers: plane/frame derivation, boundary-inclusive
//! containment and rectangle clipping in the polygon's local frame.

use super::math::{first_edge_direction, newell_normal, plane_distance, seg_distance_sq_2d, PlaneFrame};
use crate::model::{Polygon, Vec3};

impl Polygon {
    /// Local frame: origin at the first vertex, `u` along the first
    /// non-degenerate edge.
    pub fn frame(&self) -> Option<PlaneFrame> {
        let normal = newell_normal(&self.vertices)?;
        let dir = first_edge_direction(&self.vertices)?;
        PlaneFrame::new(self.vertices[0], normal, dir)
    }

    /// Polygon projected into `frame`.
    pub fn to_local(&self, frame: &PlaneFrame) -> Vec<(f64, f64)> {
        self.vertices.iter().map(|p| frame.to_local(*p)).collect()
    }

    /// Whether `p` lies on the polygon's plane (within `eps`) and inside
    /// or on the boundary of the polygon.
    pub fn contains(&self, p: Vec3, eps: f64) -> bool {
        let Some(frame) = self.frame() else {
            return false;
        };
        if plane_distance(&frame.plane(), p).abs() > eps {
            return false;
        }
        let (px, py) = frame.to_local(p);
        let local = self.to_local(&frame);
        point_in_polygon_2d(px, py, &local, eps)
    }

    /// Drops consecutive vertices that coincide within `eps`, including a
    /// closing duplicate of the first vertex.
    pub fn deduplicated(&self, eps: f64) -> Polygon {
        let mut out: Vec<Vec3> = Vec::with_capacity(self.vertices.len());
        for p in &self.vertices {
            if out.last().map_or(true, |q| !q.is_almost_equal_to(*p, eps)) {
                out.push(*p);
            }
        }
        while out.len() > 1 && out[0].is_almost_equal_to(out[out.len() - 1], eps) {
            out.pop();
        }
        Polygon { vertices: out }
    }
}

/// Crossing-number containment, boundary inclusive within `eps`.
pub fn point_in_polygon_2d(px: f64, py: f64, poly: &[(f64, f64)], eps: f64) -> bool {
    let n = poly.len();
    if n < 3 {
        return false;
    }
    let eps2 = eps * eps;
    for i in 0..n {
        let (x1, y1) = poly[i];
        let (x2, y2) = poly[(i + 1) % n];
        if seg_distance_sq_2d(px, py, x1, y1, x2, y2) <= eps2 {
            return true;
        }
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi) = poly[i];
        let (xj, yj) = poly[j];
        if (yi > py) != (yj > py) {
            let x_cross = (xj - xi) * (py - yi) / (yj - yi) + xi;
            if px < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Signed area (positive = counter-clockwise).
pub fn signed_area_2d(poly: &[(f64, f64)]) -> f64 {
    let n = poly.len();
    let mut a = 0.0;
    for i in 0..n {
        let (x1, y1) = poly[i];
        let (x2, y2) = poly[(i + 1) % n];
        a += x1 * y2 - x2 * y1;
    }
    0.5 * a
}

/// Sutherland–Hodgman clip of `subject` against the axis-aligned rectangle
/// `[u0,u1] x [v0,v1]`. The rectangle is convex, so non-convex subjects
/// are handled; disjoint pieces come back joined along the rectangle edge.
pub fn clip_to_rect(subject: &[(f64, f64)], u0: f64, u1: f64, v0: f64, v1: f64) -> Vec<(f64, f64)> {
    #[derive(Clone, Copy)]
    enum Side {
        Left(f64),
        Right(f64),
        Bottom(f64),
        Top(f64),
    }
    fn inside(p: (f64, f64), s: Side) -> bool {
        match s {
            Side::Left(u) => p.0 >= u,
            Side::Right(u) => p.0 <= u,
            Side::Bottom(v) => p.1 >= v,
            Side::Top(v) => p.1 <= v,
        }
    }
    fn cross(a: (f64, f64), b: (f64, f64), s: Side) -> (f64, f64) {
        match s {
            Side::Left(u) | Side::Right(u) => {
                let t = (u - a.0) / (b.0 - a.0);
                (u, a.1 + (b.1 - a.1) * t)
            }
            Side::Bottom(v) | Side::Top(v) => {
                let t = (v - a.1) / (b.1 - a.1);
                (a.0 + (b.0 - a.0) * t, v)
            }
        }
    }
    let mut out: Vec<(f64, f64)> = subject.to_vec();
    for side in [Side::Left(u0), Side::Right(u1), Side::Bottom(v0), Side::Top(v1)] {
        if out.is_empty() {
            break;
        }
        let input = std::mem::take(&mut out);
        let n = input.len();
        for i in 0..n {
            let cur = input[i];
            let prev = input[(i + n - 1) % n];
            let cur_in = inside(cur, side);
            let prev_in = inside(prev, side);
            if cur_in {
                if !prev_in {
                    out.push(cross(prev, cur, side));
                }
                out.push(cur);
            } else if prev_in {
                out.push(cross(prev, cur, side));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Polygon {
        Polygon::new(vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ])
    }

    #[test]
    fn contains_interior_and_boundary() {
        let sq = square();
        assert!(sq.contains(Vec3::new(0.5, 0.5, 0.0), 1e-5));
        assert!(sq.contains(Vec3::new(1.0, 0.3, 0.0), 1e-5));
        assert!(!sq.contains(Vec3::new(1.5, 0.5, 0.0), 1e-5));
        assert!(!sq.contains(Vec3::new(0.5, 0.5, 0.1), 1e-5));
    }

    #[test]
    fn clip_keeps_inner_quarter() {
        let sq = vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];
        let c = clip_to_rect(&sq, 0.0, 0.5, 0.0, 0.5);
        assert!((signed_area_2d(&c) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn clip_l_shape_notch() {
        let l = vec![(0.0, 0.0), (2.0, 0.0), (2.0, 1.0), (1.0, 1.0), (1.0, 2.0), (0.0, 2.0)];
        let c = clip_to_rect(&l, 1.0, 2.0, 1.0, 2.0);
        assert!(signed_area_2d(&c).abs() < 1e-12);
    }

    #[test]
    fn dedup_removes_closing_duplicate() {
        let mut p = square();
        p.vertices.push(Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(p.deduplicated(1e-9).vertices.len(), 4);
    }
}
