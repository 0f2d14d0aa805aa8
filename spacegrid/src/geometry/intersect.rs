// Segment intersections against planes and axis-aligned boxes.
// Tolerances are in model units and converted to segment parameter space.

use super::math::plane_distance;
use super::tolerance::{safe_div, EPS_DENOM};
use crate::model::{BBox3, Line, Plane, Vec3};

/// Point where the segment crosses the plane, endpoints included within
/// `eps`. Segments parallel to the plane (including ones lying in it)
/// report no intersection.
pub fn line_plane(line: &Line, plane: &Plane, eps: f64) -> Option<Vec3> {
    let dir = line.direction();
    let len = dir.length();
    if len <= EPS_DENOM {
        return None;
    }
    let denom = dir.dot(plane.normal);
    if denom.abs() <= EPS_DENOM * len {
        return None;
    }
    let t = -plane_distance(plane, line.start) / denom;
    let eps_t = eps / len;
    if t < -eps_t || t > 1.0 + eps_t {
        return None;
    }
    Some(line.point_at(t.clamp(0.0, 1.0)))
}

/// Points where the segment meets the surface of the box, ordered from the
/// segment start. At most two; a tangent contact yields one. An endpoint
/// strictly inside the box is not itself a surface point.
pub fn line_box(line: &Line, bbox: &BBox3, eps: f64) -> Vec<Vec3> {
    let dir = line.direction();
    let len = dir.length();
    if len <= EPS_DENOM {
        return Vec::new();
    }
    let eps_t = eps / len;
    let mut t_enter = f64::NEG_INFINITY;
    let mut t_exit = f64::INFINITY;
    let axes = [
        (line.start.x, dir.x, bbox.min.x, bbox.max.x),
        (line.start.y, dir.y, bbox.min.y, bbox.max.y),
        (line.start.z, dir.z, bbox.min.z, bbox.max.z),
    ];
    for (s, d, lo, hi) in axes {
        if d.abs() <= EPS_DENOM * len {
            if s < lo - eps || s > hi + eps {
                return Vec::new();
            }
            continue;
        }
        let t1 = safe_div(lo - s, d, f64::NEG_INFINITY);
        let t2 = safe_div(hi - s, d, f64::INFINITY);
        let (a, b) = if t1 <= t2 { (t1, t2) } else { (t2, t1) };
        t_enter = t_enter.max(a);
        t_exit = t_exit.min(b);
    }
    if t_enter > t_exit + eps_t {
        return Vec::new();
    }
    let mut ts: Vec<f64> = Vec::with_capacity(2);
    for t in [t_enter, t_exit] {
        if t.is_finite() && t >= -eps_t && t <= 1.0 + eps_t {
            let t = t.clamp(0.0, 1.0);
            if ts.last().map_or(true, |prev| (t - *prev).abs() > eps_t) {
                ts.push(t);
            }
        }
    }
    ts.into_iter().map(|t| line.point_at(t)).collect()
}
