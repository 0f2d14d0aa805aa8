use super::tolerance::EPS_LEN;
use crate::model::{Plane, Vec3};

/// Newell normal of a closed loop. Robust for non-convex loops and
/// collinear runs; `None` when the loop encloses no area.
pub fn newell_normal(points: &[Vec3]) -> Option<Vec3> {
    if points.len() < 3 {
        return None;
    }
    let n = points.len();
    let mut acc = Vec3::ZERO;
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        acc.x += (a.y - b.y) * (a.z + b.z);
        acc.y += (a.z - b.z) * (a.x + b.x);
        acc.z += (a.x - b.x) * (a.y + b.y);
    }
    acc.unit()
}

/// Orthonormal frame embedded in a plane; maps between world points and
/// local (u, v) coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaneFrame {
    pub origin: Vec3,
    pub u: Vec3,
    pub v: Vec3,
    pub normal: Vec3,
}

impl PlaneFrame {
    /// Frame with `u` along `dir` projected into the plane of `normal`.
    pub fn new(origin: Vec3, normal: Vec3, dir: Vec3) -> Option<Self> {
        let normal = normal.unit()?;
        let u = (dir - normal * dir.dot(normal)).unit()?;
        let v = normal.cross(u);
        Some(PlaneFrame { origin, u, v, normal })
    }

    pub fn plane(&self) -> Plane {
        Plane {
            origin: self.origin,
            normal: self.normal,
        }
    }

    #[inline]
    pub fn to_local(&self, p: Vec3) -> (f64, f64) {
        let d = p - self.origin;
        (d.dot(self.u), d.dot(self.v))
    }

    #[inline]
    pub fn to_world(&self, s: f64, t: f64) -> Vec3 {
        self.origin + self.u * s + self.v * t
    }
}

/// Signed distance from `p` to the plane.
#[inline]
pub fn plane_distance(plane: &Plane, p: Vec3) -> f64 {
    (p - plane.origin).dot(plane.normal)
}

/// First edge direction of a loop long enough to define an axis.
pub fn first_edge_direction(points: &[Vec3]) -> Option<Vec3> {
    let n = points.len();
    (0..n)
        .map(|i| points[(i + 1) % n] - points[i])
        .find(|d| d.length() > EPS_LEN)
}

/// Squared distance from a 2D point to a 2D segment.
pub fn seg_distance_sq_2d(px: f64, py: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    let vx = x2 - x1;
    let vy = y2 - y1;
    let wx = px - x1;
    let wy = py - y1;
    let vv = vx * vx + vy * vy;
    let mut t = if vv > 0.0 { (wx * vx + wy * vy) / vv } else { 0.0 };
    if t < 0.0 { t = 0.0; } else if t > 1.0 { t = 1.0; }
    let dx = px - (x1 + t * vx);
    let dy = py - (y1 + t * vy);
    dx * dx + dy * dy
}
