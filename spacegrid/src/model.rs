use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::ops::{Add, Mul, Neg, Sub};

/// Vertex id. `0` is never allocated and reads as "not found".
pub type VertexId = u64;
/// Edge id, allocated from 1 upwards like vertex ids.
pub type EdgeId = u64;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };
    pub const X: Vec3 = Vec3 { x: 1.0, y: 0.0, z: 0.0 };
    pub const Y: Vec3 = Vec3 { x: 0.0, y: 1.0, z: 0.0 };
    pub const Z: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 1.0 };

    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Vec3 { x, y, z }
    }
    #[inline]
    pub fn dot(self, o: Vec3) -> f64 {
        self.x * o.x + self.y * o.y + self.z * o.z
    }
    #[inline]
    pub fn cross(self, o: Vec3) -> Vec3 {
        Vec3 {
            x: self.y * o.z - self.z * o.y,
            y: self.z * o.x - self.x * o.z,
            z: self.x * o.y - self.y * o.x,
        }
    }
    #[inline]
    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }
    /// Unit vector, or `None` for a (near) zero-length vector.
    pub fn unit(self) -> Option<Vec3> {
        let len = self.length();
        if len > crate::geometry::tolerance::EPS_LEN {
            Some(self * (1.0 / len))
        } else {
            None
        }
    }
    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
    /// Per-axis comparison: the tolerance region is a cube around `self`.
    #[inline]
    pub fn is_almost_equal_to(self, o: Vec3, tol: f64) -> bool {
        (self.x - o.x).abs() <= tol && (self.y - o.y).abs() <= tol && (self.z - o.z).abs() <= tol
    }
    /// Largest per-axis difference (Chebyshev distance).
    #[inline]
    pub fn max_axis_distance(self, o: Vec3) -> f64 {
        (self.x - o.x)
            .abs()
            .max((self.y - o.y).abs())
            .max((self.z - o.z).abs())
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    #[inline]
    fn add(self, o: Vec3) -> Vec3 {
        Vec3::new(self.x + o.x, self.y + o.y, self.z + o.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    #[inline]
    fn sub(self, o: Vec3) -> Vec3 {
        Vec3::new(self.x - o.x, self.y - o.y, self.z - o.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Vec3;
    #[inline]
    fn mul(self, s: f64) -> Vec3 {
        Vec3::new(self.x * s, self.y * s, self.z * s)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;
    #[inline]
    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

impl From<(f64, f64, f64)> for Vec3 {
    fn from((x, y, z): (f64, f64, f64)) -> Self {
        Vec3 { x, y, z }
    }
}

/// Axis-aligned box.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BBox3 {
    pub min: Vec3,
    pub max: Vec3,
}

impl BBox3 {
    /// Box spanning two corners given in any order.
    pub fn new(a: Vec3, b: Vec3) -> Self {
        BBox3 {
            min: Vec3::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max: Vec3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }
    pub fn from_points<I: IntoIterator<Item = Vec3>>(points: I) -> Option<Self> {
        let mut it = points.into_iter();
        let first = it.next()?;
        let mut b = BBox3 { min: first, max: first };
        for p in it {
            b.min = Vec3::new(b.min.x.min(p.x), b.min.y.min(p.y), b.min.z.min(p.z));
            b.max = Vec3::new(b.max.x.max(p.x), b.max.y.max(p.y), b.max.z.max(p.z));
        }
        Some(b)
    }
    #[inline]
    pub fn contains(&self, p: Vec3) -> bool {
        p.x >= self.min.x
            && p.x <= self.max.x
            && p.y >= self.min.y
            && p.y <= self.max.y
            && p.z >= self.min.z
            && p.z <= self.max.z
    }
}

/// Straight segment between two points.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub start: Vec3,
    pub end: Vec3,
}

impl Line {
    pub fn new(start: Vec3, end: Vec3) -> Self {
        Line { start, end }
    }
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.end - self.start
    }
    #[inline]
    pub fn length(&self) -> f64 {
        self.direction().length()
    }
    #[inline]
    pub fn point_at(&self, t: f64) -> Vec3 {
        self.start + self.direction() * t
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Plane {
    pub origin: Vec3,
    /// Unit normal.
    pub normal: Vec3,
}

/// Closed boundary; the last vertex connects back to the first.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub vertices: Vec<Vec3>,
}

impl Polygon {
    pub fn new(vertices: Vec<Vec3>) -> Self {
        Polygon { vertices }
    }
    /// Closed-loop segments, including last -> first.
    pub fn segments(&self) -> impl Iterator<Item = Line> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| Line::new(self.vertices[i], self.vertices[(i + 1) % n]))
    }
    pub fn translated(&self, offset: Vec3) -> Polygon {
        Polygon {
            vertices: self.vertices.iter().map(|p| *p + offset).collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Vertex {
    pub id: VertexId,
    pub point: Vec3,
    /// Incident edge ids.
    pub edges: BTreeSet<EdgeId>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub start: VertexId,
    pub end: VertexId,
}

impl Edge {
    /// Unordered endpoint pair, smaller id first.
    #[inline]
    pub fn key(&self) -> (VertexId, VertexId) {
        edge_key(self.start, self.end)
    }
    #[inline]
    pub fn other(&self, v: VertexId) -> Option<VertexId> {
        if v == self.start {
            Some(self.end)
        } else if v == self.end {
            Some(self.start)
        } else {
            None
        }
    }
}

#[inline]
pub fn edge_key(a: VertexId, b: VertexId) -> (VertexId, VertexId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
