//! Tolerance-aware 3D point index.
//!
//! Points are stored in three nested ordered maps keyed by X, then Y, then Z.
//! Each level is matched independently within the tolerance, so the fusion
//! region around a stored point is an axis-aligned cube. Exact keys hit the
//! maps directly; tolerant lookups walk the key range `[c - tol, c + tol]` at
//! each level and keep the candidate with the smallest per-axis distance.

use crate::model::{Vec3, VertexId};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Float map key with a total order. `-0.0` is folded into `0.0` so that
/// exact lookups agree with `==`.
#[derive(Clone, Copy, Debug)]
struct Coord(f64);

impl Coord {
    #[inline]
    fn of(x: f64) -> Coord {
        if x == 0.0 {
            Coord(0.0)
        } else {
            Coord(x)
        }
    }
}

impl PartialEq for Coord {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Eq for Coord {}
impl PartialOrd for Coord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Coord {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

type ZLevel = BTreeMap<Coord, VertexId>;
type YLevel = BTreeMap<Coord, ZLevel>;

#[derive(Clone, Debug)]
pub struct PointIndex {
    tolerance: f64,
    xs: BTreeMap<Coord, YLevel>,
    len: usize,
}

impl PointIndex {
    pub fn new(tolerance: f64) -> Self {
        PointIndex {
            tolerance,
            xs: BTreeMap::new(),
            len: 0,
        }
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.xs.clear();
        self.len = 0;
    }

    /// Exact-key lookup.
    pub fn find_exact(&self, p: Vec3) -> Option<VertexId> {
        self.xs
            .get(&Coord::of(p.x))?
            .get(&Coord::of(p.y))?
            .get(&Coord::of(p.z))
            .copied()
    }

    /// Id of the stored point closest to `p` (per-axis) among those within
    /// `tolerance` on every axis. `None` uses the index's own tolerance.
    pub fn find(&self, p: Vec3, tolerance: Option<f64>) -> Option<VertexId> {
        if let Some(id) = self.find_exact(p) {
            return Some(id);
        }
        let tol = tolerance.unwrap_or(self.tolerance);
        self.nearest_keys(p, tol).map(|(_, _, _, id)| id)
    }

    fn nearest_keys(&self, p: Vec3, tol: f64) -> Option<(Coord, Coord, Coord, VertexId)> {
        if !p.is_finite() || !(tol >= 0.0) {
            return None;
        }
        let mut best: Option<(f64, (Coord, Coord, Coord, VertexId))> = None;
        for (kx, ys) in self.xs.range(Coord::of(p.x - tol)..=Coord::of(p.x + tol)) {
            for (ky, zs) in ys.range(Coord::of(p.y - tol)..=Coord::of(p.y + tol)) {
                for (kz, id) in zs.range(Coord::of(p.z - tol)..=Coord::of(p.z + tol)) {
                    let d = Vec3::new(kx.0, ky.0, kz.0).max_axis_distance(p);
                    if best.as_ref().map_or(true, |(bd, _)| d < *bd) {
                        best = Some((d, (*kx, *ky, *kz, *id)));
                    }
                }
            }
        }
        best.map(|(_, keys)| keys)
    }

    /// Returns the id fused with `p`, or stores `p` under a fresh id from
    /// `alloc`. The flag reports whether a new entry was created.
    pub fn insert_with<F: FnOnce() -> VertexId>(&mut self, p: Vec3, alloc: F) -> (VertexId, bool) {
        if let Some(id) = self.find(p, None) {
            return (id, false);
        }
        let id = alloc();
        self.insert(p, id);
        (id, true)
    }

    /// Stores `p` under `id` at its exact key, replacing any entry there.
    pub fn insert(&mut self, p: Vec3, id: VertexId) -> Option<VertexId> {
        let prev = self
            .xs
            .entry(Coord::of(p.x))
            .or_default()
            .entry(Coord::of(p.y))
            .or_default()
            .insert(Coord::of(p.z), id);
        if prev.is_none() {
            self.len += 1;
        }
        prev
    }

    /// Removes the entry for `p` (exact key first, then the nearest entry
    /// within tolerance) and prunes emptied Y/Z levels.
    pub fn remove(&mut self, p: Vec3) -> Option<VertexId> {
        let (kx, ky, kz) = if self.find_exact(p).is_some() {
            (Coord::of(p.x), Coord::of(p.y), Coord::of(p.z))
        } else {
            let (kx, ky, kz, _) = self.nearest_keys(p, self.tolerance)?;
            (kx, ky, kz)
        };
        let ys = self.xs.get_mut(&kx)?;
        let zs = ys.get_mut(&ky)?;
        let id = zs.remove(&kz)?;
        if zs.is_empty() {
            ys.remove(&ky);
        }
        if ys.is_empty() {
            self.xs.remove(&kx);
        }
        self.len -= 1;
        Some(id)
    }

    /// Number of X keys; used to check level pruning.
    pub fn x_levels(&self) -> usize {
        self.xs.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 2e-5;

    #[test]
    fn fuses_within_cube_not_sphere() {
        let mut idx = PointIndex::new(TOL);
        idx.insert(Vec3::new(1.0, 1.0, 1.0), 7);
        // Every axis off by just under the tolerance: outside a sphere of
        // radius TOL but inside the cube.
        let q = Vec3::new(1.0 + 1.9e-5, 1.0 - 1.9e-5, 1.0 + 1.9e-5);
        assert_eq!(idx.find(q, None), Some(7));
        assert_eq!(idx.find(Vec3::new(1.0 + 3e-5, 1.0, 1.0), None), None);
    }

    #[test]
    fn insert_with_allocates_once() {
        let mut idx = PointIndex::new(TOL);
        let mut next = 1;
        let mut alloc = || {
            let id = next;
            next += 1;
            id
        };
        let (a, created_a) = idx.insert_with(Vec3::new(0.0, 0.0, 0.0), &mut alloc);
        let (b, created_b) = idx.insert_with(Vec3::new(1e-5, -1e-5, 0.0), &mut alloc);
        assert!(created_a);
        assert!(!created_b);
        assert_eq!(a, b);
        assert_eq!(idx.len(), 1);
    }

    #[test]
    fn nearest_candidate_wins() {
        let mut idx = PointIndex::new(TOL);
        idx.insert(Vec3::new(0.0, 0.0, 0.0), 1);
        idx.insert(Vec3::new(3e-5, 0.0, 0.0), 2);
        assert_eq!(idx.find(Vec3::new(2e-5, 0.0, 0.0), None), Some(2));
        assert_eq!(idx.find(Vec3::new(1e-5, 0.0, 0.0), None), Some(1));
    }

    #[test]
    fn remove_prunes_empty_levels() {
        let mut idx = PointIndex::new(TOL);
        idx.insert(Vec3::new(0.0, 0.0, 0.0), 1);
        idx.insert(Vec3::new(0.0, 0.0, 1.0), 2);
        idx.insert(Vec3::new(5.0, 0.0, 0.0), 3);
        assert_eq!(idx.x_levels(), 2);
        assert_eq!(idx.remove(Vec3::new(5.0, 0.0, 0.0)), Some(3));
        assert_eq!(idx.x_levels(), 1);
        assert_eq!(idx.remove(Vec3::new(0.0, 0.0, 0.0)), Some(1));
        assert_eq!(idx.remove(Vec3::new(0.0, 0.0, 1.0)), Some(2));
        assert_eq!(idx.x_levels(), 0);
        assert!(idx.is_empty());
    }

    #[test]
    fn negative_zero_matches_exactly() {
        let mut idx = PointIndex::new(TOL);
        idx.insert(Vec3::new(0.0, 0.0, 0.0), 4);
        assert_eq!(idx.find_exact(Vec3::new(-0.0, 0.0, -0.0)), Some(4));
    }
}
