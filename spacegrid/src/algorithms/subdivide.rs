//! Parametric subdivision: 1D intervals and 2D trimmed cells.
//!
//! `CellGrid` lays a rectangular u/v grid over a planar boundary polygon in
//! the polygon's own frame. Splitting at a point adds a grid line through
//! it on both axes. Cells are the grid rectangles clipped to the boundary.

use crate::geometry::math::PlaneFrame;
use crate::geometry::polygon::{clip_to_rect, signed_area_2d};
use crate::model::{Polygon, Vec3};

/// Inserts `x` into the sorted split list unless it falls outside the open
/// domain or within `eps` of an existing split.
fn insert_split(splits: &mut Vec<f64>, x: f64, eps: f64) -> bool {
    if !x.is_finite() || splits.len() < 2 {
        return false;
    }
    let lo = splits[0];
    let hi = splits[splits.len() - 1];
    if x <= lo + eps || x >= hi - eps {
        return false;
    }
    let pos = splits.partition_point(|s| *s < x);
    if (splits[pos] - x).abs() <= eps || (x - splits[pos - 1]).abs() <= eps {
        return false;
    }
    splits.insert(pos, x);
    true
}

/// Ordered sub-intervals of `[start, end]` cut at every split strictly
/// inside the domain. Splits closer than `eps` to a domain end or to each
/// other are merged.
pub fn split_interval(start: f64, end: f64, splits: &[f64], eps: f64) -> Vec<(f64, f64)> {
    let (lo, hi) = if start <= end { (start, end) } else { (end, start) };
    let mut cuts = vec![lo, hi];
    for s in splits {
        insert_split(&mut cuts, *s, eps);
    }
    cuts.windows(2).map(|w| (w[0], w[1])).collect()
}

#[derive(Clone, Debug)]
pub struct CellGrid {
    frame: PlaneFrame,
    boundary: Vec<(f64, f64)>,
    us: Vec<f64>,
    vs: Vec<f64>,
    eps: f64,
}

impl CellGrid {
    /// Grid covering `boundary`'s extent in its local frame. `None` when the
    /// boundary has no plane (fewer than three non-collinear vertices).
    pub fn new(boundary: &Polygon, eps: f64) -> Option<Self> {
        let boundary = boundary.deduplicated(eps);
        let frame = boundary.frame()?;
        let local = boundary.to_local(&frame);
        let (mut u0, mut u1, mut v0, mut v1) = (f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY);
        for (u, v) in &local {
            u0 = u0.min(*u);
            u1 = u1.max(*u);
            v0 = v0.min(*v);
            v1 = v1.max(*v);
        }
        if u1 - u0 <= eps || v1 - v0 <= eps {
            return None;
        }
        Some(CellGrid {
            frame,
            boundary: local,
            us: vec![u0, u1],
            vs: vec![v0, v1],
            eps,
        })
    }

    pub fn frame(&self) -> &PlaneFrame {
        &self.frame
    }

    /// Adds grid lines through `p` (projected into the plane) on both axes.
    /// Returns whether any line was added.
    pub fn split_at_point(&mut self, p: Vec3) -> bool {
        let (s, t) = self.frame.to_local(p);
        let su = insert_split(&mut self.us, s, self.eps);
        let sv = insert_split(&mut self.vs, t, self.eps);
        su || sv
    }

    /// Number of interior grid lines (u + v).
    pub fn split_count(&self) -> usize {
        self.us.len() + self.vs.len() - 4
    }

    /// Trimmed cell boundaries in world coordinates. Cells that clip to
    /// nothing (outside a concave boundary) are skipped.
    pub fn cells(&self) -> Vec<Polygon> {
        let min_area = self.eps * self.eps;
        let mut out = Vec::new();
        for uw in self.us.windows(2) {
            for vw in self.vs.windows(2) {
                let clipped = clip_to_rect(&self.boundary, uw[0], uw[1], vw[0], vw[1]);
                if clipped.len() < 3 || signed_area_2d(&clipped).abs() <= min_area {
                    continue;
                }
                let cell = Polygon::new(
                    clipped
                        .into_iter()
                        .map(|(s, t)| self.frame.to_world(s, t))
                        .collect(),
                )
                .deduplicated(self.eps);
                if cell.vertices.len() >= 3 {
                    out.push(cell);
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(z: f64) -> Polygon {
        Polygon::new(vec![
            Vec3::new(0.0, 0.0, z),
            Vec3::new(1.0, 0.0, z),
            Vec3::new(1.0, 1.0, z),
            Vec3::new(0.0, 1.0, z),
        ])
    }

    #[test]
    fn interval_splits_sorted_and_filtered() {
        let iv = split_interval(0.0, 3.0, &[2.0, -1.0, 1.0, 3.0, 1.0 + 1e-9], 1e-5);
        assert_eq!(iv, vec![(0.0, 1.0), (1.0, 2.0), (2.0, 3.0)]);
    }

    #[test]
    fn interval_without_splits_is_whole_domain() {
        assert_eq!(split_interval(0.0, 2.5, &[], 1e-5), vec![(0.0, 2.5)]);
    }

    #[test]
    fn unsplit_square_is_one_cell() {
        let g = CellGrid::new(&square(0.0), 1e-5).unwrap();
        let cells = g.cells();
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].vertices.len(), 4);
    }

    #[test]
    fn center_split_gives_four_cells() {
        let mut g = CellGrid::new(&square(2.0), 1e-5).unwrap();
        assert!(g.split_at_point(Vec3::new(0.5, 0.5, 7.0)));
        let cells = g.cells();
        assert_eq!(cells.len(), 4);
        for c in &cells {
            assert!(c.vertices.iter().all(|p| (p.z - 2.0).abs() < 1e-12));
        }
    }

    #[test]
    fn boundary_split_is_ignored() {
        let mut g = CellGrid::new(&square(0.0), 1e-5).unwrap();
        assert!(!g.split_at_point(Vec3::new(1.0, 1.0, 0.0)));
        assert_eq!(g.split_count(), 0);
    }

    #[test]
    fn concave_notch_cell_is_dropped() {
        let l = Polygon::new(vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(2.0, 1.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(1.0, 2.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
        ]);
        let mut g = CellGrid::new(&l, 1e-5).unwrap();
        g.split_at_point(Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(g.cells().len(), 3);
    }
}
