// Ingestion caps applied when loading persisted documents

pub const MAX_VERTICES: usize = 2_000_000;
pub const MAX_EDGES: usize = 6_000_000;

// Key points per insertion call
pub const MAX_KEY_POINTS: usize = 100_000;

// Numeric bounds (model units)
pub const COORD_MIN: f64 = -1.0e9;
pub const COORD_MAX: f64 = 1.0e9;

#[inline]
pub fn in_coord_bounds(x: f64) -> bool { x.is_finite() && x >= COORD_MIN && x <= COORD_MAX }

#[inline]
pub fn point_in_bounds(p: crate::model::Vec3) -> bool {
    in_coord_bounds(p.x) && in_coord_bounds(p.y) && in_coord_bounds(p.z)
}
