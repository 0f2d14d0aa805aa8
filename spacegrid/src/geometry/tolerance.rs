// Centralized tolerances for the spatial graph

pub const EPSILON: f64 = 1e-5;            // kernel point-equality threshold
pub const DEFAULT_TOLERANCE: f64 = 2.0 * EPSILON; // vertex fusion / face classification
pub const EPS_LEN: f64 = 1e-12;           // zero-length vector threshold
pub const EPS_DENOM: f64 = 1e-12;         // denominator guard for ratios

#[inline]
pub fn safe_div(num: f64, den: f64, fallback: f64) -> f64 {
    if den.abs() <= EPS_DENOM { fallback } else { num / den }
}
