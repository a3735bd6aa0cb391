//! Shared rounding helpers.

/// Rounds to the nearest integer, ties toward positive infinity.
#[inline]
pub fn round_half_up(v: f64) -> f64 {
    (v + 0.5).floor()
}

/// Rounds to the nearest integer, ties toward negative infinity.
#[inline]
pub fn round_half_down(v: f64) -> f64 {
    (v - 0.5).ceil()
}

/// Rounds to the nearest integer, ties away from zero.
#[inline]
pub fn round(v: f64) -> f64 {
    v.round()
}
