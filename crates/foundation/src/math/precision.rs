//! Precision policies.
//!
//! Display values in the dashboard are rounded to a fixed number of
//! significant digits. Keep every rounding path going through
//! [`round_significant`] so the slider, the wheel and the step buttons agree.

use core::cmp::Ordering;

/// Round `v` to `digits` significant digits (half away from zero).
///
/// `round_significant(54.6, 2) == 55.0`, `round_significant(0.0123, 1) == 0.01`.
/// Zero and non-finite values are returned unchanged.
pub fn round_significant(v: f64, digits: u32) -> f64 {
    if v == 0.0 || !v.is_finite() || digits == 0 {
        return v;
    }
    let magnitude = v.abs().log10().floor() as i32;
    let exp = digits as i32 - 1 - magnitude;
    let rounded = if exp >= 0 {
        let scale = 10f64.powi(exp);
        (v * scale).round() / scale
    } else {
        let scale = 10f64.powi(-exp);
        (v / scale).round() * scale
    };
    canonical_f64(rounded)
}

/// Canonicalize a floating-point value for deterministic ordering.
///
/// Rules:
/// - `-0.0` becomes `0.0`
/// - all NaNs become a single canonical NaN
pub fn canonical_f64(v: f64) -> f64 {
    if v == 0.0 {
        0.0
    } else if v.is_nan() {
        f64::NAN
    } else {
        v
    }
}

/// Deterministic total ordering for floats.
pub fn stable_total_cmp_f64(a: f64, b: f64) -> Ordering {
    canonical_f64(a).total_cmp(&canonical_f64(b))
}
