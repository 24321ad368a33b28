//! Zoom percentage (0 = farthest, 100 = closest) and camera height.
//!
//! Every percentage that leaves this module is rounded to
//! [`ZOOM_SIGNIFICANT_DIGITS`] and clamped to `[0, 100]`.

use foundation::math::round_significant;

/// Camera height at 100 %.
pub const MIN_HEIGHT_M: f64 = 200_000.0;
/// Camera height at 0 %.
pub const MAX_HEIGHT_M: f64 = 3_800_000.0;
pub const ZOOM_SIGNIFICANT_DIGITS: u32 = 2;
pub const DEFAULT_ZOOM_PERCENT: f64 = 50.0;
pub const ZOOM_STEP_PERCENT: f64 = 10.0;
/// Step buttons never leave this floor.
pub const MIN_STEP_PERCENT: f64 = 10.0;
/// Percent per wheel pixel; positive deltas zoom out.
pub const WHEEL_PERCENT_PER_PX: f64 = 0.05;

/// Rounds and clamps. NaN maps to 0.
pub fn normalize_percent(percent: f64) -> f64 {
    if percent.is_nan() {
        return 0.0;
    }
    round_significant(percent, ZOOM_SIGNIFICANT_DIGITS).clamp(0.0, 100.0)
}

pub fn height_for_percent(percent: f64) -> f64 {
    let p = normalize_percent(percent) / 100.0;
    MAX_HEIGHT_M - p * (MAX_HEIGHT_M - MIN_HEIGHT_M)
}

pub fn percent_for_height(height_m: f64) -> f64 {
    let p = (MAX_HEIGHT_M - height_m) / (MAX_HEIGHT_M - MIN_HEIGHT_M) * 100.0;
    normalize_percent(p)
}

/// Slider click or drag. `offset_px` is measured from the top of the track.
pub fn percent_from_slider(offset_px: f64, track_px: f64) -> f64 {
    if track_px <= 0.0 {
        return 0.0;
    }
    normalize_percent(100.0 - offset_px / track_px * 100.0)
}

pub fn percent_after_wheel(current: f64, delta_px: f64) -> f64 {
    normalize_percent(current - delta_px * WHEEL_PERCENT_PER_PX)
}

pub fn step_in(current: f64) -> f64 {
    normalize_percent(current + ZOOM_STEP_PERCENT).max(MIN_STEP_PERCENT)
}

pub fn step_out(current: f64) -> f64 {
    normalize_percent(current - ZOOM_STEP_PERCENT).max(MIN_STEP_PERCENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_zoom_is_default_camera_height() {
        assert_eq!(height_for_percent(DEFAULT_ZOOM_PERCENT), 2_000_000.0);
        assert_eq!(percent_for_height(2_000_000.0), DEFAULT_ZOOM_PERCENT);
    }

    #[test]
    fn clamps_whatever_the_input() {
        for input in [-1e9, -5.0, 0.0, 42.0, 100.4, 250.0, 1e12, f64::INFINITY, f64::NEG_INFINITY, f64::NAN] {
            let p = normalize_percent(input);
            assert!((0.0..=100.0).contains(&p), "{input} -> {p}");
        }
        assert_eq!(percent_after_wheel(50.0, -1e6), 100.0);
        assert_eq!(percent_after_wheel(50.0, 1e6), 0.0);
        assert_eq!(percent_from_slider(-400.0, 200.0), 100.0);
        assert_eq!(percent_from_slider(900.0, 200.0), 0.0);
        assert_eq!(percent_for_height(10.0), 100.0);
        assert_eq!(percent_for_height(1e9), 0.0);
    }

    #[test]
    fn rounds_to_two_significant_digits() {
        assert_eq!(normalize_percent(54.6), 55.0);
        assert_eq!(percent_from_slider(33.0, 200.0), 84.0);
        assert_eq!(percent_after_wheel(50.0, 33.0), 48.0);
    }

    #[test]
    fn height_and_percent_are_inverse_within_rounding() {
        for p in [0.0, 10.0, 25.0, 50.0, 73.0, 99.0, 100.0] {
            assert_eq!(percent_for_height(height_for_percent(p)), p);
        }
    }

    #[test]
    fn step_buttons() {
        assert_eq!(step_in(50.0), 60.0);
        assert_eq!(step_in(95.0), 100.0);
        assert_eq!(step_in(100.0), 100.0);
        assert_eq!(step_out(50.0), 40.0);
        assert_eq!(step_out(15.0), 10.0);
        assert_eq!(step_out(10.0), 10.0);
    }
}
