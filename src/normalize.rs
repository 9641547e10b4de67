//! Axis calibration: linear range remapping plus dead-zone clamping.
//!
//! These are the canonical, pure implementations used by the axis classifier.
//! Keeping them free of any device state makes the math trivially testable.

use crate::mapping::{AxisEntry, Bounds, DeadZone};

/// Linearly remaps `value` from `raw` onto `normalized`.
///
/// ```
/// use joypoll::mapping::Bounds;
/// use joypoll::normalize::normalize;
///
/// let raw = Bounds { min: 0.0, max: 255.0 };
/// let out = Bounds { min: -90.0, max: 90.0 };
/// assert_eq!(normalize(0.0, raw, out), -90.0);
/// assert_eq!(normalize(255.0, raw, out), 90.0);
/// ```
///
/// Callers must uphold `raw.min < raw.max`; the mapping validator rejects
/// entries that don't, so a violation here is a programming error, not a
/// runtime condition.
pub fn normalize(value: f64, raw: Bounds, normalized: Bounds) -> f64 {
    debug_assert!(raw.min < raw.max, "raw bounds must span a nonzero range");
    normalized.min + (value - raw.min) * (normalized.max - normalized.min) / (raw.max - raw.min)
}

/// Forces readings strictly inside the dead band to exactly `0.0`.
///
/// The band is open on both ends: a reading equal to either threshold passes
/// through unchanged.
pub fn apply_dead_zone(scaled: f64, dead_zone: DeadZone) -> f64 {
    if scaled > dead_zone.low && scaled < dead_zone.high {
        0.0
    } else {
        scaled
    }
}

/// Full calibration for one axis entry: remap, then dead-zone clamp.
pub fn calibrate(value: i32, entry: &AxisEntry) -> f64 {
    let scaled = normalize(value as f64, entry.raw_bounds, entry.normalized_bounds);
    apply_dead_zone(scaled, entry.dead_zone)
}
