//! Pitch extraction and zone classification
//!
//! pitch = |atan2(2(xw + yz), 1 - 2x² - 2z²)| in degrees, always within [0, 180].

use crate::types::{OrientationSample, TiltZone};

/// Pitch angle in degrees for one attitude sample.
///
/// The absolute value folds forward and backward rotations together.
pub fn pitch_degrees(sample: &OrientationSample) -> f64 {
    let OrientationSample { x, y, z, w } = *sample;
    let pitch_radians = (2.0 * (x * w + y * z)).atan2(1.0 - 2.0 * x * x - 2.0 * z * z);
    pitch_radians.abs().to_degrees()
}

/// Classify a pitch against the closed band `[min_deg, max_deg]`.
///
/// Returns `None` for NaN, which no band comparison can place.
pub fn classify(pitch: f64, min_deg: f64, max_deg: f64) -> Option<TiltZone> {
    if (min_deg..=max_deg).contains(&pitch) {
        Some(TiltZone::InRange { hold_elapsed: false })
    } else if pitch > max_deg {
        Some(TiltZone::TooHigh)
    } else if pitch < min_deg {
        Some(TiltZone::TooLow)
    } else {
        None
    }
}
