//! Tiltguard: guided phone positioning
//!
//! Orientation sampler → TiltClassifier (driven by TiltTracker) → GuideFlow → observer

pub mod config;
pub mod core;
pub mod types;

// =============================================================================
// PITCH BAND [deg] - target window for the eye test
// =============================================================================

/// Lower edge of the in-range band (inclusive)
pub const PITCH_MIN_DEG: f64 = 70.0;

/// Upper edge of the in-range band (inclusive)
pub const PITCH_MAX_DEG: f64 = 110.0;

// =============================================================================
// TIMING [ms]
// =============================================================================

/// Hold timer armed on every out-of-band sample
/// 3 seconds without a re-arm counts as settled
pub const HOLD_DURATION_MS: u64 = 3000;

/// Sensor cadence requested from the sampler
pub const SAMPLE_INTERVAL_MS: u64 = 500;

/// Delay between a flow decision and the phase change it causes
pub const NAVIGATION_DELAY_MS: u64 = 1000;

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = "1.0.0";
