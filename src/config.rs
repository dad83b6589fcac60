//! Runtime configuration for the classifier and the guide flow.
//!
//! Every field defaults to the constants in the crate root, so a JSON file only
//! needs to name the values it overrides.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::TiltError;
use crate::{
    HOLD_DURATION_MS, NAVIGATION_DELAY_MS, PITCH_MAX_DEG, PITCH_MIN_DEG, SAMPLE_INTERVAL_MS,
};

/// Thresholds and timings for one tracking session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TiltConfig {
    /// Lower edge of the in-range band, degrees (inclusive)
    pub min_pitch_deg: f64,
    /// Upper edge of the in-range band, degrees (inclusive)
    pub max_pitch_deg: f64,
    /// Hold timer duration (milliseconds)
    pub hold_duration_ms: u64,
    /// Requested sampler cadence (milliseconds)
    pub sample_interval_ms: u64,
    /// Guide flow navigation delay (milliseconds)
    pub navigation_delay_ms: u64,
}

impl Default for TiltConfig {
    fn default() -> Self {
        Self {
            min_pitch_deg: PITCH_MIN_DEG,
            max_pitch_deg: PITCH_MAX_DEG,
            hold_duration_ms: HOLD_DURATION_MS,
            sample_interval_ms: SAMPLE_INTERVAL_MS,
            navigation_delay_ms: NAVIGATION_DELAY_MS,
        }
    }
}

impl TiltConfig {
    /// Parse from a JSON string and validate
    pub fn from_json(json: &str) -> Result<Self, TiltError> {
        let config: TiltConfig = serde_json::from_str(json).map_err(|e| TiltError::Config {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file and validate
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TiltError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| TiltError::Config {
            message: format!("{}: {}", path.display(), e),
        })?;
        Self::from_json(&content)
    }

    /// Reject configurations the classifier cannot honour
    pub fn validate(&self) -> Result<(), TiltError> {
        if !self.min_pitch_deg.is_finite() || !self.max_pitch_deg.is_finite() {
            return Err(TiltError::Config {
                message: "pitch band must be finite".to_string(),
            });
        }
        if self.min_pitch_deg > self.max_pitch_deg {
            return Err(TiltError::Config {
                message: format!(
                    "min_pitch_deg ({}) exceeds max_pitch_deg ({})",
                    self.min_pitch_deg, self.max_pitch_deg
                ),
            });
        }
        if self.hold_duration_ms == 0 || self.sample_interval_ms == 0 {
            return Err(TiltError::Config {
                message: "hold and sample durations must be positive".to_string(),
            });
        }
        Ok(())
    }

    pub fn hold_duration(&self) -> Duration {
        Duration::from_millis(self.hold_duration_ms)
    }

    pub fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.sample_interval_ms)
    }

    pub fn navigation_delay(&self) -> Duration {
        Duration::from_millis(self.navigation_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_match_constants() {
        let config = TiltConfig::default();
        assert_eq!(config.min_pitch_deg, 70.0);
        assert_eq!(config.max_pitch_deg, 110.0);
        assert_eq!(config.hold_duration(), Duration::from_secs(3));
        assert_eq!(config.sample_interval(), Duration::from_millis(500));
        assert_eq!(config.navigation_delay(), Duration::from_secs(1));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = TiltConfig::from_json(r#"{"hold_duration_ms": 1500}"#).unwrap();
        assert_eq!(
            config,
            TiltConfig {
                hold_duration_ms: 1500,
                ..TiltConfig::default()
            }
        );
    }

    #[test]
    fn test_inverted_band_rejected() {
        let err = TiltConfig::from_json(r#"{"min_pitch_deg": 120.0}"#).unwrap_err();
        assert!(matches!(err, TiltError::Config { .. }));
    }

    #[test]
    fn test_zero_hold_rejected() {
        let config = TiltConfig {
            hold_duration_ms: 0,
            ..TiltConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_json_rejected() {
        assert!(TiltConfig::from_json("{not json").is_err());
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = TiltConfig::load("/nonexistent/tiltguard.json").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/tiltguard.json"));
    }
}
