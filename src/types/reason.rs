//! Reason codes attached to every zone event

use serde::{Deserialize, Serialize};

/// Why the classifier emitted an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(non_camel_case_types)]
pub enum ReasonCode {
    // =========================================================================
    // Z001: Sample classification
    // =========================================================================
    /// Pitch inside [min, max]
    Z001_PITCH_IN_RANGE,
    /// Pitch below min, hold timer re-armed
    Z001_PITCH_TOO_LOW,
    /// Pitch above max, hold timer re-armed
    Z001_PITCH_TOO_HIGH,

    // =========================================================================
    // Z002: Hold timer
    // =========================================================================
    /// Hold timer expired without a re-arm
    Z002_HOLD_ELAPSED,

    // =========================================================================
    // Z003: Lifecycle
    // =========================================================================
    /// Tracking stopped, zone back to NONE
    Z003_RESET,
}

impl ReasonCode {
    /// Get the code string (for logging)
    pub fn code(&self) -> &'static str {
        match self {
            Self::Z001_PITCH_IN_RANGE => "Z001_PITCH_IN_RANGE",
            Self::Z001_PITCH_TOO_LOW => "Z001_PITCH_TOO_LOW",
            Self::Z001_PITCH_TOO_HIGH => "Z001_PITCH_TOO_HIGH",
            Self::Z002_HOLD_ELAPSED => "Z002_HOLD_ELAPSED",
            Self::Z003_RESET => "Z003_RESET",
        }
    }

    /// Get human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::Z001_PITCH_IN_RANGE => "Pitch inside target band",
            Self::Z001_PITCH_TOO_LOW => "Pitch below target band",
            Self::Z001_PITCH_TOO_HIGH => "Pitch above target band",
            Self::Z002_HOLD_ELAPSED => "Hold timer elapsed",
            Self::Z003_RESET => "Tracking stopped",
        }
    }
}

impl std::fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code(), self.description())
    }
}
