//! Tilt zone definitions

use serde::{Deserialize, Serialize};

/// Where the device pitch currently sits relative to the target band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "zone", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TiltZone {
    /// No sample yet, or tracking stopped
    #[default]
    None,
    /// Pitch below the band
    TooLow,
    /// Pitch inside the band; `hold_elapsed` is set only by the hold timer
    InRange { hold_elapsed: bool },
    /// Pitch above the band
    TooHigh,
}

impl TiltZone {
    pub fn is_out_of_band(&self) -> bool {
        matches!(self, TiltZone::TooLow | TiltZone::TooHigh)
    }

    /// True once the device has settled after the hold timer
    pub fn is_settled(&self) -> bool {
        matches!(self, TiltZone::InRange { hold_elapsed: true })
    }

    /// Terminal color for this zone
    pub fn color(&self) -> colored::Color {
        match self {
            TiltZone::None => colored::Color::BrightBlack,
            TiltZone::TooLow | TiltZone::TooHigh => colored::Color::Red,
            TiltZone::InRange { hold_elapsed: false } => colored::Color::Yellow,
            TiltZone::InRange { hold_elapsed: true } => colored::Color::Green,
        }
    }

    /// Get emoji for zone
    pub fn emoji(&self) -> &'static str {
        match self {
            TiltZone::None => "⏳",
            TiltZone::TooLow => "🔽",
            TiltZone::TooHigh => "🔼",
            TiltZone::InRange { hold_elapsed: false } => "🔶",
            TiltZone::InRange { hold_elapsed: true } => "✅",
        }
    }
}

impl std::fmt::Display for TiltZone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TiltZone::None => "NONE",
            TiltZone::TooLow => "TOO_LOW",
            TiltZone::TooHigh => "TOO_HIGH",
            TiltZone::InRange { hold_elapsed: false } => "IN_RANGE",
            TiltZone::InRange { hold_elapsed: true } => "IN_RANGE(settled)",
        };
        write!(f, "{}", name)
    }
}
