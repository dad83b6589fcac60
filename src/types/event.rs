//! Zone events delivered to observers

use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::{Deserialize, Serialize};

use crate::types::{ReasonCode, TiltZone};

/// One entry of the classification stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneEvent {
    /// Position in the session's stream, starting at 1
    pub seq: u64,
    /// Timestamp
    pub timestamp: DateTime<Utc>,
    /// Pitch that produced the event; absent for timer and reset events
    pub pitch: Option<f64>,
    /// Zone after this event
    pub zone: TiltZone,
    /// Why the event was emitted
    pub reason: ReasonCode,
}

impl ZoneEvent {
    pub fn new(seq: u64, pitch: Option<f64>, zone: TiltZone, reason: ReasonCode) -> Self {
        Self {
            seq,
            timestamp: Utc::now(),
            pitch,
            zone,
            reason,
        }
    }

    fn pitch_display(&self) -> String {
        match self.pitch {
            Some(p) => format!("{:.1}°", p),
            None => "-".to_string(),
        }
    }

    /// Format for terminal display (with colors)
    pub fn to_terminal_string(&self) -> String {
        format!(
            "{} #{} pitch={} | zone={} | {}",
            self.zone.emoji(),
            self.seq,
            self.pitch_display(),
            self.zone,
            self.reason.code()
        )
        .color(self.zone.color())
        .to_string()
    }

    /// Format for parseable output (no colors)
    pub fn to_parseable_string(&self) -> String {
        format!(
            "seq={} | pitch={} | zone={} | reason={}",
            self.seq,
            self.pitch_display(),
            self.zone,
            self.reason.code()
        )
    }
}
