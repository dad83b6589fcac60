//! Tilt Classifier: zone state machine with a settle (hold) timer
//!
//! Transitions:
//! - any → IN_RANGE(false): min ≤ pitch ≤ max (hold timer untouched)
//! - any → TOO_LOW: pitch < min (hold timer replaced)
//! - any → TOO_HIGH: pitch > max (hold timer replaced)
//! - hold timer expiry → IN_RANGE(true), once per arming
//! - reset → NONE (hold timer cancelled)
//!
//! The classifier never reads the clock; callers pass `now`, so the same
//! engine runs under the tracker task and in plain unit tests.

use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, warn};

use crate::config::TiltConfig;
use crate::core::pitch::{classify, pitch_degrees};
use crate::types::{OrientationSample, ReasonCode, TiltZone, ZoneEvent};

/// Tilt classification state machine
#[derive(Debug)]
pub struct TiltClassifier {
    /// Current zone
    zone: TiltZone,
    /// Pending hold timer deadline. One slot, so at most one timer exists.
    hold_deadline: Option<Instant>,
    /// Last computed pitch
    last_pitch: Option<f64>,
    /// Events emitted so far (also the sequence counter)
    event_count: u64,
    /// Samples consumed
    sample_count: u64,
    min_pitch_deg: f64,
    max_pitch_deg: f64,
    hold_duration: Duration,
}

impl Default for TiltClassifier {
    fn default() -> Self {
        Self::new(&TiltConfig::default())
    }
}

impl TiltClassifier {
    /// Create new classifier in zone NONE
    pub fn new(config: &TiltConfig) -> Self {
        Self {
            zone: TiltZone::None,
            hold_deadline: None,
            last_pitch: None,
            event_count: 0,
            sample_count: 0,
            min_pitch_deg: config.min_pitch_deg,
            max_pitch_deg: config.max_pitch_deg,
            hold_duration: config.hold_duration(),
        }
    }

    /// Classify one sample received at `now`.
    ///
    /// Returns `None` only when the sample yields no finite pitch.
    pub fn update(&mut self, sample: &OrientationSample, now: Instant) -> Option<ZoneEvent> {
        self.sample_count += 1;
        let pitch = pitch_degrees(sample);

        let Some(zone) = classify(pitch, self.min_pitch_deg, self.max_pitch_deg) else {
            warn!(?sample, "sample produced no finite pitch, skipped");
            return None;
        };
        self.last_pitch = Some(pitch);

        // In-range samples leave a pending hold timer running
        if zone.is_out_of_band() {
            self.arm_hold(now);
        }
        let reason = match zone {
            TiltZone::TooLow => ReasonCode::Z001_PITCH_TOO_LOW,
            TiltZone::TooHigh => ReasonCode::Z001_PITCH_TOO_HIGH,
            _ => ReasonCode::Z001_PITCH_IN_RANGE,
        };

        debug!(pitch, zone = %zone, "sample classified");
        Some(self.emit(Some(pitch), zone, reason))
    }

    /// Fire the hold timer if it is due at `now`
    pub fn poll_hold(&mut self, now: Instant) -> Option<ZoneEvent> {
        match self.hold_deadline {
            Some(deadline) if now >= deadline => {
                self.hold_deadline = None;
                debug!("hold timer elapsed");
                Some(self.emit(
                    None,
                    TiltZone::InRange { hold_elapsed: true },
                    ReasonCode::Z002_HOLD_ELAPSED,
                ))
            }
            _ => None,
        }
    }

    /// Cancel the hold timer and return to NONE.
    ///
    /// Emits a reset event only if something had happened since the last reset.
    pub fn reset(&mut self) -> Option<ZoneEvent> {
        let was_active = self.zone != TiltZone::None || self.hold_deadline.is_some();
        self.hold_deadline = None;
        self.last_pitch = None;
        if was_active {
            Some(self.emit(None, TiltZone::None, ReasonCode::Z003_RESET))
        } else {
            self.zone = TiltZone::None;
            None
        }
    }

    fn arm_hold(&mut self, now: Instant) {
        if self.hold_deadline.is_some() {
            debug!("hold timer re-armed, previous deadline dropped");
        }
        self.hold_deadline = Some(now + self.hold_duration);
    }

    fn emit(&mut self, pitch: Option<f64>, zone: TiltZone, reason: ReasonCode) -> ZoneEvent {
        self.zone = zone;
        self.event_count += 1;
        ZoneEvent::new(self.event_count, pitch, zone, reason)
    }

    /// Get current zone
    pub fn zone(&self) -> TiltZone {
        self.zone
    }

    /// Deadline of the pending hold timer, if armed
    pub fn hold_deadline(&self) -> Option<Instant> {
        self.hold_deadline
    }

    pub fn hold_pending(&self) -> bool {
        self.hold_deadline.is_some()
    }

    /// Get last pitch
    pub fn last_pitch(&self) -> Option<f64> {
        self.last_pitch
    }

    pub fn sample_count(&self) -> u64 {
        self.sample_count
    }

    pub fn event_count(&self) -> u64 {
        self.event_count
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn at_pitch(deg: f64) -> OrientationSample {
        OrientationSample::from_pitch_degrees(deg)
    }

    #[test]
    fn test_initial_zone_is_none() {
        let classifier = TiltClassifier::default();
        assert_eq!(classifier.zone(), TiltZone::None);
        assert!(!classifier.hold_pending());
    }

    #[test]
    fn test_in_range_no_timer() {
        let mut classifier = TiltClassifier::default();
        let event = classifier.update(&at_pitch(90.0), Instant::now()).unwrap();
        assert_eq!(event.zone, TiltZone::InRange { hold_elapsed: false });
        assert_eq!(event.reason, ReasonCode::Z001_PITCH_IN_RANGE);
        assert!(!classifier.hold_pending());
    }

    #[test]
    fn test_too_high_arms_timer() {
        let mut classifier = TiltClassifier::default();
        let t0 = Instant::now();
        let event = classifier.update(&at_pitch(115.0), t0).unwrap();
        assert_eq!(event.zone, TiltZone::TooHigh);
        assert_eq!(classifier.hold_deadline(), Some(t0 + Duration::from_secs(3)));
    }

    #[test]
    fn test_too_low_arms_timer() {
        let mut classifier = TiltClassifier::default();
        let event = classifier.update(&at_pitch(40.0), Instant::now()).unwrap();
        assert_eq!(event.zone, TiltZone::TooLow);
        assert!(classifier.hold_pending());
    }

    #[test]
    fn test_hold_fires_once() {
        let mut classifier = TiltClassifier::default();
        let t0 = Instant::now();
        classifier.update(&at_pitch(115.0), t0);

        assert!(classifier.poll_hold(t0 + Duration::from_millis(2999)).is_none());

        let fired = classifier.poll_hold(t0 + Duration::from_secs(3)).unwrap();
        assert_eq!(fired.zone, TiltZone::InRange { hold_elapsed: true });
        assert_eq!(fired.reason, ReasonCode::Z002_HOLD_ELAPSED);
        assert_eq!(fired.pitch, None);

        assert!(classifier.poll_hold(t0 + Duration::from_secs(10)).is_none());
        assert!(!classifier.hold_pending());
    }

    #[test]
    fn test_rearm_replaces_deadline() {
        let mut classifier = TiltClassifier::default();
        let t0 = Instant::now();
        classifier.update(&at_pitch(115.0), t0);
        classifier.update(&at_pitch(120.0), t0 + Duration::from_millis(500));

        // First arming's deadline is gone
        assert!(classifier.poll_hold(t0 + Duration::from_secs(3)).is_none());
        assert!(classifier.poll_hold(t0 + Duration::from_millis(3500)).is_some());
    }

    #[test]
    fn test_in_range_keeps_pending_timer() {
        let mut classifier = TiltClassifier::default();
        let t0 = Instant::now();
        classifier.update(&at_pitch(40.0), t0);
        classifier.update(&at_pitch(90.0), t0 + Duration::from_millis(500));

        assert_eq!(classifier.hold_deadline(), Some(t0 + Duration::from_secs(3)));
        assert!(classifier.poll_hold(t0 + Duration::from_secs(3)).is_some());
    }

    #[test]
    fn test_reset_cancels_timer() {
        let mut classifier = TiltClassifier::default();
        let t0 = Instant::now();
        classifier.update(&at_pitch(115.0), t0);

        let reset = classifier.reset().unwrap();
        assert_eq!(reset.zone, TiltZone::None);
        assert_eq!(reset.reason, ReasonCode::Z003_RESET);
        assert!(classifier.poll_hold(t0 + Duration::from_secs(5)).is_none());
    }

    #[test]
    fn test_reset_when_idle_is_silent() {
        let mut classifier = TiltClassifier::default();
        assert!(classifier.reset().is_none());
        assert_eq!(classifier.event_count(), 0);
    }

    #[test]
    fn test_sequence_numbers() {
        let mut classifier = TiltClassifier::default();
        let t0 = Instant::now();
        let a = classifier.update(&at_pitch(90.0), t0).unwrap();
        let b = classifier.update(&at_pitch(30.0), t0).unwrap();
        let c = classifier.poll_hold(t0 + Duration::from_secs(3)).unwrap();
        assert_eq!((a.seq, b.seq, c.seq), (1, 2, 3));
    }

    #[test]
    fn test_degenerate_sample_skipped() {
        let mut classifier = TiltClassifier::default();
        let nan = OrientationSample::new(f64::NAN, 0.0, 0.0, 1.0);
        assert!(classifier.update(&nan, Instant::now()).is_none());
        assert_eq!(classifier.zone(), TiltZone::None);
        assert_eq!(classifier.sample_count(), 1);
    }
}
