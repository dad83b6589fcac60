//! Integration tests for classification
//!
//! Tests the synchronous path: quaternion → pitch → TiltClassifier → ZoneEvent

use std::time::Duration;

use tokio::time::Instant;

use tiltguard::config::TiltConfig;
use tiltguard::core::{classify, pitch_degrees, TiltClassifier};
use tiltguard::types::{OrientationSample, ReasonCode, TiltZone, ZoneEvent};
use tiltguard::{HOLD_DURATION_MS, PITCH_MAX_DEG, PITCH_MIN_DEG};

/// Boundary pitches are in range; just outside them is not
#[test]
fn test_band_edges_inclusive() {
    let in_range = Some(TiltZone::InRange { hold_elapsed: false });
    assert_eq!(classify(PITCH_MIN_DEG, PITCH_MIN_DEG, PITCH_MAX_DEG), in_range);
    assert_eq!(classify(PITCH_MAX_DEG, PITCH_MIN_DEG, PITCH_MAX_DEG), in_range);

    let mut classifier = TiltClassifier::default();
    let now = Instant::now();
    let cases = [
        (69.99, TiltZone::TooLow),
        (70.01, TiltZone::InRange { hold_elapsed: false }),
        (109.99, TiltZone::InRange { hold_elapsed: false }),
        (110.01, TiltZone::TooHigh),
    ];
    for (pitch, expected) in cases {
        let event = classifier.update(&OrientationSample::from_pitch_degrees(pitch), now).unwrap();
        assert_eq!(event.zone, expected, "pitch {}", pitch);
    }
}

/// Arbitrary (non-axis) quaternion classification matches the formula
#[test]
fn test_general_quaternion() {
    // Off-axis attitude: rotation about x and z together
    let q = OrientationSample::new(0.683_012_7, 0.183_012_7, 0.183_012_7, 0.683_012_7).normalized();
    let pitch = pitch_degrees(&q);
    assert!((0.0..=180.0).contains(&pitch));

    let mut classifier = TiltClassifier::default();
    let event = classifier.update(&q, Instant::now()).unwrap();
    assert_eq!(event.pitch, Some(pitch));
}

/// Custom band from config
#[test]
fn test_custom_band() {
    let json = r#"{"min_pitch_deg": 80.0, "max_pitch_deg": 100.0}"#;
    let config = TiltConfig::from_json(json).unwrap();
    let mut classifier = TiltClassifier::new(&config);
    let now = Instant::now();

    let low = classifier.update(&OrientationSample::from_pitch_degrees(75.0), now).unwrap();
    assert_eq!(low.zone, TiltZone::TooLow);
    let ok = classifier.update(&OrientationSample::from_pitch_degrees(90.0), now).unwrap();
    assert_eq!(ok.zone, TiltZone::InRange { hold_elapsed: false });
}

/// A jittery session: timer only fires after the last out-of-band sample
#[test]
fn test_jitter_session() {
    let mut classifier = TiltClassifier::default();
    let t0 = Instant::now();
    let step = Duration::from_millis(500);
    let pitches = [60.0, 75.0, 112.0, 95.0, 90.0, 69.0, 85.0];

    let mut events: Vec<ZoneEvent> = Vec::new();
    let mut now = t0;
    for pitch in pitches {
        if let Some(fired) = classifier.poll_hold(now) {
            events.push(fired);
        }
        events.extend(classifier.update(&OrientationSample::from_pitch_degrees(pitch), now));
        now += step;
    }
    assert!(events.iter().all(|e| e.reason != ReasonCode::Z002_HOLD_ELAPSED));

    // Last re-arm was the 69° sample at 2.5 s
    let last_arm = t0 + step * 5;
    let hold = Duration::from_millis(HOLD_DURATION_MS);
    assert!(classifier.poll_hold(last_arm + hold - Duration::from_millis(1)).is_none());
    let fired = classifier.poll_hold(last_arm + hold).unwrap();
    assert!(fired.zone.is_settled());
    assert_eq!(fired.seq, pitches.len() as u64 + 1);
}

/// JSON output is valid
#[test]
fn test_json_output_valid() {
    let mut classifier = TiltClassifier::default();
    let event = classifier
        .update(&OrientationSample::from_pitch_degrees(115.0), Instant::now())
        .unwrap();

    let json = serde_json::to_string(&event).unwrap();
    assert!(json.contains("\"zone\""));
    assert!(json.contains("\"TOO_HIGH\""));
    assert!(json.contains("\"reason\""));

    let _: ZoneEvent = serde_json::from_str(&json).unwrap();
}
