//! Guide Flow: positioning → face detection → start test
//!
//! Phase changes are scheduled, not immediate: a decision at `now` takes effect
//! on the first `poll` at or after `now + navigation_delay`.

use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::TiltConfig;
use crate::types::{
    FlowError, FlowIssue, FlowPhase, Prompt, TiltError, TiltZone, ZoneEvent, PROMPT_FACE,
    PROMPT_HOLD, PROMPT_MOVE_PHONE, PROMPT_NEXT_STEP, PROMPT_START_TEST, PROMPT_TEST_STARTED,
    PROMPT_TURN_DOWN, PROMPT_TURN_OUTSIDE,
};

/// Observer-facing state of the whole guide
#[derive(Debug)]
pub struct GuideFlow {
    phase: FlowPhase,
    zone: TiltZone,
    face_detected: bool,
    issue: Option<FlowIssue>,
    /// Scheduled phase change and when it applies
    pending: Option<(FlowPhase, Instant)>,
    navigation_delay: Duration,
}

impl Default for GuideFlow {
    fn default() -> Self {
        Self::new(&TiltConfig::default())
    }
}

impl GuideFlow {
    pub fn new(config: &TiltConfig) -> Self {
        Self {
            phase: FlowPhase::Positioning,
            zone: TiltZone::None,
            face_detected: false,
            issue: None,
            pending: None,
            navigation_delay: config.navigation_delay(),
        }
    }

    /// Feed one classifier event
    pub fn on_event(&mut self, event: &ZoneEvent, now: Instant) {
        self.zone = event.zone;
        if self.phase != FlowPhase::Positioning {
            return;
        }
        match event.zone {
            TiltZone::InRange { hold_elapsed: true } => {
                if self.pending.is_none() {
                    debug!("device settled, face detection scheduled");
                    self.pending = Some((FlowPhase::FaceDetection, now + self.navigation_delay));
                }
            }
            TiltZone::None => {
                if self.pending.take().is_some() {
                    debug!("tracking reset, scheduled navigation dropped");
                }
            }
            _ => {}
        }
    }

    /// Feed face presence. Ignored outside face detection.
    pub fn on_face(&mut self, present: bool) {
        if self.phase == FlowPhase::FaceDetection {
            self.face_detected = present;
        }
    }

    /// Record a terminal tracking error
    pub fn on_failure(&mut self, err: &TiltError) {
        let issue = FlowIssue::from(err);
        warn!(error = %err, ?issue, "tracking failed");
        self.issue = Some(issue);
    }

    /// User pressed START TEST
    pub fn request_test(&mut self, now: Instant) -> Result<(), FlowError> {
        if self.phase != FlowPhase::FaceDetection {
            return Err(FlowError::WrongPhase(self.phase));
        }
        if !self.face_detected {
            return Err(FlowError::NoFaceDetected);
        }
        self.pending = Some((FlowPhase::StartTest, now + self.navigation_delay));
        Ok(())
    }

    /// Apply a due phase change; returns the new phase if one happened
    pub fn poll(&mut self, now: Instant) -> Option<FlowPhase> {
        let (next, at) = self.pending?;
        if now < at {
            return None;
        }
        self.pending = None;
        self.phase = next;
        if next == FlowPhase::FaceDetection {
            self.face_detected = false;
        }
        info!(phase = %next, "guide phase changed");
        Some(next)
    }

    /// When the scheduled phase change applies
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.map(|(_, at)| at)
    }

    pub fn phase(&self) -> FlowPhase {
        self.phase
    }

    pub fn zone(&self) -> TiltZone {
        self.zone
    }

    pub fn face_detected(&self) -> bool {
        self.face_detected
    }

    /// START TEST is enabled only while a face is in view
    pub fn start_enabled(&self) -> bool {
        self.phase == FlowPhase::FaceDetection && self.face_detected
    }

    pub fn issue(&self) -> Option<FlowIssue> {
        self.issue
    }

    /// Text for the current screen
    pub fn prompt(&self) -> Prompt {
        match self.phase {
            FlowPhase::Positioning => match self.zone {
                TiltZone::InRange { hold_elapsed: true } => Prompt {
                    title: PROMPT_NEXT_STEP,
                    subtitle: "",
                },
                TiltZone::InRange { hold_elapsed: false } => Prompt {
                    title: PROMPT_MOVE_PHONE,
                    subtitle: PROMPT_HOLD,
                },
                TiltZone::TooHigh => Prompt {
                    title: PROMPT_MOVE_PHONE,
                    subtitle: PROMPT_TURN_OUTSIDE,
                },
                TiltZone::TooLow => Prompt {
                    title: PROMPT_MOVE_PHONE,
                    subtitle: PROMPT_TURN_DOWN,
                },
                TiltZone::None => Prompt {
                    title: PROMPT_MOVE_PHONE,
                    subtitle: "",
                },
            },
            FlowPhase::FaceDetection => Prompt {
                title: if self.face_detected { PROMPT_START_TEST } else { PROMPT_FACE },
                subtitle: "",
            },
            FlowPhase::StartTest => Prompt {
                title: PROMPT_TEST_STARTED,
                subtitle: "",
            },
        }
    }
}
