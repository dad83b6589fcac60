//! Guide flow phases, issues and prompts

use serde::{Deserialize, Serialize};

use crate::types::TiltError;

/// Which screen of the guide is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlowPhase {
    /// Tilting the phone into the band
    #[default]
    Positioning,
    /// Waiting for a face in front of the camera
    FaceDetection,
    /// Test started
    StartTest,
}

impl std::fmt::Display for FlowPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FlowPhase::Positioning => "POSITIONING",
            FlowPhase::FaceDetection => "FACE_DETECTION",
            FlowPhase::StartTest => "START_TEST",
        };
        write!(f, "{}", name)
    }
}

/// Observer-facing classification of a terminal tracking error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlowIssue {
    /// Bug in the app itself
    ApplicationIssue,
    /// Motion hardware or data problem
    MotionIssue,
}

impl From<&TiltError> for FlowIssue {
    fn from(err: &TiltError) -> Self {
        match err {
            TiltError::InternalReferenceLost
            | TiltError::AlreadyRunning
            | TiltError::Config { .. } => FlowIssue::ApplicationIssue,
            TiltError::SensorUnavailable | TiltError::MotionDataMissing => FlowIssue::MotionIssue,
        }
    }
}

/// Title and subtitle shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Prompt {
    pub title: &'static str,
    pub subtitle: &'static str,
}

pub const PROMPT_MOVE_PHONE: &str = "Move your phone to the designated position";
pub const PROMPT_HOLD: &str = "Hold your position for a bit longer";
/// Direction cue above the band
pub const PROMPT_TURN_OUTSIDE: &str = "Turn outside of your face";
/// Direction cue below the band
pub const PROMPT_TURN_DOWN: &str = "Turn down towards your face";
pub const PROMPT_NEXT_STEP: &str = "Great now we can move on to the next step";
pub const PROMPT_FACE: &str = "Look at the camera";
pub const PROMPT_START_TEST: &str = "Press START TEST";
pub const PROMPT_TEST_STARTED: &str = "Test Started";
