//! Error taxonomy

use thiserror::Error;

/// Terminal errors of a tracking session
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TiltError {
    /// The attitude sensor cannot be started
    #[error("device motion unavailable")]
    SensorUnavailable,
    /// The sensor delivered an update without attitude data
    #[error("device motion update carried no attitude data")]
    MotionDataMissing,
    /// The classifier task vanished while the session was running
    #[error("classifier task lost")]
    InternalReferenceLost,
    /// `start` called on a tracker that is already running
    #[error("tracker already running")]
    AlreadyRunning,
    /// Configuration could not be loaded or is inconsistent
    #[error("invalid configuration: {message}")]
    Config { message: String },
}

/// Requests the guide flow refuses
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlowError {
    #[error("test can only start from face detection (current phase: {0})")]
    WrongPhase(crate::types::FlowPhase),
    #[error("no face detected yet")]
    NoFaceDetected,
}
