//! Core types for Tiltguard

mod sample;
mod zone;
mod reason;
mod event;
mod error;
mod flow;

pub use sample::OrientationSample;
pub use zone::TiltZone;
pub use reason::ReasonCode;
pub use event::ZoneEvent;
pub use error::{TiltError, FlowError};
pub use flow::{
    FlowIssue, FlowPhase, Prompt, PROMPT_FACE, PROMPT_HOLD, PROMPT_MOVE_PHONE, PROMPT_NEXT_STEP,
    PROMPT_START_TEST, PROMPT_TEST_STARTED, PROMPT_TURN_DOWN, PROMPT_TURN_OUTSIDE,
};
