//! Core modules for Tiltguard

pub mod pitch;
pub mod classifier;
pub mod sampler;
pub mod tracker;
pub mod flow;

pub use pitch::{pitch_degrees, classify};
pub use classifier::TiltClassifier;
pub use sampler::{OrientationSampler, SampleStream, ScriptedSampler, ChannelSampler, SampleSender};
pub use tracker::{sleep_until, TiltTracker, TiltSubscription};
pub use flow::GuideFlow;
