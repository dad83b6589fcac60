//! Orientation samplers: sources of attitude samples
//!
//! A sampler hands out one lazy stream per session. Streams are not restartable;
//! a second `start` on the same sampler fails with `SensorUnavailable`.

use std::time::Duration;

use futures_util::stream::{self, BoxStream, StreamExt};
use tokio::sync::mpsc;
use tracing::debug;

use crate::types::{OrientationSample, TiltError};

/// Stream of samples (or a terminal sensor error)
pub type SampleStream = BoxStream<'static, Result<OrientationSample, TiltError>>;

/// Source of device attitude samples
pub trait OrientationSampler: Send {
    /// Whether the underlying sensor exists
    fn is_available(&self) -> bool;

    /// Begin sampling at `interval`
    fn start(&mut self, interval: Duration) -> Result<SampleStream, TiltError>;

    /// Halt sampling. Idempotent.
    fn stop(&mut self);
}

// =============================================================================
// SCRIPTED
// =============================================================================

/// Replays a fixed script, one entry per interval (first entry immediately)
#[derive(Debug)]
pub struct ScriptedSampler {
    script: Option<Vec<Result<OrientationSample, TiltError>>>,
    available: bool,
}

impl ScriptedSampler {
    pub fn new(script: Vec<Result<OrientationSample, TiltError>>) -> Self {
        Self {
            script: Some(script),
            available: true,
        }
    }

    /// Script of pitch angles (degrees)
    pub fn from_pitches(pitches: &[f64]) -> Self {
        Self::new(
            pitches
                .iter()
                .map(|p| Ok(OrientationSample::from_pitch_degrees(*p)))
                .collect(),
        )
    }

    /// A sampler whose sensor does not exist
    pub fn unavailable() -> Self {
        Self {
            script: None,
            available: false,
        }
    }
}

impl OrientationSampler for ScriptedSampler {
    fn is_available(&self) -> bool {
        self.available
    }

    fn start(&mut self, interval: Duration) -> Result<SampleStream, TiltError> {
        if !self.available {
            return Err(TiltError::SensorUnavailable);
        }
        let script = self.script.take().ok_or(TiltError::SensorUnavailable)?;
        debug!(entries = script.len(), ?interval, "scripted sampler started");

        let state = (script.into_iter(), true);
        let stream = stream::unfold(state, move |(mut entries, first)| async move {
            let entry = entries.next()?;
            if !first {
                tokio::time::sleep(interval).await;
            }
            Some((entry, (entries, false)))
        });
        Ok(stream.boxed())
    }

    fn stop(&mut self) {
        self.script = None;
    }
}

// =============================================================================
// CHANNEL
// =============================================================================

/// Producer half of a [`ChannelSampler`]; usable from any thread
#[derive(Debug, Clone)]
pub struct SampleSender {
    tx: mpsc::UnboundedSender<Result<OrientationSample, TiltError>>,
}

impl SampleSender {
    /// Deliver a sample; false once the consumer is gone
    pub fn send(&self, sample: OrientationSample) -> bool {
        self.tx.send(Ok(sample)).is_ok()
    }

    /// Report a sensor failure; ends the consumer's stream
    pub fn fail(&self, err: TiltError) -> bool {
        self.tx.send(Err(err)).is_ok()
    }
}

/// Sampler fed by another thread or task.
///
/// The producer sets the cadence; `interval` is advisory only.
#[derive(Debug)]
pub struct ChannelSampler {
    rx: Option<mpsc::UnboundedReceiver<Result<OrientationSample, TiltError>>>,
}

impl ChannelSampler {
    pub fn new() -> (Self, SampleSender) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { rx: Some(rx) }, SampleSender { tx })
    }
}

impl OrientationSampler for ChannelSampler {
    fn is_available(&self) -> bool {
        self.rx.is_some()
    }

    fn start(&mut self, interval: Duration) -> Result<SampleStream, TiltError> {
        let rx = self.rx.take().ok_or(TiltError::SensorUnavailable)?;
        debug!(?interval, "channel sampler started");
        let stream = stream::unfold(rx, |mut rx| async move {
            let item = rx.recv().await?;
            Some((item, rx))
        });
        Ok(stream.boxed())
    }

    fn stop(&mut self) {
        self.rx = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_scripted_cadence() {
        let mut sampler = ScriptedSampler::from_pitches(&[10.0, 20.0, 30.0]);
        let mut stream = sampler.start(Duration::from_millis(500)).unwrap();

        let t0 = tokio::time::Instant::now();
        stream.next().await.unwrap().unwrap();
        assert_eq!(t0.elapsed(), Duration::ZERO);
        stream.next().await.unwrap().unwrap();
        stream.next().await.unwrap().unwrap();
        assert_eq!(t0.elapsed(), Duration::from_secs(1));
        assert!(stream.next().await.is_none());
    }

    #[test]
    fn test_scripted_not_restartable() {
        let mut sampler = ScriptedSampler::from_pitches(&[90.0]);
        assert!(sampler.start(Duration::from_millis(500)).is_ok());
        assert_eq!(
            sampler.start(Duration::from_millis(500)).err(),
            Some(TiltError::SensorUnavailable)
        );
    }

    #[test]
    fn test_unavailable() {
        let mut sampler = ScriptedSampler::unavailable();
        assert!(!sampler.is_available());
        assert_eq!(
            sampler.start(Duration::from_millis(500)).err(),
            Some(TiltError::SensorUnavailable)
        );
    }

    #[tokio::test]
    async fn test_channel_handoff_from_thread() {
        let (mut sampler, sender) = ChannelSampler::new();
        let mut stream = sampler.start(Duration::from_millis(500)).unwrap();

        std::thread::spawn(move || {
            sender.send(OrientationSample::from_pitch_degrees(90.0));
            sender.fail(TiltError::MotionDataMissing);
        })
        .join()
        .unwrap();

        assert!(stream.next().await.unwrap().is_ok());
        assert_eq!(stream.next().await.unwrap(), Err(TiltError::MotionDataMissing));
        assert!(stream.next().await.is_none());
    }
}
