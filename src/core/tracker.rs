//! Tilt Tracker: runs a TiltClassifier on its own task
//!
//! Samples, hold-timer expiry and stop requests are serialised through one
//! `tokio::select!` loop, so classifier state has a single owner. Events go out
//! on an unbounded channel in the order they happen; a terminal sensor error
//! goes out on a separate oneshot.

use futures_util::StreamExt;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use crate::config::TiltConfig;
use crate::core::classifier::TiltClassifier;
use crate::core::sampler::{OrientationSampler, SampleStream};
use crate::types::{TiltError, ZoneEvent};

/// Observer side of one tracking session
#[derive(Debug)]
pub struct TiltSubscription {
    /// Zone events, in order. Closes when the session ends.
    pub events: mpsc::UnboundedReceiver<ZoneEvent>,
    /// At most one terminal error. Resolves to `Err` if the session ended cleanly.
    pub failure: oneshot::Receiver<TiltError>,
}

impl TiltSubscription {
    /// Next event, or `None` once the session has ended
    pub async fn next_event(&mut self) -> Option<ZoneEvent> {
        self.events.recv().await
    }

    /// Drain remaining events, then report the terminal error if there was one
    pub async fn finish(mut self) -> (Vec<ZoneEvent>, Option<TiltError>) {
        let mut rest = Vec::new();
        while let Some(event) = self.events.recv().await {
            rest.push(event);
        }
        (rest, self.failure.await.ok())
    }
}

struct RunningSession {
    sampler: Box<dyn OrientationSampler>,
    stop_tx: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

/// Starts and stops classification sessions
pub struct TiltTracker {
    config: TiltConfig,
    running: Option<RunningSession>,
}

impl Default for TiltTracker {
    fn default() -> Self {
        Self::new(TiltConfig::default())
    }
}

impl TiltTracker {
    pub fn new(config: TiltConfig) -> Self {
        Self {
            config,
            running: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
            .as_ref()
            .map(|s| !s.task.is_finished())
            .unwrap_or(false)
    }

    /// Start a session on `sampler`.
    ///
    /// Must be called inside a tokio runtime. Fails with `SensorUnavailable`
    /// before any event is produced if the sampler cannot start.
    pub fn start<S>(&mut self, mut sampler: S) -> Result<TiltSubscription, TiltError>
    where
        S: OrientationSampler + 'static,
    {
        if self.is_running() {
            return Err(TiltError::AlreadyRunning);
        }
        // A session that ended on a sensor error still owns its sampler
        if let Some(mut finished) = self.running.take() {
            finished.sampler.stop();
        }
        if !sampler.is_available() {
            warn!("device motion unavailable, session not started");
            return Err(TiltError::SensorUnavailable);
        }
        let samples = sampler.start(self.config.sample_interval()).map_err(|e| {
            warn!(error = %e, "sampler refused to start");
            e
        })?;

        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (failure_tx, failure_rx) = oneshot::channel();
        let (stop_tx, stop_rx) = oneshot::channel();

        let classifier = TiltClassifier::new(&self.config);
        let task = tokio::spawn(run_session(classifier, samples, stop_rx, event_tx, failure_tx));

        info!(
            min_pitch = self.config.min_pitch_deg,
            max_pitch = self.config.max_pitch_deg,
            hold_ms = self.config.hold_duration_ms,
            "tilt tracking started"
        );

        self.running = Some(RunningSession {
            sampler: Box::new(sampler),
            stop_tx,
            task,
        });

        Ok(TiltSubscription {
            events: event_rx,
            failure: failure_rx,
        })
    }

    /// Stop the session: cancel the hold timer, reset to NONE, halt the sampler.
    ///
    /// Returns once the session task has exited, so nothing is delivered after
    /// this resolves. No-op when not started.
    pub async fn stop(&mut self) -> Result<(), TiltError> {
        let Some(mut session) = self.running.take() else {
            return Ok(());
        };
        let _ = session.stop_tx.send(());
        session.sampler.stop();

        match session.task.await {
            Ok(()) => {
                info!("tilt tracking stopped");
                Ok(())
            }
            Err(e) if e.is_panic() => {
                error!(error = %e, "classifier task panicked");
                Err(TiltError::InternalReferenceLost)
            }
            Err(_) => Ok(()),
        }
    }
}

impl Drop for TiltTracker {
    fn drop(&mut self) {
        if let Some(session) = self.running.take() {
            session.task.abort();
        }
    }
}

/// Sleep until `deadline`, or forever when there is none
pub async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

async fn run_session(
    mut classifier: TiltClassifier,
    mut samples: SampleStream,
    mut stop_rx: oneshot::Receiver<()>,
    event_tx: mpsc::UnboundedSender<ZoneEvent>,
    failure_tx: oneshot::Sender<TiltError>,
) {
    let mut samples_open = true;

    loop {
        let deadline = classifier.hold_deadline();

        tokio::select! {
            biased;

            // Explicit stop, or the tracker was dropped
            _ = &mut stop_rx => {
                if let Some(event) = classifier.reset() {
                    let _ = event_tx.send(event);
                }
                break;
            }

            _ = sleep_until(deadline) => {
                if let Some(event) = classifier.poll_hold(Instant::now()) {
                    let _ = event_tx.send(event);
                }
            }

            next = samples.next(), if samples_open => match next {
                Some(Ok(sample)) => {
                    if let Some(event) = classifier.update(&sample, Instant::now()) {
                        let _ = event_tx.send(event);
                    }
                }
                Some(Err(err)) => {
                    warn!(error = %err, "sensor stream failed, session terminated");
                    let _ = failure_tx.send(err);
                    break;
                }
                None => {
                    debug!(samples = classifier.sample_count(), "sample stream ended");
                    samples_open = false;
                }
            },
        }
    }
}
