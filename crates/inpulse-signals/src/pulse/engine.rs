//! Pulse Engine
//!
//! Real-time fingertip pulse engine that orchestrates:
//! - Sample buffering in a fixed-capacity ring
//! - Incremental pulse estimation once enough samples are buffered
//! - The measurement session state machine and its deadline
//!
//! Deadlines are checked opportunistically inside `push`; there is no timer
//! thread. A timed session that stops receiving samples only completes on
//! `stop_session`, `reset_session` or `shutdown`.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::time::Duration;

use super::backend::{EngineBackend, NullBackend};
use super::clock::{Clock, SystemClock};
use super::estimator::{PulseEstimate, PulseEstimator, PulseReading};
use super::events::{PulseEvent, PulseObserver, PushOutcome};
use super::session::{SessionResult, SessionState};
use crate::config::PulseConfig;
use crate::dsp::SampleRing;
use crate::error::PulseError;
use crate::vision::{red_channel_mean, Frame};

/// Fingertip PPG engine.
///
/// Single writer: one thread feeds `push`. Every operation is synchronous
/// and bounded by the buffer capacity.
pub struct PulseEngine {
    config: PulseConfig,

    /// Luminance samples, oldest first
    buffer: SampleRing,

    estimator: PulseEstimator,

    session: SessionState,

    /// Last successful estimate; retained across faulted recomputes
    last_reading: PulseReading,

    backend: Box<dyn EngineBackend>,

    clock: Box<dyn Clock>,

    observer: Option<Box<dyn PulseObserver>>,

    ready: bool,

    /// Set by a failed backend initialisation; never cleared
    init_failed: bool,

    shut_down: bool,
}

impl PulseEngine {
    /// Create engine with default config
    pub fn new() -> Self {
        Self::build(PulseConfig::default())
    }

    /// Create engine with custom config
    pub fn with_config(config: PulseConfig) -> Result<Self, PulseError> {
        config
            .validate()
            .map_err(|e| PulseError::InvalidConfig(e.to_string()))?;
        Ok(Self::build(config))
    }

    fn build(config: PulseConfig) -> Self {
        Self {
            buffer: SampleRing::new(config.buffer_capacity),
            estimator: PulseEstimator::new(config.clone()),
            session: SessionState::Waiting,
            last_reading: PulseReading::default(),
            backend: Box::new(NullBackend),
            clock: Box::new(SystemClock::new()),
            observer: None,
            ready: true,
            init_failed: false,
            shut_down: false,
            config,
        }
    }

    /// Attach the backing resource and initialise it.
    ///
    /// On failure the engine stays permanently not-ready and every later
    /// `push` is ignored, even if another backend is attached afterwards.
    pub fn with_backend(mut self, mut backend: Box<dyn EngineBackend>) -> Self {
        match backend.initialize() {
            Ok(()) => self.ready = !self.init_failed,
            Err(e) => {
                log::error!("pulse engine not initialised: {}", e);
                self.init_failed = true;
                self.ready = false;
            }
        }
        self.backend = backend;
        self
    }

    /// Replace the session clock
    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Deliver events to `observer` in addition to the return values
    pub fn with_observer(mut self, observer: Box<dyn PulseObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn set_observer(&mut self, observer: Option<Box<dyn PulseObserver>>) {
        self.observer = observer;
    }

    /// True once the backing resource initialised; false after shutdown
    pub fn is_ready(&self) -> bool {
        self.ready && !self.init_failed && !self.shut_down
    }

    /// Feed one luminance sample.
    ///
    /// Ignored when not ready or when the session is completed.
    pub fn push(&mut self, sample: f32) -> PushOutcome {
        let mut outcome = PushOutcome::default();
        if !self.is_ready() || self.session.is_completed() {
            return outcome;
        }

        self.buffer.push(sample);

        if self.buffer.len() >= self.config.min_frames {
            if let Some(reading) = self.recompute() {
                self.emit(PulseEvent::PulseUpdated(reading));
                outcome.update = Some(reading);
            }
        }

        if self.session.deadline_reached(self.clock.now_ms()) {
            log::info!("measurement deadline reached");
            outcome.completed = self.finalize();
        }

        outcome
    }

    /// Reduce a frame to its red-channel mean and push it
    pub fn process_frame(&mut self, frame: &Frame) -> PushOutcome {
        // Same guard as `push`; skips the ROI reduction for ignored frames
        if !self.is_ready() || self.session.is_completed() {
            return PushOutcome::default();
        }
        self.push(red_channel_mean(frame))
    }

    /// Begin measuring. `None` runs until `stop_session`.
    ///
    /// Only valid from `Waiting`; otherwise a no-op.
    pub fn start_session(&mut self, duration: Option<Duration>) {
        if !self.session.is_waiting() {
            log::debug!("start_session ignored in state {:?}", self.session);
            return;
        }
        let started_at_ms = self.clock.now_ms();
        log::info!("measurement started (deadline: {:?})", duration);
        self.session = SessionState::Measuring { started_at_ms, deadline: duration };
    }

    /// Begin measuring against the configured default duration
    pub fn start_timed_session(&mut self) {
        self.start_session(Some(self.config.session_duration()));
    }

    /// Finish a measuring session. Returns the result only on the call that
    /// completed it.
    pub fn stop_session(&mut self) -> Option<SessionResult> {
        self.finalize()
    }

    /// Return to `Waiting`, keeping the buffer.
    ///
    /// A measuring session is completed first; its result is returned.
    pub fn reset_session(&mut self) -> Option<SessionResult> {
        let result = self.finalize();
        self.session = SessionState::Waiting;
        result
    }

    /// `reset_session` plus clearing the buffer and the last reading
    pub fn reset(&mut self) -> Option<SessionResult> {
        let result = self.reset_session();
        self.buffer.clear();
        self.last_reading = PulseReading::default();
        result
    }

    /// Stop any running session, release the backend and go inert.
    /// Safe to call repeatedly.
    pub fn shutdown(&mut self) -> Option<SessionResult> {
        if self.shut_down {
            return None;
        }
        let result = self.finalize();
        self.backend.release();
        self.shut_down = true;
        log::debug!("pulse engine shut down");
        result
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn last_reading(&self) -> PulseReading {
        self.last_reading
    }

    pub fn buffer_len(&self) -> usize {
        self.buffer.len()
    }

    /// Buffered samples, oldest first
    pub fn samples(&self) -> Vec<f32> {
        self.buffer.to_vec()
    }

    pub fn config(&self) -> &PulseConfig {
        &self.config
    }

    /// Estimate over the current buffer without touching engine state
    pub fn estimate(&self) -> Result<PulseEstimate, PulseError> {
        self.estimator.estimate(&self.buffer.snapshot())
    }

    /// Recompute over the buffer; faults keep the previous reading
    fn recompute(&mut self) -> Option<PulseReading> {
        let snapshot = self.buffer.snapshot();
        let estimator = &self.estimator;

        let result = catch_unwind(AssertUnwindSafe(|| estimator.estimate(&snapshot)))
            .unwrap_or(Err(PulseError::EstimatorPanicked));

        match result {
            Ok(estimate) => {
                log::debug!(
                    "pulse {:.1} bpm (confidence {:.2}, {} peaks, {:?})",
                    estimate.reading.bpm,
                    estimate.reading.confidence,
                    estimate.peak_count,
                    estimate.basis
                );
                self.last_reading = estimate.reading;
                Some(estimate.reading)
            }
            Err(e) => {
                log::warn!("pulse recompute failed, keeping previous reading: {}", e);
                None
            }
        }
    }

    /// `Measuring -> Completed`, exactly once per session
    fn finalize(&mut self) -> Option<SessionResult> {
        if !self.session.is_measuring() {
            return None;
        }

        let result = if self.buffer.len() >= self.config.min_frames {
            // A faulted final recompute falls back to the retained reading
            let reading = self.recompute().unwrap_or(self.last_reading);
            SessionResult {
                final_bpm: reading.bpm,
                final_confidence: reading.confidence,
            }
        } else {
            SessionResult::INSUFFICIENT
        };

        self.session = SessionState::Completed { result };
        log::info!(
            "measurement completed: {:.1} bpm (confidence {:.2})",
            result.final_bpm,
            result.final_confidence
        );
        self.emit(PulseEvent::SessionCompleted(result));
        Some(result)
    }

    fn emit(&mut self, event: PulseEvent) {
        if let Some(observer) = self.observer.as_mut() {
            observer.on_event(&event);
        }
    }
}

impl Default for PulseEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for PulseEngine {
    fn drop(&mut self) {
        self.shutdown();
    }
}
