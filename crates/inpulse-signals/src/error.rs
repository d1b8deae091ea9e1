//! Error types
//!
//! None of these are fatal to a running engine: recompute faults are
//! logged and swallowed, and backend failures only flip `is_ready()`.

use thiserror::Error;

/// Fault raised while estimating a pulse from a buffer snapshot.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PulseError {
    #[error("non-finite sample at buffer index {index}")]
    NonFiniteSample { index: usize },
    #[error("pulse estimator panicked")]
    EstimatorPanicked,
    #[error("invalid engine configuration: {0}")]
    InvalidConfig(String),
}

/// Raw pixel buffer does not match its declared geometry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    #[error("frame data size mismatch: expected {expected} bytes, got {got}")]
    SizeMismatch { expected: usize, got: usize },
}

/// Backing resource failed to initialise.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("backend initialisation failed: {0}")]
pub struct BackendError(pub String);

impl BackendError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}
