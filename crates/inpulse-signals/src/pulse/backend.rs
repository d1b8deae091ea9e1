//! Backing-resource seam
//!
//! The engine's computed-signal path needs no model, but a host may still
//! hold a native resource (an inference handle, a GPU context) whose
//! availability gates the engine. Implement `EngineBackend` to tie that
//! resource's lifetime to the engine.

use crate::error::BackendError;

/// Resource whose successful initialisation makes the engine ready
pub trait EngineBackend: Send {
    /// Acquire the resource. Called once, when attached to the engine.
    fn initialize(&mut self) -> Result<(), BackendError>;

    /// Release the resource. Called once, on engine shutdown.
    fn release(&mut self) {}
}

/// Backend with nothing to acquire
#[derive(Debug, Clone, Default)]
pub struct NullBackend;

impl EngineBackend for NullBackend {
    fn initialize(&mut self) -> Result<(), BackendError> {
        Ok(())
    }
}
