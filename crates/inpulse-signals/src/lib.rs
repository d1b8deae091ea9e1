//! # inpulse-signals
//!
//! Fingertip photoplethysmography for InPulse.
//!
//! The subject covers the camera lens with a flash-lit fingertip; the red
//! channel brightens and dims with each blood-volume pulse. This crate
//! provides:
//! - **Frame Reducer**: mean red intensity over a centred region
//! - **DSP functions**: ring buffer, smoothing, DC removal, peak detection
//! - **Pulse Engine**: incremental heart rate + confidence and timed
//!   measurement sessions
//!
//! ## Example
//!
//! ```ignore
//! use inpulse_signals::{PulseEngine, PulseEvent};
//! use inpulse_signals::vision::Frame;
//!
//! let mut engine = PulseEngine::new();
//! engine.start_timed_session();
//!
//! for frame in camera_frames {
//!     for event in engine.process_frame(&frame).events() {
//!         match event {
//!             PulseEvent::PulseUpdated(r) => println!("{:.0} BPM ({:.2})", r.bpm, r.confidence),
//!             PulseEvent::SessionCompleted(r) => println!("final: {:.0} BPM", r.final_bpm),
//!         }
//!     }
//! }
//! ```

pub mod config;
pub mod dsp;
pub mod error;
pub mod pulse;
pub mod synth;
pub mod vision;

pub use config::{ConfigError, PulseConfig};
pub use error::{BackendError, FrameError, PulseError};
pub use pulse::{
    PulseEngine, PulseEstimate, PulseEstimator, PulseEvent, PulseReading, PushOutcome, SessionResult,
    SessionState,
};
