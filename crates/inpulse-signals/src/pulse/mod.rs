//! Pulse module
//!
//! Fingertip heart-rate estimation from red-channel luminance samples.
//!
//! - `PulseEngine` - buffering, session state machine, event delivery
//! - `PulseEstimator` - stateless filter / peak / rate pipeline
//! - `ReadingAverager` - session average of intermediate readings
//! - `Clock`, `EngineBackend`, `PulseObserver` - host integration seams

mod averager;
mod backend;
mod clock;
mod engine;
mod estimator;
mod events;
mod session;

pub use averager::{ReadingAverager, ReadingSummary};
pub use backend::{EngineBackend, NullBackend};
pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::PulseEngine;
pub use estimator::{PulseEstimate, PulseEstimator, PulseReading, RateBasis};
pub use events::{ChannelObserver, PulseEvent, PulseObserver, PushOutcome};
pub use session::{SessionResult, SessionState};
