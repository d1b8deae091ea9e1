//! DSP (Digital Signal Processing) module
//!
//! Building blocks for the fingertip pulse path:
//! - `SampleRing` - fixed-capacity luminance buffer
//! - Conditioning filters (moving average, DC removal, z-score)
//! - Local-maximum peak detection and interval filtering

mod filters;
mod peaks;
mod ring;

pub use filters::{coefficient_of_variation, moving_average, normalize, remove_dc, std_dev, variance};
pub use peaks::{detect_peaks, valid_intervals};
pub use ring::SampleRing;
