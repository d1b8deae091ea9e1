//! Vision module: frame ingestion and the Frame Reducer
//!
//! This module provides:
//! - `Frame` struct holding RGB8 pixels (RGBA8 and, with the
//!   `image-processing` feature, `image::DynamicImage` are converted on entry)
//! - `red_channel_mean` to turn a fingertip frame into one luminance sample
//!
//! # Example
//!
//! ```ignore
//! use inpulse_signals::vision::{red_channel_mean, Frame};
//!
//! let frame = Frame::from_rgba8(&camera_bytes, 640, 480)?;
//! let sample = red_channel_mean(&frame);
//! ```

mod image_ops;
mod roi;

pub use image_ops::{rgba_to_rgb, Frame};
pub use roi::{red_channel_mean, roi_channel_mean, Roi};
