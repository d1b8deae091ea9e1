//! Region-of-interest sampling
//!
//! Reduces a fingertip frame to the scalar luminance sample the pulse
//! engine consumes: the mean red channel over a centred square.

use super::image_ops::Frame;

/// Rectangular region in pixel coordinates. May extend past the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Roi {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

impl Roi {
    /// Square centred on the frame with side half the shorter dimension.
    pub fn centered(frame_width: u32, frame_height: u32) -> Self {
        let radius = (frame_width.min(frame_height) / 4) as i64;
        let cx = (frame_width / 2) as i64;
        let cy = (frame_height / 2) as i64;
        let side = (2 * radius) as u32;
        Self {
            x: cx - radius,
            y: cy - radius,
            width: side,
            height: side,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Mean of one colour channel over `roi`, skipping pixels outside the frame.
///
/// Returns 0 when no pixel of the region lies inside the frame.
pub fn roi_channel_mean(frame: &Frame, roi: Roi, channel: usize) -> f32 {
    let mut sum = 0.0f64;
    let mut count = 0u64;

    for dy in 0..roi.height as i64 {
        let y = roi.y + dy;
        if y < 0 || y >= frame.height() as i64 {
            continue;
        }
        for dx in 0..roi.width as i64 {
            let x = roi.x + dx;
            if x < 0 || x >= frame.width() as i64 {
                continue;
            }
            if let Some(px) = frame.get_pixel(x as u32, y as u32) {
                sum += px[channel] as f64;
                count += 1;
            }
        }
    }

    if count > 0 {
        (sum / count as f64) as f32
    } else {
        0.0
    }
}

/// Frame Reducer: mean red intensity over the centred fingertip region.
pub fn red_channel_mean(frame: &Frame) -> f32 {
    roi_channel_mean(frame, Roi::centered(frame.width(), frame.height()), 0)
}
