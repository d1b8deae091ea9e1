//! Frame container and pixel-format conversion
//!
//! Camera pipelines hand frames over in different packings. Everything is
//! converted to row-major RGB8 once, at the boundary.

#[cfg(feature = "image-processing")]
use image::DynamicImage;

use crate::error::FrameError;

/// Image wrapper that provides unified access to pixel data
#[derive(Debug, Clone)]
pub struct Frame {
    /// Raw RGB8 pixel data (row-major)
    data: Vec<u8>,
    /// Width in pixels
    width: u32,
    /// Height in pixels
    height: u32,
}

impl Frame {
    /// Create a frame from raw RGB8 data
    pub fn from_rgb8(data: Vec<u8>, width: u32, height: u32) -> Result<Self, FrameError> {
        let expected = width as usize * height as usize * 3;
        if data.len() != expected {
            return Err(FrameError::SizeMismatch { expected, got: data.len() });
        }
        Ok(Self { data, width, height })
    }

    /// Create a frame from raw RGBA8 data, dropping alpha
    pub fn from_rgba8(data: &[u8], width: u32, height: u32) -> Result<Self, FrameError> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(FrameError::SizeMismatch { expected, got: data.len() });
        }
        Ok(Self { data: rgba_to_rgb(data), width, height })
    }

    /// Create a frame filled with a single colour
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let pixels = width as usize * height as usize;
        let mut data = Vec::with_capacity(pixels * 3);
        for _ in 0..pixels {
            data.extend_from_slice(&rgb);
        }
        Self { data, width, height }
    }

    /// Convert any decoded image
    #[cfg(feature = "image-processing")]
    pub fn from_image(img: &DynamicImage) -> Self {
        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();
        Self { data: rgb.into_raw(), width, height }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Get pixel at (x, y) as [R, G, B]; `None` outside the frame
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 3;
        Some([self.data[idx], self.data[idx + 1], self.data[idx + 2]])
    }

    /// Set pixel at (x, y); ignored outside the frame
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, rgb: [u8; 3]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 3;
        self.data[idx..idx + 3].copy_from_slice(&rgb);
    }
}

/// Convert RGBA8 to RGB8
pub fn rgba_to_rgb(rgba: &[u8]) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(rgba.len() / 4 * 3);
    for px in rgba.chunks_exact(4) {
        rgb.extend_from_slice(&px[..3]);
    }
    rgb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rgb8_checks_size() {
        assert!(Frame::from_rgb8(vec![0; 12], 2, 2).is_ok());

        let err = Frame::from_rgb8(vec![0; 11], 2, 2).unwrap_err();
        assert_eq!(err, FrameError::SizeMismatch { expected: 12, got: 11 });
    }

    #[test]
    fn test_from_rgba8_drops_alpha() {
        let rgba = vec![10, 20, 30, 255, 40, 50, 60, 0];
        let frame = Frame::from_rgba8(&rgba, 2, 1).unwrap();
        assert_eq!(frame.as_bytes(), &[10, 20, 30, 40, 50, 60]);
        assert!(Frame::from_rgba8(&rgba, 3, 1).is_err());
    }

    #[test]
    fn test_pixel_access() {
        let mut frame = Frame::filled(3, 2, [1, 2, 3]);
        assert_eq!(frame.get_pixel(2, 1), Some([1, 2, 3]));
        assert_eq!(frame.get_pixel(3, 0), None);

        frame.set_pixel(1, 1, [200, 0, 0]);
        frame.set_pixel(9, 9, [255, 255, 255]);
        assert_eq!(frame.get_pixel(1, 1), Some([200, 0, 0]));
    }

    #[cfg(feature = "image-processing")]
    #[test]
    fn test_from_image() {
        let img = image::RgbImage::from_pixel(4, 3, image::Rgb([90, 10, 10]));
        let frame = Frame::from_image(&DynamicImage::ImageRgb8(img));
        assert_eq!(frame.width(), 4);
        assert_eq!(frame.height(), 3);
        assert_eq!(frame.get_pixel(3, 2), Some([90, 10, 10]));
    }
}
