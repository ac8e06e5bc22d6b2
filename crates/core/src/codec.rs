//! Frame codec seam
//!
//! The relay treats encoded frames as opaque bytes; decoding only happens
//! when a frame has to go through the detector. The codec is a collaborator
//! behind a trait so transports and tests can substitute their own.

use crate::error::{Error, Result};
use crate::frame::PixelBuffer;

/// Decodes an incoming encoded frame into raw pixels with known dimensions.
pub trait FrameCodec: Send + Sync {
    /// Decode an encoded frame.
    ///
    /// Fails with [`Error::Decode`] on malformed input; the relay converts
    /// that into a dropped-frame log entry, never a crash.
    fn decode(&self, data: &[u8]) -> Result<PixelBuffer>;
}

/// Default codec over the `image` crate (JPEG and PNG payloads), guessing
/// the format from the payload bytes.
#[derive(Debug, Clone, Default)]
pub struct ImageCodec;

impl ImageCodec {
    pub fn new() -> Self {
        Self
    }
}

impl FrameCodec for ImageCodec {
    fn decode(&self, data: &[u8]) -> Result<PixelBuffer> {
        let image = image::load_from_memory(data).map_err(|e| Error::Decode(e.to_string()))?;
        let rgb = image.to_rgb8();
        let (width, height) = rgb.dimensions();
        Ok(PixelBuffer {
            data: rgb.into_raw(),
            width,
            height,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([9, 80, 200])));
        let mut buf = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn test_decode_reports_dimensions() {
        let decoded = ImageCodec::new().decode(&png_bytes(8, 6)).unwrap();
        assert_eq!(decoded.width, 8);
        assert_eq!(decoded.height, 6);
        assert_eq!(decoded.data.len(), 8 * 6 * 3);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = ImageCodec::new().decode(b"definitely not an image").unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }
}
