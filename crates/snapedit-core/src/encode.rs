//! Image encoding for export.
//!
//! Export always reads from the composited display surface, so what gets
//! saved is exactly what is on screen (filters, transform, overlays and
//! letterbox gaps included). PNG is the primary format because the surface
//! carries alpha; JPEG export flattens transparency over black.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use thiserror::Error;

/// Errors that can occur during encoding
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("Invalid pixel data: expected {expected} bytes, got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("Encoding failed: {0}")]
    EncodingFailed(String),
}

fn validate(pixels: &[u8], width: u32, height: u32) -> Result<(), EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }
    let expected = (width as usize) * (height as usize) * 4;
    if pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: pixels.len(),
        });
    }
    Ok(())
}

/// Encode RGBA pixel data as PNG.
pub fn encode_png(pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>, EncodeError> {
    validate(pixels, width, height)?;

    let mut output = Vec::new();
    let encoder = PngEncoder::new(&mut output);
    encoder
        .write_image(pixels, width, height, ExtendedColorType::Rgba8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(output)
}

/// Encode RGBA pixel data as JPEG at the given quality (1-100).
///
/// JPEG has no alpha channel; partially transparent pixels are flattened
/// over a black background.
pub fn encode_jpeg(
    pixels: &[u8],
    width: u32,
    height: u32,
    quality: u8,
) -> Result<Vec<u8>, EncodeError> {
    validate(pixels, width, height)?;

    let pixel_count = (width as usize) * (height as usize);
    let mut rgb = Vec::with_capacity(pixel_count * 3);
    for chunk in pixels.chunks_exact(4) {
        let a = chunk[3] as u16;
        rgb.push(((chunk[0] as u16 * a) / 255) as u8);
        rgb.push(((chunk[1] as u16 * a) / 255) as u8);
        rgb.push(((chunk[2] as u16 * a) / 255) as u8);
    }

    let mut output = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut output, quality.clamp(1, 100));
    encoder
        .write_image(&rgb, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(output)
}
