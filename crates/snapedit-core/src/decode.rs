//! Image decoding for load.
//!
//! Accepts the compressed byte formats the `image` crate is built with here
//! (PNG and JPEG) and normalizes everything to an RGBA [`Bitmap`] so the
//! rest of the pipeline never sees a palette, grayscale or RGB variant.

use thiserror::Error;

use crate::bitmap::Bitmap;

/// Errors that can occur during decoding
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Unrecognized or unsupported image format")]
    InvalidFormat,

    #[error("Corrupted image file: {0}")]
    CorruptedFile(String),
}

/// Decode a compressed image byte buffer into an RGBA bitmap.
pub fn decode_image(bytes: &[u8]) -> Result<Bitmap, DecodeError> {
    let img = image::load_from_memory(bytes).map_err(|e| match e {
        image::ImageError::Unsupported(_) => DecodeError::InvalidFormat,
        other => DecodeError::CorruptedFile(other.to_string()),
    })?;

    Ok(Bitmap::from_rgba_image(img.to_rgba8()))
}
