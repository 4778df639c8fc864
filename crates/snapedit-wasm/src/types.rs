//! WASM-compatible wrapper types for image data.
//!
//! This module provides JavaScript-friendly types that wrap the core
//! SnapEdit types, handling the conversion between Rust and JavaScript
//! data representations.

use snapedit_core::{Bitmap, StickerKind};
use wasm_bindgen::prelude::*;

/// An RGBA image wrapper for JavaScript.
///
/// Pixel data is RGBA8 in row-major order (4 bytes per pixel), the same
/// layout `ImageData` uses, so buffers can be passed to and from a canvas
/// without conversion.
///
/// # Memory Management
///
/// The pixel data is stored in WASM memory. When you call `pixels()`, a copy
/// is made to JavaScript memory as a `Uint8Array`. wasm-bindgen's finalizer
/// releases the WASM-side buffer automatically.
#[wasm_bindgen]
pub struct JsBitmap {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsBitmap {
    /// Create a new JsBitmap from dimensions and pixel data.
    ///
    /// # Arguments
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    /// * `pixels` - RGBA pixel data (4 bytes per pixel, row-major order)
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> JsBitmap {
        JsBitmap {
            width,
            height,
            pixels,
        }
    }

    /// Get the image width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the image height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the number of bytes in the pixel buffer (width * height * 4)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// Returns RGBA pixel data as Uint8Array.
    ///
    /// Note: this copies the pixel data out of WASM memory.
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }
}

impl JsBitmap {
    pub(crate) fn from_bitmap(bmp: &Bitmap) -> Self {
        Self {
            width: bmp.width,
            height: bmp.height,
            pixels: bmp.pixels.clone(),
        }
    }

    /// Convert to a core Bitmap. Clones the pixel data.
    pub(crate) fn to_bitmap(&self) -> Bitmap {
        Bitmap::new(self.width, self.height, self.pixels.clone())
    }
}

/// Parse a sticker name coming from the UI.
pub(crate) fn sticker_from_str(name: &str) -> Option<StickerKind> {
    match name {
        "heart" => Some(StickerKind::Heart),
        "star" => Some(StickerKind::Star),
        _ => None,
    }
}
