//! Editor session bindings.
//!
//! Wraps the core [`snapedit_core::EditorSession`] behind a wasm-bindgen
//! class. The host owns a single session per open image, pushes pointer and
//! slider events into it, and reads the composited surface back out for
//! display (e.g. via `putImageData`).

use wasm_bindgen::prelude::*;

use crate::types::{sticker_from_str, JsBitmap};

/// A complete editing session over one image.
#[wasm_bindgen]
pub struct EditorSession {
    inner: snapedit_core::EditorSession,
}

#[wasm_bindgen]
impl EditorSession {
    /// Create an empty session for a display container of the given size.
    #[wasm_bindgen(constructor)]
    pub fn new(container_width: u32, container_height: u32) -> EditorSession {
        EditorSession {
            inner: snapedit_core::EditorSession::new(container_width, container_height),
        }
    }

    // ===== Loading =====

    /// Load decoded RGBA pixels (e.g. from a canvas `ImageData`).
    pub fn load_image(&mut self, image: &JsBitmap) {
        self.inner.load_image(image.to_bitmap());
    }

    /// Decode and load a compressed image file (PNG or JPEG bytes).
    pub fn load_image_bytes(&mut self, bytes: &[u8]) -> Result<(), JsValue> {
        self.inner
            .load_image_bytes(bytes)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Provide TTF/OTF font bytes for text overlays.
    pub fn set_font(&mut self, bytes: Vec<u8>) -> Result<(), JsValue> {
        self.inner
            .set_font(bytes)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Whether an image is currently loaded.
    pub fn is_loaded(&self) -> bool {
        self.inner.is_loaded()
    }

    // ===== Filters =====

    /// Set brightness (percentage, 100 = neutral).
    pub fn set_brightness(&mut self, value: f32) {
        self.inner.set_brightness(value);
    }

    /// Set contrast (percentage, 100 = neutral).
    pub fn set_contrast(&mut self, value: f32) {
        self.inner.set_contrast(value);
    }

    /// Set saturation (percentage, 100 = neutral).
    pub fn set_saturation(&mut self, value: f32) {
        self.inner.set_saturation(value);
    }

    /// Set blur radius in display pixels.
    pub fn set_blur(&mut self, radius: f32) {
        self.inner.set_blur(radius);
    }

    /// Set invert amount (percentage, 0 = off).
    pub fn set_invert(&mut self, value: f32) {
        self.inner.set_invert(value);
    }

    // ===== Geometry =====

    /// Set rotation in degrees (positive clockwise).
    pub fn set_rotation(&mut self, degrees: f64) {
        self.inner.set_rotation(degrees);
    }

    pub fn toggle_flip_horizontal(&mut self) {
        self.inner.toggle_flip_horizontal();
    }

    pub fn toggle_flip_vertical(&mut self) {
        self.inner.toggle_flip_vertical();
    }

    pub fn zoom_in(&mut self) {
        self.inner.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.inner.zoom_out();
    }

    /// The current zoom factor.
    #[wasm_bindgen(getter)]
    pub fn zoom(&self) -> f64 {
        self.inner.edit().zoom
    }

    // ===== Overlays =====

    /// Add a text overlay at the center. Blank text is ignored.
    pub fn add_text(&mut self, content: &str) {
        self.inner.add_text(content);
    }

    /// Add a sticker overlay at the center ("heart" or "star").
    pub fn add_sticker(&mut self, kind: &str) -> Result<(), JsValue> {
        let kind = sticker_from_str(kind)
            .ok_or_else(|| JsValue::from_str(&format!("unknown sticker: {}", kind)))?;
        self.inner.add_sticker(kind);
        Ok(())
    }

    // ===== Crop =====

    /// Arm crop mode; the marquee starts on the next pointer drag.
    pub fn begin_crop(&mut self) {
        self.inner.begin_crop();
    }

    /// Pointer press in display-surface coordinates.
    pub fn pointer_down(&mut self, x: f64, y: f64) {
        self.inner.pointer_down(x, y);
    }

    /// Pointer move in display-surface coordinates.
    pub fn pointer_move(&mut self, x: f64, y: f64) {
        self.inner.pointer_move(x, y);
    }

    /// Pointer release; commits or aborts the crop.
    pub fn pointer_up(&mut self) {
        self.inner.pointer_up();
    }

    // ===== Session =====

    /// Reset all edits to defaults, keeping the image.
    pub fn reset(&mut self) {
        self.inner.reset();
    }

    /// Notify the session that the display container was resized.
    pub fn resize_container(&mut self, width: u32, height: u32) {
        self.inner.resize_container(width, height);
    }

    // ===== Output =====

    /// Width of the composited surface (0 before an image loads).
    #[wasm_bindgen(getter)]
    pub fn surface_width(&self) -> u32 {
        self.inner.surface().map_or(0, |s| s.width)
    }

    /// Height of the composited surface (0 before an image loads).
    #[wasm_bindgen(getter)]
    pub fn surface_height(&self) -> u32 {
        self.inner.surface().map_or(0, |s| s.height)
    }

    /// The composited RGBA surface pixels, ready for `putImageData`.
    ///
    /// Note: this copies the buffer out of WASM memory on every call.
    pub fn surface_pixels(&self) -> Vec<u8> {
        self.inner
            .surface()
            .map_or_else(Vec::new, |s| s.pixels.clone())
    }

    /// Encode the current surface as a PNG file.
    pub fn export_png(&self) -> Result<Vec<u8>, JsValue> {
        self.inner
            .export_png()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// The current edit state as a plain JavaScript object.
    pub fn edit_state(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.inner.edit())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

/// Tests for session bindings.
///
/// JsValue cannot be constructed on native targets, so these tests only
/// exercise paths that stay on the Ok side of the bindings. The error paths
/// are covered by `wasm_tests` below.
#[cfg(test)]
mod tests {
    use super::*;

    fn solid_bitmap(width: u32, height: u32) -> JsBitmap {
        JsBitmap::new(width, height, [90, 120, 200, 255].repeat((width * height) as usize))
    }

    #[test]
    fn test_session_load_and_surface() {
        let mut session = EditorSession::new(120, 120);
        assert!(!session.is_loaded());
        assert_eq!(session.surface_width(), 0);
        assert!(session.surface_pixels().is_empty());

        session.load_image(&solid_bitmap(100, 100));
        assert!(session.is_loaded());
        assert_eq!(session.surface_width(), 100);
        assert_eq!(session.surface_height(), 100);
        assert_eq!(session.surface_pixels().len(), 100 * 100 * 4);
    }

    #[test]
    fn test_zoom_getter_tracks_steps() {
        let mut session = EditorSession::new(120, 120);
        session.load_image(&solid_bitmap(50, 50));
        assert_eq!(session.zoom(), 1.0);
        session.zoom_in();
        assert!((session.zoom() - 1.15).abs() < 1e-9);
        session.zoom_out();
        assert!((session.zoom() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_known_stickers_accepted() {
        let mut session = EditorSession::new(120, 120);
        session.load_image(&solid_bitmap(50, 50));
        assert!(session.add_sticker("heart").is_ok());
        assert!(session.add_sticker("star").is_ok());
    }

    #[test]
    fn test_export_png_magic() {
        let mut session = EditorSession::new(120, 120);
        session.load_image(&solid_bitmap(40, 40));
        let png = session.export_png().unwrap();
        assert_eq!(&png[..4], &[0x89, 0x50, 0x4E, 0x47]);
    }

    #[test]
    fn test_crop_drag_shrinks_surface() {
        let mut session = EditorSession::new(120, 120);
        session.load_image(&solid_bitmap(100, 100));

        session.begin_crop();
        session.pointer_down(10.0, 10.0);
        session.pointer_move(70.0, 50.0);
        session.pointer_up();

        // The 60x40 crop refits into the 100x100 available area.
        assert_eq!(session.surface_width(), 100);
        assert_eq!(session.surface_height(), 67);
    }
}
