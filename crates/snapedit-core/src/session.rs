//! The editing session: state, mutations and the render funnel.
//!
//! [`EditorSession`] owns the master image, the current [`EditState`], the
//! crop state machine and the composited display surface. Every mutation
//! funnels through a single recompose step so the surface can never drift
//! out of sync with the state that produced it. Before an image is loaded,
//! all mutators are silent no-ops.

use ab_glyph::FontVec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bitmap::Bitmap;
use crate::compositor;
use crate::crop::{self, CropState, Release};
use crate::decode::{decode_image, DecodeError};
use crate::encode::{encode_png, EncodeError};
use crate::geometry::DisplayPoint;
use crate::overlay::{load_font, FontError, Overlay, StickerKind};
use crate::viewport::{fit_viewport, Viewport};
use crate::FilterSettings;

/// Zoom bounds and step, in scale factor units.
pub const ZOOM_MIN: f64 = 0.3;
pub const ZOOM_MAX: f64 = 4.0;
pub const ZOOM_STEP: f64 = 0.15;

/// Everything the compositor needs besides the master image itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditState {
    pub filters: FilterSettings,
    /// Rotation in degrees, positive clockwise.
    pub rotation: f64,
    pub flip_h: bool,
    pub flip_v: bool,
    pub zoom: f64,
    pub overlays: Vec<Overlay>,
}

impl Default for EditState {
    fn default() -> Self {
        Self {
            filters: FilterSettings::default(),
            rotation: 0.0,
            flip_h: false,
            flip_v: false,
            zoom: 1.0,
            overlays: Vec::new(),
        }
    }
}

impl EditState {
    /// Reset geometry and overlays but keep the filter levels.
    ///
    /// Used after a crop commit: the committed surface already has the
    /// transform and overlays baked in, but filters keep applying to the
    /// new master so the sliders stay live.
    fn reset_keeping_filters(&mut self) {
        *self = EditState {
            filters: self.filters.clone(),
            ..EditState::default()
        };
    }
}

/// Errors surfaced by [`EditorSession::export_png`].
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("no image loaded")]
    NoImage,

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// A complete editing session over one master image.
pub struct EditorSession {
    master: Option<Bitmap>,
    edit: EditState,
    container: (u32, u32),
    viewport: Option<Viewport>,
    crop: CropState,
    font: Option<FontVec>,
    surface: Option<Bitmap>,
}

impl EditorSession {
    /// Create an empty session for a container of the given size.
    pub fn new(container_width: u32, container_height: u32) -> Self {
        Self {
            master: None,
            edit: EditState::default(),
            container: (container_width, container_height),
            viewport: None,
            crop: CropState::default(),
            font: None,
            surface: None,
        }
    }

    // ===== Loading =====

    /// Replace the master image, resetting all edits.
    ///
    /// An empty bitmap is ignored and the previous session state is kept.
    pub fn load_image(&mut self, image: Bitmap) {
        if image.is_empty() {
            return;
        }
        self.edit = EditState::default();
        self.crop = CropState::default();
        self.viewport = Some(fit_viewport(
            self.container.0,
            self.container.1,
            image.width,
            image.height,
        ));
        self.master = Some(image);
        self.recompose();
    }

    /// Decode a compressed image buffer and load it.
    pub fn load_image_bytes(&mut self, bytes: &[u8]) -> Result<(), DecodeError> {
        let image = decode_image(bytes)?;
        self.load_image(image);
        Ok(())
    }

    /// Provide a font for text overlays. May be called at any time.
    pub fn set_font(&mut self, bytes: Vec<u8>) -> Result<(), FontError> {
        self.font = Some(load_font(bytes)?);
        if self.master.is_some() {
            self.recompose();
        }
        Ok(())
    }

    // ===== Filters =====

    /// Set the brightness level (percentage, 100 = neutral).
    pub fn set_brightness(&mut self, value: f32) {
        self.mutate(|edit| edit.filters.brightness = value.max(0.0));
    }

    /// Set the contrast level (percentage, 100 = neutral).
    pub fn set_contrast(&mut self, value: f32) {
        self.mutate(|edit| edit.filters.contrast = value.max(0.0));
    }

    /// Set the saturation level (percentage, 100 = neutral).
    pub fn set_saturation(&mut self, value: f32) {
        self.mutate(|edit| edit.filters.saturation = value.max(0.0));
    }

    /// Set the blur radius in display pixels.
    pub fn set_blur(&mut self, radius: f32) {
        self.mutate(|edit| edit.filters.blur = radius.max(0.0));
    }

    /// Set the invert amount (percentage, 0 = off, 100 = full negative).
    pub fn set_invert(&mut self, value: f32) {
        self.mutate(|edit| edit.filters.invert = value.clamp(0.0, 100.0));
    }

    // ===== Geometry =====

    /// Set the rotation in degrees (positive clockwise).
    pub fn set_rotation(&mut self, degrees: f64) {
        self.mutate(|edit| edit.rotation = degrees);
    }

    pub fn toggle_flip_horizontal(&mut self) {
        self.mutate(|edit| edit.flip_h = !edit.flip_h);
    }

    pub fn toggle_flip_vertical(&mut self) {
        self.mutate(|edit| edit.flip_v = !edit.flip_v);
    }

    /// Step the zoom in, saturating at [`ZOOM_MAX`].
    pub fn zoom_in(&mut self) {
        self.mutate(|edit| edit.zoom = (edit.zoom + ZOOM_STEP).min(ZOOM_MAX));
    }

    /// Step the zoom out, saturating at [`ZOOM_MIN`].
    pub fn zoom_out(&mut self) {
        self.mutate(|edit| edit.zoom = (edit.zoom - ZOOM_STEP).max(ZOOM_MIN));
    }

    // ===== Overlays =====

    /// Add a text overlay at the surface center. Blank text is ignored.
    pub fn add_text(&mut self, content: &str) {
        let Some(overlay) = Overlay::text(content) else {
            return;
        };
        self.mutate(|edit| edit.overlays.push(overlay));
    }

    /// Add a sticker overlay at the surface center.
    pub fn add_sticker(&mut self, kind: StickerKind) {
        self.mutate(|edit| edit.overlays.push(Overlay::sticker(kind)));
    }

    // ===== Crop =====

    /// Arm crop mode. The marquee appears on the next pointer drag.
    pub fn begin_crop(&mut self) {
        if self.master.is_none() {
            return;
        }
        self.crop.begin();
    }

    /// Pointer press in display-surface coordinates.
    pub fn pointer_down(&mut self, x: f64, y: f64) {
        if self.master.is_none() {
            return;
        }
        self.crop.pointer_down(DisplayPoint::new(x, y));
    }

    /// Pointer move in display-surface coordinates.
    pub fn pointer_move(&mut self, x: f64, y: f64) {
        if self.master.is_none() {
            return;
        }
        if self.crop.pointer_move(DisplayPoint::new(x, y)) {
            self.recompose();
        }
    }

    /// Pointer release: commits or aborts an in-progress crop.
    pub fn pointer_up(&mut self) {
        if self.master.is_none() {
            return;
        }
        match self.crop.release() {
            Release::Idle => {}
            Release::Aborted => self.recompose(),
            Release::Committed(rect) => self.commit_crop(rect),
        }
    }

    fn commit_crop(&mut self, rect: crate::geometry::DisplayRect) {
        let Some(master) = &self.master else {
            return;
        };
        let Some(viewport) = self.viewport else {
            return;
        };

        // Re-render without the marquee so dash pixels cannot leak into
        // the new master.
        let clean = compositor::render(master, &self.edit, viewport, None, self.font.as_ref());
        let Some(cropped) = crop::crop_surface(&clean, &rect) else {
            self.recompose();
            return;
        };

        self.edit.reset_keeping_filters();
        self.viewport = Some(fit_viewport(
            self.container.0,
            self.container.1,
            cropped.width,
            cropped.height,
        ));
        self.master = Some(cropped);
        self.recompose();
    }

    // ===== Session =====

    /// Reset every edit back to defaults, keeping the master image.
    pub fn reset(&mut self) {
        self.mutate(|edit| *edit = EditState::default());
    }

    /// Notify the session that the container was resized.
    pub fn resize_container(&mut self, width: u32, height: u32) {
        self.container = (width, height);
        let Some(master) = &self.master else {
            return;
        };
        self.viewport = Some(fit_viewport(width, height, master.width, master.height));
        self.recompose();
    }

    /// Encode the current display surface as PNG.
    pub fn export_png(&self) -> Result<Vec<u8>, ExportError> {
        let surface = self.surface.as_ref().ok_or(ExportError::NoImage)?;
        Ok(encode_png(&surface.pixels, surface.width, surface.height)?)
    }

    // ===== Accessors =====

    pub fn is_loaded(&self) -> bool {
        self.master.is_some()
    }

    /// The current composited display surface.
    pub fn surface(&self) -> Option<&Bitmap> {
        self.surface.as_ref()
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    pub fn edit(&self) -> &EditState {
        &self.edit
    }

    pub fn master(&self) -> Option<&Bitmap> {
        self.master.as_ref()
    }

    pub fn crop_state(&self) -> &CropState {
        &self.crop
    }

    // ===== Internals =====

    /// Apply a mutation and recompose. No-op before an image is loaded.
    fn mutate(&mut self, f: impl FnOnce(&mut EditState)) {
        if self.master.is_none() {
            return;
        }
        f(&mut self.edit);
        self.recompose();
    }

    fn recompose(&mut self) {
        let (Some(master), Some(viewport)) = (&self.master, self.viewport) else {
            self.surface = None;
            return;
        };
        self.surface = Some(compositor::render(
            master,
            &self.edit,
            viewport,
            self.crop.marquee(),
            self.font.as_ref(),
        ));
    }
}
