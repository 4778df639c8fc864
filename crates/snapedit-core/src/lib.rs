//! Core image editing logic for SnapEdit.
//!
//! This crate is platform-independent: it owns the master image, edit state
//! and compositing pipeline, and exposes them through [`EditorSession`]. The
//! WASM bindings crate wraps this for browser hosts, but everything here
//! runs (and is tested) natively.
//!
//! The pipeline is destructive-free until a crop commits: filters, the
//! zoom/flip/rotate transform and overlays are all re-applied from the
//! untouched master on every recompose. A crop bakes the current view into
//! a new master.

pub mod bitmap;
pub mod compositor;
pub mod crop;
pub mod decode;
pub mod encode;
pub mod filters;
pub mod geometry;
pub mod overlay;
pub mod session;
pub mod viewport;

pub use bitmap::Bitmap;
pub use crop::{CropState, Release, MIN_CROP_SIZE};
pub use decode::{decode_image, DecodeError};
pub use encode::{encode_jpeg, encode_png, EncodeError};
pub use geometry::{CenterOffset, DisplayPoint, DisplayRect};
pub use overlay::{Color, FontError, Overlay, OverlayKind, StickerKind};
pub use session::{
    EditState, EditorSession, ExportError, ZOOM_MAX, ZOOM_MIN, ZOOM_STEP,
};
pub use viewport::{fit_viewport, Viewport};

use serde::{Deserialize, Serialize};

/// The five filter levels, as set by the UI sliders.
///
/// Brightness, contrast and saturation are percentages where 100 is
/// neutral. Blur is a radius in display pixels. Invert is a percentage
/// where 0 is off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSettings {
    pub brightness: f32,
    pub contrast: f32,
    pub saturation: f32,
    pub blur: f32,
    pub invert: f32,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            brightness: 100.0,
            contrast: 100.0,
            saturation: 100.0,
            blur: 0.0,
            invert: 0.0,
        }
    }
}

impl FilterSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when every level sits at its neutral value.
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}
