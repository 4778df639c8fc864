//! Crop mode state machine and surface extraction.
//!
//! Crop mode is driven by pointer events in display-surface coordinates.
//! Arming crop mode does nothing visible; the marquee appears once a drag
//! starts and tracks the pointer until release. A release below the minimum
//! size aborts rather than committing a sliver.
//!
//! The committed region is extracted from the rendered display surface, not
//! the master image, so the crop bakes in the current transform, overlays
//! and letterbox gaps exactly as shown on screen.

use crate::bitmap::Bitmap;
use crate::geometry::{DisplayPoint, DisplayRect};

/// Minimum marquee edge length (in display pixels) for a commit.
pub const MIN_CROP_SIZE: f64 = 10.0;

/// Where the crop interaction currently stands.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CropState {
    /// Crop mode is off; pointer events are ignored.
    #[default]
    Inactive,
    /// Crop mode is on, waiting for the first pointer press.
    Armed,
    /// A marquee drag is in progress.
    Dragging {
        anchor: DisplayPoint,
        rect: DisplayRect,
    },
}

/// Outcome of a pointer release.
#[derive(Debug, Clone, PartialEq)]
pub enum Release {
    /// No drag was in progress; nothing to do.
    Idle,
    /// The marquee was below the minimum size and was discarded.
    Aborted,
    /// The marquee is valid; extract this region.
    Committed(DisplayRect),
}

impl CropState {
    /// Arm crop mode. A drag already in progress is discarded.
    pub fn begin(&mut self) {
        *self = CropState::Armed;
    }

    /// Handle a pointer press. Starts a drag when crop mode is armed.
    pub fn pointer_down(&mut self, p: DisplayPoint) {
        match self {
            CropState::Inactive => {}
            CropState::Armed | CropState::Dragging { .. } => {
                *self = CropState::Dragging {
                    anchor: p,
                    rect: DisplayRect::zero_at(p),
                };
            }
        }
    }

    /// Handle pointer movement. Returns true when the marquee changed.
    pub fn pointer_move(&mut self, p: DisplayPoint) -> bool {
        let CropState::Dragging { anchor, rect } = self else {
            return false;
        };
        let updated = DisplayRect::from_corners(*anchor, p);
        if updated == *rect {
            return false;
        }
        *rect = updated;
        true
    }

    /// Handle pointer release.
    ///
    /// Ends an in-progress drag (commit or abort). A release with no drag
    /// leaves the state alone, so an armed crop mode survives stray
    /// pointer-ups until a real marquee drag happens.
    pub fn release(&mut self) -> Release {
        let CropState::Dragging { rect, .. } = self else {
            return Release::Idle;
        };
        let rect = *rect;
        *self = CropState::Inactive;
        if rect.width < MIN_CROP_SIZE || rect.height < MIN_CROP_SIZE {
            Release::Aborted
        } else {
            Release::Committed(rect)
        }
    }

    /// The marquee to draw, if a drag is in progress.
    pub fn marquee(&self) -> Option<&DisplayRect> {
        match self {
            CropState::Dragging { rect, .. } => Some(rect),
            _ => None,
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, CropState::Inactive)
    }
}

/// Extract a rectangular region of a rendered surface.
///
/// The rectangle is rounded to integer pixels and clamped to the surface
/// bounds. Returns `None` when nothing remains after clamping.
pub fn crop_surface(surface: &Bitmap, rect: &DisplayRect) -> Option<Bitmap> {
    if surface.is_empty() {
        return None;
    }

    let x0 = (rect.x.round().max(0.0) as u32).min(surface.width);
    let y0 = (rect.y.round().max(0.0) as u32).min(surface.height);
    let x1 = ((rect.x + rect.width).round().max(0.0) as u32).min(surface.width);
    let y1 = ((rect.y + rect.height).round().max(0.0) as u32).min(surface.height);

    if x1 <= x0 || y1 <= y0 {
        return None;
    }

    let new_width = x1 - x0;
    let new_height = y1 - y0;
    let mut pixels = Vec::with_capacity((new_width as usize) * (new_height as usize) * 4);

    for y in y0..y1 {
        let row_start = ((y as usize) * (surface.width as usize) + x0 as usize) * 4;
        let row_end = row_start + (new_width as usize) * 4;
        pixels.extend_from_slice(&surface.pixels[row_start..row_end]);
    }

    Some(Bitmap::new(new_width, new_height, pixels))
}


// ============================================================================
// Property-Based Tests
// ============================================================================
