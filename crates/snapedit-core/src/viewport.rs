//! Display viewport fitting.
//!
//! The viewport is derived state: the on-screen size of the display surface,
//! computed from the master image's aspect ratio and the container bounds. It
//! is recomputed on image load, on crop commit and on every container resize
//! notification — never cached across master-image replacements.

use serde::{Deserialize, Serialize};

/// Fixed inset subtracted from each container axis before fitting, in pixels.
pub const FIT_MARGIN: u32 = 20;

/// The computed display-surface dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// Fit an image's aspect ratio inside a container.
///
/// Maximizes area while preserving the aspect ratio: fit to the available
/// width first and fall back to the available height when that overflows.
/// The available space is the container minus [`FIT_MARGIN`] per axis. The
/// result never exceeds the container and never collapses below 1x1 for a
/// non-empty image.
///
/// # Example
///
/// ```ignore
/// // A 4:3 image in an 800x600 container fits to 773x580:
/// // width-first gives 780x585, which overflows the 580px budget.
/// let vp = fit_viewport(800, 600, 400, 300);
/// assert_eq!((vp.width, vp.height), (773, 580));
/// ```
pub fn fit_viewport(
    container_width: u32,
    container_height: u32,
    image_width: u32,
    image_height: u32,
) -> Viewport {
    if image_width == 0 || image_height == 0 {
        return Viewport {
            width: 0,
            height: 0,
        };
    }

    let max_w = container_width.saturating_sub(FIT_MARGIN) as f64;
    let max_h = container_height.saturating_sub(FIT_MARGIN) as f64;
    let ratio = image_width as f64 / image_height as f64;

    let mut w = max_w;
    let mut h = w / ratio;
    if h > max_h {
        h = max_h;
        w = h * ratio;
    }

    Viewport {
        width: (w.round() as u32).max(1),
        height: (h.round() as u32).max(1),
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
