//! Coordinate spaces used by the compositor and the crop controller.
//!
//! Two spaces exist and must never be mixed:
//!
//! - **Display space**: display-surface pixels, origin at the top-left of the
//!   rendered canvas. Pointer events and the crop marquee live here.
//! - **Center space**: offsets from the geometric center of the display
//!   surface, measured before the zoom/flip/rotation transform is applied.
//!   Overlay positions live here, so `(0, 0)` always means "screen center"
//!   regardless of the current transform.
//!
//! The types below are deliberately distinct so a crop rectangle can never be
//! handed to overlay placement (or vice versa) without an explicit conversion.

use serde::{Deserialize, Serialize};

/// A point in display-surface coordinates (origin top-left, y down).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DisplayPoint {
    pub x: f64,
    pub y: f64,
}

impl DisplayPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An offset from the center of the display surface, in pre-transform pixels.
///
/// Overlays store their position in this space and therefore inherit the
/// image transform visually.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CenterOffset {
    pub x: f64,
    pub y: f64,
}

impl CenterOffset {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in display-surface coordinates.
///
/// Always normalized: `width` and `height` are non-negative and `(x, y)` is
/// the top-left corner regardless of the drag direction that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DisplayRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl DisplayRect {
    /// Build the normalized bounding box of two corner points.
    pub fn from_corners(a: DisplayPoint, b: DisplayPoint) -> Self {
        Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: (a.x - b.x).abs(),
            height: (a.y - b.y).abs(),
        }
    }

    /// A zero-size rectangle anchored at `p`.
    pub fn zero_at(p: DisplayPoint) -> Self {
        Self {
            x: p.x,
            y: p.y,
            width: 0.0,
            height: 0.0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_normalized_from_any_drag_direction() {
        let a = DisplayPoint::new(10.0, 20.0);
        let b = DisplayPoint::new(40.0, 5.0);

        // All four anchor/cursor combinations produce the same box
        let expected = DisplayRect {
            x: 10.0,
            y: 5.0,
            width: 30.0,
            height: 15.0,
        };
        assert_eq!(DisplayRect::from_corners(a, b), expected);
        assert_eq!(DisplayRect::from_corners(b, a), expected);

        let c = DisplayPoint::new(10.0, 5.0);
        let d = DisplayPoint::new(40.0, 20.0);
        assert_eq!(DisplayRect::from_corners(c, d), expected);
        assert_eq!(DisplayRect::from_corners(d, c), expected);
    }

    #[test]
    fn test_zero_rect_is_empty() {
        let r = DisplayRect::zero_at(DisplayPoint::new(3.0, 4.0));
        assert!(r.is_empty());
        assert_eq!(r.x, 3.0);
        assert_eq!(r.y, 4.0);
    }

    #[test]
    fn test_degenerate_line_is_empty() {
        let a = DisplayPoint::new(10.0, 20.0);
        let b = DisplayPoint::new(10.0, 50.0);
        assert!(DisplayRect::from_corners(a, b).is_empty());
    }
}
