//! Display-surface compositor.
//!
//! [`render`] is a pure function from the master image plus edit state to a
//! finished display surface. Each call rebuilds the surface from scratch:
//!
//! 1. Start from a fully transparent surface at the viewport size.
//! 2. Draw the master image letterboxed to fit, through the zoom/flip/rotate
//!    transform anchored at the surface center.
//! 3. Stamp each overlay, in insertion order, through the same transform.
//! 4. Run the filter pipeline over the covered pixels.
//! 5. Stroke the crop marquee, if one is active, in untransformed display
//!    space so the crop rectangle reads as screen-aligned.
//!
//! Drawing works by inverse mapping: for each destination pixel, apply the
//! inverse transform to find the source position and sample bilinearly.

use ab_glyph::FontVec;

use crate::bitmap::Bitmap;
use crate::filters;
use crate::geometry::DisplayRect;
use crate::overlay::Overlay;
use crate::session::EditState;
use crate::viewport::Viewport;

/// Dash pattern length for the crop marquee, in pixels.
const MARQUEE_DASH: f64 = 6.0;
/// Marquee stroke width, in pixels.
const MARQUEE_WIDTH: u32 = 2;

/// The center-anchored zoom/flip/rotate transform and its inverse.
///
/// Forward: `d = center + S * R * u`, where `u` is a pre-transform offset
/// from the center, `S` scales by the zoom (negated per axis for flips) and
/// `R` rotates by the edit rotation.
struct Affine {
    cx: f64,
    cy: f64,
    sx: f64,
    sy: f64,
    cos: f64,
    sin: f64,
}

impl Affine {
    fn new(viewport: Viewport, edit: &EditState) -> Self {
        let theta = edit.rotation.to_radians();
        // Guard against a degenerate (non-invertible) scale
        let zoom = if edit.zoom.abs() < 1e-9 { 1e-9 } else { edit.zoom };
        Self {
            cx: viewport.width as f64 / 2.0,
            cy: viewport.height as f64 / 2.0,
            sx: zoom * if edit.flip_h { -1.0 } else { 1.0 },
            sy: zoom * if edit.flip_v { -1.0 } else { 1.0 },
            cos: theta.cos(),
            sin: theta.sin(),
        }
    }

    /// Map a pre-transform center offset to display coordinates.
    fn forward(&self, ux: f64, uy: f64) -> (f64, f64) {
        let rx = ux * self.cos - uy * self.sin;
        let ry = ux * self.sin + uy * self.cos;
        (self.cx + rx * self.sx, self.cy + ry * self.sy)
    }

    /// Map a display coordinate back to its pre-transform center offset.
    fn inverse(&self, dx: f64, dy: f64) -> (f64, f64) {
        let qx = (dx - self.cx) / self.sx;
        let qy = (dy - self.cy) / self.sy;
        (qx * self.cos + qy * self.sin, -qx * self.sin + qy * self.cos)
    }
}

/// Composite the display surface for the given edit state.
///
/// Returns a transparent surface when the master image is empty. `marquee`
/// is the in-progress crop rectangle, if any; `font` is needed only when
/// text overlays are present.
pub fn render(
    master: &Bitmap,
    edit: &EditState,
    viewport: Viewport,
    marquee: Option<&DisplayRect>,
    font: Option<&FontVec>,
) -> Bitmap {
    let mut surface = Bitmap::transparent(viewport.width, viewport.height);
    if master.is_empty() || surface.is_empty() {
        return surface;
    }

    let affine = Affine::new(viewport, edit);

    draw_master(&mut surface, master, edit, &affine);

    for overlay in &edit.overlays {
        stamp_overlay(&mut surface, overlay, &affine, font);
    }

    filters::apply_filters(&mut surface, &edit.filters);

    if let Some(rect) = marquee {
        stroke_marquee(&mut surface, rect);
    }

    surface
}

/// Draw the master image through the transform, letterboxed to the viewport.
///
/// The image is first fit inside the viewport by its aspect ratio, then that
/// fitted size is multiplied by the zoom. Combined with the zoom already in
/// the transform scale, zooming therefore acts twice on the image (but only
/// once on overlays), which matches how the display canvas behaves.
fn draw_master(surface: &mut Bitmap, master: &Bitmap, edit: &EditState, affine: &Affine) {
    let vw = surface.width as f64;
    let vh = surface.height as f64;
    let ratio = (vw / master.width as f64).min(vh / master.height as f64);

    let draw_w = master.width as f64 * ratio * edit.zoom;
    let draw_h = master.height as f64 * ratio * edit.zoom;
    if draw_w <= 0.0 || draw_h <= 0.0 {
        return;
    }
    let half_w = draw_w / 2.0;
    let half_h = draw_h / 2.0;

    for y in 0..surface.height {
        for x in 0..surface.width {
            // Map the destination pixel center back to a source position
            let (ux, uy) = affine.inverse(x as f64 + 0.5, y as f64 + 0.5);
            if ux < -half_w || ux >= half_w || uy < -half_h || uy >= half_h {
                continue;
            }
            let src_x = (ux + half_w) / draw_w * master.width as f64;
            let src_y = (uy + half_h) / draw_h * master.height as f64;
            let px = master.sample_bilinear(src_x - 0.5, src_y - 0.5);
            surface.blend_pixel(x, y, px);
        }
    }
}

/// Stamp one overlay patch, centered at its position, through the transform.
fn stamp_overlay(
    surface: &mut Bitmap,
    overlay: &Overlay,
    affine: &Affine,
    font: Option<&FontVec>,
) {
    let Some(patch) = overlay.rasterize(font) else {
        return;
    };

    let half_w = patch.width as f64 / 2.0;
    let half_h = patch.height as f64 / 2.0;
    let (px, py) = (overlay.position.x, overlay.position.y);

    // Forward-map the patch corners to bound the affected display region
    let corners = [
        affine.forward(px - half_w, py - half_h),
        affine.forward(px + half_w, py - half_h),
        affine.forward(px - half_w, py + half_h),
        affine.forward(px + half_w, py + half_h),
    ];
    let min_x = corners.iter().map(|c| c.0).fold(f64::INFINITY, f64::min);
    let max_x = corners.iter().map(|c| c.0).fold(f64::NEG_INFINITY, f64::max);
    let min_y = corners.iter().map(|c| c.1).fold(f64::INFINITY, f64::min);
    let max_y = corners.iter().map(|c| c.1).fold(f64::NEG_INFINITY, f64::max);

    let x0 = min_x.floor().max(0.0) as u32;
    let y0 = min_y.floor().max(0.0) as u32;
    let x1 = (max_x.ceil().max(0.0) as u32).min(surface.width);
    let y1 = (max_y.ceil().max(0.0) as u32).min(surface.height);

    for y in y0..y1 {
        for x in x0..x1 {
            let (ux, uy) = affine.inverse(x as f64 + 0.5, y as f64 + 0.5);
            let local_x = ux - px + half_w;
            let local_y = uy - py + half_h;
            if local_x < 0.0
                || local_y < 0.0
                || local_x >= patch.width as f64
                || local_y >= patch.height as f64
            {
                continue;
            }
            let sample = patch.sample_bilinear(local_x - 0.5, local_y - 0.5);
            surface.blend_pixel(x, y, sample);
        }
    }
}

/// Stroke the dashed crop marquee in untransformed display space.
///
/// The dash phase runs continuously around the perimeter: along the top edge
/// left to right, the right edge top to bottom, the bottom edge right to
/// left, and the left edge bottom to top.
fn stroke_marquee(surface: &mut Bitmap, rect: &DisplayRect) {
    if rect.is_empty() {
        return;
    }

    let left = rect.x.round();
    let top = rect.y.round();
    let right = (rect.x + rect.width).round();
    let bottom = (rect.y + rect.height).round();
    let w = right - left;
    let h = bottom - top;

    let dash_on = |phase: f64| -> bool { (phase / MARQUEE_DASH).floor() as i64 % 2 == 0 };
    let mut pen = |x: f64, y: f64, phase: f64, horizontal: bool| {
        if !dash_on(phase) {
            return;
        }
        // A 2px stroke straddles the rectangle edge
        for t in 0..MARQUEE_WIDTH {
            let offset = t as f64 - (MARQUEE_WIDTH as f64 / 2.0 - 0.5);
            let (px, py) = if horizontal { (x, y + offset) } else { (x + offset, y) };
            if px < 0.0 || py < 0.0 || px >= surface.width as f64 || py >= surface.height as f64 {
                continue;
            }
            surface.put_pixel(px as u32, py as u32, [255, 255, 255, 255]);
        }
    };

    let steps_w = w.max(1.0) as i64;
    let steps_h = h.max(1.0) as i64;

    for i in 0..=steps_w {
        let t = i as f64;
        pen(left + t, top, t, true);
    }
    for i in 0..=steps_h {
        let t = i as f64;
        pen(right, top + t, w + t, false);
    }
    for i in 0..=steps_w {
        let t = i as f64;
        pen(right - t, bottom, w + h + t, true);
    }
    for i in 0..=steps_h {
        let t = i as f64;
        pen(left, bottom - t, w + h + w + t, false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::CenterOffset;
    use crate::overlay::StickerKind;
    use crate::session::EditState;

    fn gradient_master(width: u32, height: u32) -> Bitmap {
        let mut bmp = Bitmap::transparent(width, height);
        for y in 0..height {
            for x in 0..width {
                bmp.put_pixel(
                    x,
                    y,
                    [
                        (x * 255 / width.max(1)) as u8,
                        (y * 255 / height.max(1)) as u8,
                        90,
                        255,
                    ],
                );
            }
        }
        bmp
    }

    pub(super) fn vp(width: u32, height: u32) -> Viewport {
        Viewport { width, height }
    }

    /// Centroid of red-channel mass, for locating a stamped sticker.
    fn red_centroid(surface: &Bitmap) -> (f64, f64) {
        let mut sum_x = 0.0;
        let mut sum_y = 0.0;
        let mut total = 0.0;
        for y in 0..surface.height {
            for x in 0..surface.width {
                let px = surface.get_pixel(x, y);
                let weight = px[0] as f64 * px[3] as f64;
                sum_x += x as f64 * weight;
                sum_y += y as f64 * weight;
                total += weight;
            }
        }
        (sum_x / total, sum_y / total)
    }

    #[test]
    fn test_identity_render_reproduces_master() {
        // Viewport matching the master exactly: the letterbox ratio is 1 and
        // sampling lands on pixel centers, so the render is lossless.
        let master = gradient_master(16, 12);
        let surface = render(&master, &EditState::default(), vp(16, 12), None, None);
        assert_eq!(surface, master);
    }

    #[test]
    fn test_empty_master_renders_transparent() {
        let master = Bitmap::new(0, 0, vec![]);
        let surface = render(&master, &EditState::default(), vp(10, 10), None, None);
        assert_eq!(surface.width, 10);
        assert!(surface.pixels.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_letterbox_gaps_transparent() {
        // Wide image in a square viewport leaves transparent bands above
        // and below.
        let master = gradient_master(20, 10);
        let surface = render(&master, &EditState::default(), vp(20, 20), None, None);
        assert_eq!(surface.get_pixel(10, 0)[3], 0, "top band");
        assert_eq!(surface.get_pixel(10, 19)[3], 0, "bottom band");
        assert!(surface.get_pixel(10, 10)[3] > 0, "image center covered");
    }

    #[test]
    fn test_flip_horizontal_mirrors() {
        let master = gradient_master(16, 16);
        let plain = render(&master, &EditState::default(), vp(16, 16), None, None);

        let mut edit = EditState::default();
        edit.flip_h = true;
        let flipped = render(&master, &edit, vp(16, 16), None, None);

        // Red ramps left-to-right in the master, so the flip swaps edges.
        assert!(plain.get_pixel(1, 8)[0] < plain.get_pixel(14, 8)[0]);
        assert!(flipped.get_pixel(1, 8)[0] > flipped.get_pixel(14, 8)[0]);
    }

    #[test]
    fn test_flip_and_rotation_do_not_commute() {
        // A horizontal flip followed by rotation theta equals rotating by
        // -theta first and then flipping. Comparing +90 and -90 under the
        // same flip therefore distinguishes the application order.
        let master = gradient_master(16, 16);
        let mut pos = EditState::default();
        pos.flip_h = true;
        pos.rotation = 90.0;
        let mut neg = EditState::default();
        neg.flip_h = true;
        neg.rotation = -90.0;

        let a = render(&master, &pos, vp(16, 16), None, None);
        let b = render(&master, &neg, vp(16, 16), None, None);
        assert_ne!(a, b);
    }

    #[test]
    fn test_rotation_90_transposes_gradient() {
        let master = gradient_master(16, 16);
        let mut edit = EditState::default();
        edit.rotation = 90.0;
        let surface = render(&master, &edit, vp(16, 16), None, None);

        // After +90 degrees the red (originally horizontal) ramp runs
        // vertically.
        let top = surface.get_pixel(8, 2)[0] as i32;
        let bottom = surface.get_pixel(8, 13)[0] as i32;
        assert!(
            (top - bottom).abs() > 60,
            "red should ramp vertically, top {} bottom {}",
            top,
            bottom
        );
    }

    #[test]
    fn test_zoom_magnifies() {
        let master = gradient_master(16, 16);
        let plain = render(&master, &EditState::default(), vp(16, 16), None, None);
        let mut edit = EditState::default();
        edit.zoom = 2.0;
        let zoomed = render(&master, &edit, vp(16, 16), None, None);

        // Zoomed in, the corner pixel shows a color from nearer the image
        // center than it did at zoom 1.
        let corner_plain = plain.get_pixel(0, 0)[0] as i32;
        let corner_zoomed = zoomed.get_pixel(0, 0)[0] as i32;
        let center = plain.get_pixel(8, 8)[0] as i32;
        assert!(
            (corner_zoomed - center).abs() < (corner_plain - center).abs(),
            "zoomed corner {} should be nearer center {} than plain corner {}",
            corner_zoomed,
            center,
            corner_plain
        );
    }

    #[test]
    fn test_overlay_centered_at_surface_center() {
        // Transparent master so the red sticker dominates the centroid
        let dark = Bitmap::transparent(80, 80);
        let mut edit = EditState::default();
        edit.overlays.push(Overlay::sticker(StickerKind::Heart));

        let surface = render(&dark, &edit, vp(80, 80), None, None);
        let (cx, cy) = red_centroid(&surface);
        // The heart is mirror-symmetric in x; in y its mass sits near the
        // patch center but not exactly on it.
        assert!((cx - 40.0).abs() < 1.0, "centroid x {}", cx);
        assert!((cy - 40.0).abs() < 6.0, "centroid y {}", cy);
    }

    #[test]
    fn test_overlay_inherits_zoom() {
        // An overlay offset from center moves outward under zoom.
        let dark = Bitmap::transparent(120, 120);
        let mut overlay = Overlay::sticker(StickerKind::Heart);
        overlay.position = CenterOffset::new(10.0, 0.0);
        overlay.style.size_px = 12.0;

        let mut plain = EditState::default();
        plain.overlays.push(overlay.clone());
        let mut zoomed = EditState::default();
        zoomed.zoom = 2.0;
        zoomed.overlays.push(overlay);

        let (x1, _) = red_centroid(&render(&dark, &plain, vp(120, 120), None, None));
        let (x2, _) = red_centroid(&render(&dark, &zoomed, vp(120, 120), None, None));
        assert!((x1 - 70.0).abs() < 1.5, "zoom 1 centroid {}", x1);
        assert!((x2 - 80.0).abs() < 1.5, "zoom 2 centroid {}", x2);
    }

    #[test]
    fn test_overlays_stack_in_insertion_order() {
        let dark = Bitmap::transparent(60, 60);
        let mut edit = EditState::default();
        edit.overlays.push(Overlay::sticker(StickerKind::Heart));
        edit.overlays.push(Overlay::sticker(StickerKind::Star));

        let surface = render(&dark, &edit, vp(60, 60), None, None);
        // The star (drawn last) wins at the shared center.
        let px = surface.get_pixel(30, 30);
        assert!(px[1] > 150, "star yellow should be on top, got {:?}", px);
    }

    #[test]
    fn test_marquee_stroked_when_present() {
        let master = gradient_master(40, 40);
        let rect = DisplayRect {
            x: 5.0,
            y: 5.0,
            width: 20.0,
            height: 20.0,
        };
        let with = render(&master, &EditState::default(), vp(40, 40), Some(&rect), None);
        let without = render(&master, &EditState::default(), vp(40, 40), None, None);

        assert_ne!(with, without);
        // Dash phase 0 is on, so the top-left corner pixel is white.
        assert_eq!(with.get_pixel(5, 5), [255, 255, 255, 255]);
    }

    #[test]
    fn test_marquee_is_dashed() {
        let master = gradient_master(60, 60);
        let rect = DisplayRect {
            x: 2.0,
            y: 2.0,
            width: 50.0,
            height: 50.0,
        };
        let surface = render(&master, &EditState::default(), vp(60, 60), Some(&rect), None);

        // Along the top edge some pixels are stroked white and some are
        // left showing the image (gaps).
        let mut on = 0;
        let mut off = 0;
        for x in 2..52u32 {
            if surface.get_pixel(x, 2) == [255, 255, 255, 255] {
                on += 1;
            } else {
                off += 1;
            }
        }
        assert!(on > 0 && off > 0, "on {} off {}", on, off);
    }

    #[test]
    fn test_render_is_deterministic() {
        let master = gradient_master(24, 18);
        let mut edit = EditState::default();
        edit.rotation = 33.0;
        edit.zoom = 1.45;
        edit.flip_v = true;
        edit.overlays.push(Overlay::sticker(StickerKind::Star));

        let a = render(&master, &edit, vp(30, 30), None, None);
        let b = render(&master, &edit, vp(30, 30), None, None);
        assert_eq!(a, b);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
