//! Text and sticker overlays.
//!
//! Overlays are placed at a [`CenterOffset`] and rendered by the compositor
//! in transformed space, so they rotate, zoom and flip together with the
//! image. Each overlay rasterizes to a small straight-alpha [`Bitmap`] patch;
//! the compositor handles placement and blending.
//!
//! Text rasterization needs a font. Fonts are host-supplied byte buffers (a
//! TTF or OTF file) parsed with `ab_glyph`; when no font has been provided,
//! text overlays are skipped at render time rather than failing the render.
//! Sticker overlays are procedural shapes and never need a font.

use ab_glyph::{Font, FontVec, ScaleFont};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bitmap::Bitmap;
use crate::geometry::CenterOffset;

/// Error parsing host-supplied font bytes.
#[derive(Debug, Error)]
pub enum FontError {
    #[error("invalid font data")]
    InvalidData,
}

/// Parse a TTF/OTF byte buffer into a usable font.
pub fn load_font(bytes: Vec<u8>) -> Result<FontVec, FontError> {
    FontVec::try_from_vec(bytes).map_err(|_| FontError::InvalidData)
}

/// A straight-alpha RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color {
        r: 255,
        g: 255,
        b: 255,
        a: 255,
    };

    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

/// The built-in procedural sticker shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StickerKind {
    Heart,
    Star,
}

/// What an overlay draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverlayKind {
    Text,
    Sticker(StickerKind),
}

/// Visual styling shared by all overlay kinds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverlayStyle {
    /// Nominal size in pre-transform pixels (font size for text, bounding
    /// size for stickers).
    pub size_px: f32,
    pub color: Color,
}

/// A single placed overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overlay {
    pub kind: OverlayKind,
    /// Text content for text overlays; display glyph for stickers.
    pub content: String,
    /// Placement, as an offset from the display-surface center in
    /// pre-transform pixels.
    pub position: CenterOffset,
    pub style: OverlayStyle,
}

impl Overlay {
    /// Default font size for text overlays, in pixels.
    pub const TEXT_SIZE: f32 = 28.0;
    /// Default bounding size for sticker overlays, in pixels.
    pub const STICKER_SIZE: f32 = 52.0;

    /// Build a text overlay at the surface center.
    ///
    /// Leading and trailing whitespace is trimmed; returns `None` when
    /// nothing printable remains.
    pub fn text(content: &str) -> Option<Self> {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self {
            kind: OverlayKind::Text,
            content: trimmed.to_string(),
            position: CenterOffset::default(),
            style: OverlayStyle {
                size_px: Self::TEXT_SIZE,
                color: Color::WHITE,
            },
        })
    }

    /// Build a sticker overlay at the surface center.
    pub fn sticker(kind: StickerKind) -> Self {
        let (content, color) = match kind {
            StickerKind::Heart => ("\u{2764}", Color::new(225, 40, 60, 255)),
            StickerKind::Star => ("\u{2B50}", Color::new(255, 200, 40, 255)),
        };
        Self {
            kind: OverlayKind::Sticker(kind),
            content: content.to_string(),
            position: CenterOffset::default(),
            style: OverlayStyle {
                size_px: Self::STICKER_SIZE,
                color,
            },
        }
    }

    /// Rasterize this overlay to a straight-alpha patch.
    ///
    /// Returns `None` for text overlays when no font is available or when
    /// the content rasterizes to nothing.
    pub fn rasterize(&self, font: Option<&FontVec>) -> Option<Bitmap> {
        match self.kind {
            OverlayKind::Text => rasterize_text(self.content.as_str(), self.style, font?),
            OverlayKind::Sticker(kind) => Some(rasterize_sticker(kind, self.style)),
        }
    }
}

/// Render a single line of text into a tight patch.
fn rasterize_text(text: &str, style: OverlayStyle, font: &FontVec) -> Option<Bitmap> {
    let scaled = font.as_scaled(style.size_px);

    // Measure the line first
    let mut line_width = 0.0f32;
    for ch in text.chars() {
        let glyph_id = scaled.glyph_id(ch);
        line_width += scaled.h_advance(glyph_id);
    }
    let line_height = scaled.ascent() - scaled.descent();

    let width = line_width.ceil() as u32;
    let height = line_height.ceil() as u32;
    if width == 0 || height == 0 {
        return None;
    }

    let mut patch = Bitmap::transparent(width, height);
    let color = style.color;

    let mut caret_x = 0.0f32;
    let baseline = scaled.ascent();
    for ch in text.chars() {
        let glyph_id = scaled.glyph_id(ch);
        let advance = scaled.h_advance(glyph_id);
        let glyph = glyph_id.with_scale_and_position(
            style.size_px,
            ab_glyph::point(caret_x, baseline),
        );
        caret_x += advance;

        let Some(outlined) = font.outline_glyph(glyph) else {
            continue;
        };
        let bounds = outlined.px_bounds();
        outlined.draw(|gx, gy, coverage| {
            let px = bounds.min.x as i64 + gx as i64;
            let py = bounds.min.y as i64 + gy as i64;
            if px < 0 || py < 0 || px >= width as i64 || py >= height as i64 {
                return;
            }
            let alpha = (coverage * color.a as f32).round().clamp(0.0, 255.0) as u8;
            if alpha == 0 {
                return;
            }
            patch.blend_pixel(px as u32, py as u32, [color.r, color.g, color.b, alpha]);
        });
    }

    Some(patch)
}

/// Render a procedural sticker shape into a square patch.
///
/// Shapes are evaluated in a normalized [-1, 1] space (y up) with 2x2
/// supersampling for smooth edges.
fn rasterize_sticker(kind: StickerKind, style: OverlayStyle) -> Bitmap {
    let size = style.size_px.ceil().max(1.0) as u32;
    let mut patch = Bitmap::transparent(size, size);
    let color = style.color;
    let half = size as f64 / 2.0;

    const SUBSAMPLES: [(f64, f64); 4] = [(0.25, 0.25), (0.75, 0.25), (0.25, 0.75), (0.75, 0.75)];

    for y in 0..size {
        for x in 0..size {
            let mut hits = 0u32;
            for (ox, oy) in SUBSAMPLES {
                // Normalized coordinates, y pointing up
                let px = (x as f64 + ox - half) / half;
                let py = -((y as f64 + oy - half) / half);
                let inside = match kind {
                    StickerKind::Heart => heart_contains(px, py),
                    StickerKind::Star => star_contains(px, py),
                };
                if inside {
                    hits += 1;
                }
            }
            if hits == 0 {
                continue;
            }
            let alpha = (color.a as u32 * hits / 4) as u8;
            patch.put_pixel(x, y, [color.r, color.g, color.b, alpha]);
        }
    }

    patch
}

/// The classic implicit heart curve (x^2 + y^2 - 1)^3 - x^2 y^3 <= 0.
fn heart_contains(px: f64, py: f64) -> bool {
    let hx = px * 1.2;
    let hy = py * 1.2 + 0.2;
    let q = hx * hx + hy * hy - 1.0;
    q * q * q - hx * hx * hy * hy * hy <= 0.0
}

/// Five-pointed star via even-odd winding over its 10-vertex outline.
fn star_contains(px: f64, py: f64) -> bool {
    const POINTS: usize = 5;
    const OUTER: f64 = 1.0;
    const INNER: f64 = 0.42;

    let mut verts = [(0.0f64, 0.0f64); POINTS * 2];
    for (i, v) in verts.iter_mut().enumerate() {
        let r = if i % 2 == 0 { OUTER } else { INNER };
        let angle = -std::f64::consts::FRAC_PI_2 + i as f64 * std::f64::consts::PI / POINTS as f64;
        *v = (r * angle.cos(), -r * angle.sin());
    }

    let mut inside = false;
    let mut j = verts.len() - 1;
    for i in 0..verts.len() {
        let (xi, yi) = verts[i];
        let (xj, yj) = verts[j];
        if ((yi > py) != (yj > py)) && (px < (xj - xi) * (py - yi) / (yj - yi) + xi) {
            inside = !inside;
        }
        j = i;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_overlay_trims_content() {
        let overlay = Overlay::text("  hello  ").unwrap();
        assert_eq!(overlay.content, "hello");
        assert_eq!(overlay.kind, OverlayKind::Text);
        assert_eq!(overlay.style.size_px, Overlay::TEXT_SIZE);
        assert_eq!(overlay.style.color, Color::WHITE);
    }

    #[test]
    fn test_empty_text_rejected() {
        assert!(Overlay::text("").is_none());
        assert!(Overlay::text("   ").is_none());
        assert!(Overlay::text("\t\n").is_none());
    }

    #[test]
    fn test_text_without_font_skipped() {
        let overlay = Overlay::text("hi").unwrap();
        assert!(overlay.rasterize(None).is_none());
    }

    #[test]
    fn test_sticker_defaults() {
        let heart = Overlay::sticker(StickerKind::Heart);
        assert_eq!(heart.kind, OverlayKind::Sticker(StickerKind::Heart));
        assert_eq!(heart.style.size_px, Overlay::STICKER_SIZE);
        assert_eq!(heart.position, CenterOffset::default());

        let star = Overlay::sticker(StickerKind::Star);
        assert_ne!(heart.style.color, star.style.color);
    }

    #[test]
    fn test_sticker_rasterizes_without_font() {
        let patch = Overlay::sticker(StickerKind::Heart).rasterize(None).unwrap();
        assert_eq!(patch.width, Overlay::STICKER_SIZE as u32);
        assert_eq!(patch.height, Overlay::STICKER_SIZE as u32);
    }

    #[test]
    fn test_heart_center_filled_corners_empty() {
        let patch = Overlay::sticker(StickerKind::Heart).rasterize(None).unwrap();
        let c = patch.width / 2;
        assert_eq!(patch.get_pixel(c, c)[3], 255, "center should be opaque");
        assert_eq!(patch.get_pixel(0, 0)[3], 0, "corner should be empty");
        assert_eq!(
            patch.get_pixel(patch.width - 1, patch.height - 1)[3],
            0,
            "corner should be empty"
        );
    }

    #[test]
    fn test_star_center_filled_corners_empty() {
        let patch = Overlay::sticker(StickerKind::Star).rasterize(None).unwrap();
        let c = patch.width / 2;
        assert_eq!(patch.get_pixel(c, c)[3], 255);
        assert_eq!(patch.get_pixel(0, 0)[3], 0);
    }

    #[test]
    fn test_sticker_horizontally_symmetric() {
        // Both built-in shapes are mirror-symmetric about the vertical axis.
        for kind in [StickerKind::Heart, StickerKind::Star] {
            let patch = Overlay::sticker(kind).rasterize(None).unwrap();
            for y in 0..patch.height {
                for x in 0..patch.width / 2 {
                    let left = patch.get_pixel(x, y)[3];
                    let right = patch.get_pixel(patch.width - 1 - x, y)[3];
                    assert_eq!(left, right, "{:?} asymmetric at ({}, {})", kind, x, y);
                }
            }
        }
    }

    #[test]
    fn test_star_points_up() {
        let patch = Overlay::sticker(StickerKind::Star).rasterize(None).unwrap();
        let c = patch.width / 2;
        // Top edge of the patch is inside the upward point; the bottom
        // center falls in the notch between the two lower points.
        assert!(patch.get_pixel(c, 1)[3] > 0, "top point should be filled");
        assert_eq!(patch.get_pixel(c, patch.height - 1)[3], 0, "bottom center is a notch");
    }

    #[test]
    fn test_invalid_font_bytes_rejected() {
        assert!(load_font(vec![0, 1, 2, 3]).is_err());
        assert!(load_font(Vec::new()).is_err());
    }
}
