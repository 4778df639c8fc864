//! The owned RGBA bitmap type shared across the editing pipeline.
//!
//! Both the master image and the composited display surface are `Bitmap`s:
//! RGBA8 pixel data in row-major order, 4 bytes per pixel. The alpha channel
//! matters — the compositor starts from a fully transparent surface and the
//! crop operation extracts regions of that surface, letterbox gaps included.

/// An owned image with RGBA pixel data.
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// RGBA pixel data in row-major order (4 bytes per pixel).
    /// Length should be width * height * 4.
    pub pixels: Vec<u8>,
}

impl Bitmap {
    /// Create a new Bitmap with the given dimensions and pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            (width as usize) * (height as usize) * 4,
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create a fully transparent bitmap.
    pub fn transparent(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0u8; (width as usize) * (height as usize) * 4],
        }
    }

    /// Create a Bitmap from an image::RgbaImage.
    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        let pixels = img.into_raw();
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Convert to an image::RgbaImage for further processing.
    pub fn to_rgba_image(&self) -> Option<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
    }

    /// Get the total number of pixels.
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }

    /// Get the size of the pixel buffer in bytes.
    pub fn byte_size(&self) -> usize {
        self.pixels.len()
    }

    /// Check if this is an empty/invalid image.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }

    /// Read the RGBA pixel at (x, y). Coordinates must be in bounds.
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> [u8; 4] {
        debug_assert!(x < self.width && y < self.height);
        let idx = ((y as usize) * (self.width as usize) + x as usize) * 4;
        [
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]
    }

    /// Write the RGBA pixel at (x, y). Coordinates must be in bounds.
    #[inline]
    pub fn put_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        debug_assert!(x < self.width && y < self.height);
        let idx = ((y as usize) * (self.width as usize) + x as usize) * 4;
        self.pixels[idx..idx + 4].copy_from_slice(&rgba);
    }

    /// Blend a straight-alpha source pixel over the pixel at (x, y).
    pub fn blend_pixel(&mut self, x: u32, y: u32, src: [u8; 4]) {
        let sa = src[3] as f32 / 255.0;
        if sa <= 0.0 {
            return;
        }
        let dst = self.get_pixel(x, y);
        let da = dst[3] as f32 / 255.0;
        if sa >= 1.0 || da <= 0.0 {
            self.put_pixel(x, y, src);
            return;
        }

        let out_a = sa + da * (1.0 - sa);
        let mut out = [0u8; 4];
        for i in 0..3 {
            let s = src[i] as f32 / 255.0;
            let d = dst[i] as f32 / 255.0;
            let c = (s * sa + d * da * (1.0 - sa)) / out_a;
            out[i] = (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        }
        out[3] = (out_a.clamp(0.0, 1.0) * 255.0).round() as u8;
        self.put_pixel(x, y, out);
    }

    /// Sample the bitmap at a fractional position using bilinear interpolation.
    ///
    /// Coordinates are clamped to the image bounds. Interpolation is done on
    /// premultiplied values so transparent neighbors do not bleed their RGB
    /// into partially covered samples.
    pub fn sample_bilinear(&self, x: f64, y: f64) -> [u8; 4] {
        if self.is_empty() {
            return [0, 0, 0, 0];
        }

        let max_x = (self.width - 1) as f64;
        let max_y = (self.height - 1) as f64;
        let x = x.clamp(0.0, max_x);
        let y = y.clamp(0.0, max_y);

        let x0 = x.floor() as u32;
        let y0 = y.floor() as u32;
        let x1 = (x0 + 1).min(self.width - 1);
        let y1 = (y0 + 1).min(self.height - 1);

        let fx = x - x0 as f64;
        let fy = y - y0 as f64;

        let corners = [
            (self.get_pixel(x0, y0), (1.0 - fx) * (1.0 - fy)),
            (self.get_pixel(x1, y0), fx * (1.0 - fy)),
            (self.get_pixel(x0, y1), (1.0 - fx) * fy),
            (self.get_pixel(x1, y1), fx * fy),
        ];

        let mut acc = [0.0f64; 3];
        let mut alpha = 0.0f64;
        for (px, w) in corners {
            let a = px[3] as f64 / 255.0;
            alpha += a * w;
            for i in 0..3 {
                acc[i] += px[i] as f64 * a * w;
            }
        }

        if alpha <= 0.0 {
            return [0, 0, 0, 0];
        }

        let mut out = [0u8; 4];
        for i in 0..3 {
            out[i] = (acc[i] / alpha).clamp(0.0, 255.0).round() as u8;
        }
        out[3] = (alpha * 255.0).clamp(0.0, 255.0).round() as u8;
        out
    }
}
