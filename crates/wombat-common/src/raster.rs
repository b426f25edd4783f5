//! RGBA pixel buffers the layout engine composites into.
//!
//! Every element renders itself into its own [`Raster`] and the parent
//! composites the result, so the buffer needs exactly three operations:
//! opaque fills, source copies, and alpha-blended overlays.

/// An RGBA pixel buffer with top-left origin.
///
/// Pixels are stored row-major, four bytes per pixel. A freshly created
/// raster is fully transparent.
#[derive(Clone)]
pub struct Raster {
    /// Width in pixels
    width: u32,
    /// Height in pixels
    height: u32,
    /// Raw RGBA data (width * height * 4 bytes)
    data: Vec<u8>,
}

impl Raster {
    /// Create a transparent raster of the given size.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; (width as usize) * (height as usize) * 4],
        }
    }

    /// Wrap existing RGBA pixel data.
    ///
    /// # Panics
    ///
    /// Panics if `data` is not `width * height * 4` bytes.
    #[must_use]
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Self {
        assert_eq!(data.len(), (width as usize) * (height as usize) * 4);
        Self {
            width,
            height,
            data,
        }
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA pixel data.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume the raster and return its raw RGBA pixel data.
    #[must_use]
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Read the pixel at `(x, y)`, or transparent if out of bounds.
    #[must_use]
    pub fn pixel(&self, x: i32, y: i32) -> [u8; 4] {
        if x < 0 || y < 0 {
            return [0, 0, 0, 0];
        }
        let (x, y) = (x.unsigned_abs(), y.unsigned_abs());
        if x >= self.width || y >= self.height {
            return [0, 0, 0, 0];
        }
        let i = ((y * self.width + x) * 4) as usize;
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    /// Write the pixel at `(x, y)`; writes outside the buffer are dropped.
    pub fn put_pixel(&mut self, x: i32, y: i32, px: [u8; 4]) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x.unsigned_abs(), y.unsigned_abs());
        if x >= self.width || y >= self.height {
            return;
        }
        let i = ((y * self.width + x) * 4) as usize;
        self.data[i..i + 4].copy_from_slice(&px);
    }

    /// Blend `px` onto the pixel at `(x, y)` with the given coverage.
    ///
    /// Used for glyph rasterization, where `alpha` is the per-pixel coverage
    /// value from the font rasterizer.
    pub fn blend_pixel(&mut self, x: i32, y: i32, px: [u8; 4], alpha: u8) {
        if alpha == 0 {
            return;
        }
        if alpha == 255 && px[3] == 255 {
            self.put_pixel(x, y, px);
            return;
        }
        let bg = self.pixel(x, y);
        self.put_pixel(x, y, alpha_blend(px, bg, alpha));
    }

    /// Fill a rectangle with a color (source semantics, clipped).
    pub fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32, px: [u8; 4]) {
        for dy in 0..height.max(0) {
            for dx in 0..width.max(0) {
                self.put_pixel(x + dx, y + dy, px);
            }
        }
    }

    /// Copy `src` onto this raster at `(x, y)` (source semantics, clipped).
    ///
    /// Transparent source pixels overwrite the destination; used for line
    /// rasters, which fully own their area.
    #[allow(clippy::cast_possible_wrap)]
    pub fn copy_from(&mut self, src: &Self, x: i32, y: i32) {
        for sy in 0..src.height {
            for sx in 0..src.width {
                self.put_pixel(x + sx as i32, y + sy as i32, src.pixel(sx as i32, sy as i32));
            }
        }
    }

    /// Alpha-blend `src` onto this raster at `(x, y)` (over semantics, clipped).
    #[allow(clippy::cast_possible_wrap)]
    pub fn composite_over(&mut self, src: &Self, x: i32, y: i32) {
        for sy in 0..src.height {
            for sx in 0..src.width {
                let fg = src.pixel(sx as i32, sy as i32);
                if fg[3] == 0 {
                    continue;
                }
                let (dx, dy) = (x + sx as i32, y + sy as i32);
                if fg[3] == 255 {
                    self.put_pixel(dx, dy, fg);
                } else {
                    let bg = self.pixel(dx, dy);
                    self.put_pixel(dx, dy, alpha_blend(fg, bg, fg[3]));
                }
            }
        }
    }
}

/// Alpha blend a foreground color onto a background color.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
#[must_use]
pub fn alpha_blend(fg: [u8; 4], bg: [u8; 4], alpha: u8) -> [u8; 4] {
    let a = f32::from(alpha) / 255.0;
    let inv_a = 1.0 - a;

    [
        f32::from(fg[0]).mul_add(a, f32::from(bg[0]) * inv_a) as u8,
        f32::from(fg[1]).mul_add(a, f32::from(bg[1]) * inv_a) as u8,
        f32::from(fg[2]).mul_add(a, f32::from(bg[2]) * inv_a) as u8,
        255,
    ]
}
