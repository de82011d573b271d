//! RGBA raster surface and its two compositing primitives.
//!
//! Pixels are straight (non-premultiplied) RGBA8. Painting uses source-over;
//! erasing uses destination-out, which only reduces alpha.

use std::io::Cursor;

use image::{ImageFormat, Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::error::CanvasError;

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// A position on the surface in pixel units. Fractional values are allowed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn distance(self, other: Point) -> f32 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RasterSurface {
    image: RgbaImage,
}

impl RasterSurface {
    /// Create an opaque white surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::from_pixel(width.max(1), height.max(1), WHITE),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.image.get_pixel_checked(x, y).map(|p| p.0)
    }

    /// Reset every pixel to opaque white.
    pub fn fill_white(&mut self) {
        for pixel in self.image.pixels_mut() {
            *pixel = WHITE;
        }
    }

    /// Source-over blend of `color` at `alpha` (0..=1) into one pixel.
    /// Out-of-bounds coordinates are ignored.
    pub fn paint(&mut self, x: i64, y: i64, color: [u8; 3], alpha: f32) {
        let Some(dst) = self.pixel_mut(x, y) else {
            return;
        };
        let src_a = alpha.clamp(0.0, 1.0);
        if src_a <= 0.0 {
            return;
        }

        let dst_a = dst[3] as f32 / 255.0;
        let out_a = src_a + dst_a * (1.0 - src_a);
        for c in 0..3 {
            let s = color[c] as f32 / 255.0;
            let d = dst[c] as f32 / 255.0;
            let v = (s * src_a + d * dst_a * (1.0 - src_a)) / out_a;
            dst[c] = to_byte(v);
        }
        dst[3] = to_byte(out_a);
    }

    /// Destination-out at `alpha`: reduce the pixel's alpha, colour unused.
    pub fn erase(&mut self, x: i64, y: i64, alpha: f32) {
        let Some(dst) = self.pixel_mut(x, y) else {
            return;
        };
        let keep = 1.0 - alpha.clamp(0.0, 1.0);
        let out_a = dst[3] as f32 / 255.0 * keep;
        dst[3] = to_byte(out_a);
        if dst[3] == 0 {
            dst[0] = 0;
            dst[1] = 0;
            dst[2] = 0;
        }
    }

    /// Encode the whole surface as PNG.
    pub fn encode_png(&self) -> Result<Vec<u8>, CanvasError> {
        let mut out = Cursor::new(Vec::new());
        self.image
            .write_to(&mut out, ImageFormat::Png)
            .map_err(CanvasError::Encode)?;
        Ok(out.into_inner())
    }

    /// Decode PNG bytes produced by [`encode_png`](Self::encode_png).
    pub fn decode_png(bytes: &[u8]) -> Result<Self, CanvasError> {
        let image = image::load_from_memory_with_format(bytes, ImageFormat::Png)
            .map_err(CanvasError::Decode)?
            .into_rgba8();
        Ok(Self { image })
    }

    /// Replace this surface's pixels with `other`'s. Sizes must match.
    pub fn restore_from(&mut self, other: RasterSurface) -> Result<(), CanvasError> {
        let expected = self.image.dimensions();
        let actual = other.image.dimensions();
        if expected != actual {
            return Err(CanvasError::SizeMismatch { expected, actual });
        }
        self.image = other.image;
        Ok(())
    }

    fn pixel_mut(&mut self, x: i64, y: i64) -> Option<&mut [u8; 4]> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (u32::try_from(x).ok()?, u32::try_from(y).ok()?);
        self.image.get_pixel_mut_checked(x, y).map(|p| &mut p.0)
    }
}

fn to_byte(v: f32) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}
