use crate::foundation::error::{EditorError, EditorResult};

pub use kurbo::{Affine, Point, Vec2};

/// Immutable, dimensioned pixel buffer: row-major straight-alpha RGBA8.
///
/// Every edit produces a new instance; there is no mutation API.
#[derive(Clone, PartialEq, Eq)]
pub struct RasterBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl RasterBuffer {
    /// Build a buffer from raw RGBA8 bytes, validating dimensions and length.
    pub fn from_rgba8(width: u32, height: u32, data: Vec<u8>) -> EditorResult<Self> {
        if width == 0 || height == 0 {
            return Err(EditorError::validation(
                "raster dimensions must be positive",
            ));
        }
        let expected = byte_len(width, height)?;
        if data.len() != expected {
            return Err(EditorError::validation(format!(
                "raster byte length mismatch: expected {expected}, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build a buffer where every pixel has the same straight RGBA8 value.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> EditorResult<Self> {
        let n = byte_len(width, height)? / 4;
        Self::from_rgba8(width, height, rgba.repeat(n))
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel bytes in row-major straight RGBA8.
    pub fn as_rgba8(&self) -> &[u8] {
        &self.data
    }

    /// Consume the buffer and return its pixel bytes.
    pub fn into_rgba8(self) -> Vec<u8> {
        self.data
    }

    /// Read one pixel; `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        Some([
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ])
    }

    pub(crate) fn to_rgba_image(&self) -> image::RgbaImage {
        // Length is validated at construction.
        image::RgbaImage::from_raw(self.width, self.height, self.data.clone())
            .unwrap_or_else(|| image::RgbaImage::new(self.width, self.height))
    }

    pub(crate) fn from_rgba_image(img: image::RgbaImage) -> EditorResult<Self> {
        let (width, height) = img.dimensions();
        Self::from_rgba8(width, height, img.into_raw())
    }
}

impl std::fmt::Debug for RasterBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("data_len", &self.data.len())
            .finish()
    }
}

/// Absolute pixel rectangle inside an image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelRect {
    /// Left edge in pixels.
    pub x: u32,
    /// Top edge in pixels.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl PixelRect {
    /// Convert a percentage rectangle to pixels using `width`/`height` as 100%.
    ///
    /// Every component is floored independently so adjacent regions never drift apart.
    pub fn from_percent(
        x_pct: f64,
        y_pct: f64,
        w_pct: f64,
        h_pct: f64,
        width: u32,
        height: u32,
    ) -> Self {
        let sx = f64::from(width) / 100.0;
        let sy = f64::from(height) / 100.0;
        Self {
            x: floor_px(x_pct * sx),
            y: floor_px(y_pct * sy),
            width: floor_px(w_pct * sx),
            height: floor_px(h_pct * sy),
        }
    }

    /// Return `true` when the rectangle covers no pixels.
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Clip the rectangle to `[0, width) x [0, height)`.
    pub fn clamp_to(self, width: u32, height: u32) -> Self {
        let x = self.x.min(width);
        let y = self.y.min(height);
        Self {
            x,
            y,
            width: self.width.min(width - x),
            height: self.height.min(height - y),
        }
    }
}

fn floor_px(v: f64) -> u32 {
    if !v.is_finite() || v <= 0.0 {
        return 0;
    }
    // Tolerate representation error such as 49.99999999 from 25% of 200.
    let snapped = (v + 1e-9).floor();
    if snapped >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        snapped as u32
    }
}

pub(crate) fn byte_len(width: u32, height: u32) -> EditorResult<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| EditorError::validation("raster size overflow"))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
