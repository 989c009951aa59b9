//! Decoded bitmap data shared between image sources and the task builder.

use thiserror::Error;

/// Bytes per RGBA pixel.
pub const BYTES_PER_PIXEL: usize = 4;

/// Error returned when raw pixel data does not describe a valid bitmap.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BitmapError {
    /// The buffer length is not `width * height * 4`.
    #[error("pixel buffer holds {actual} bytes, expected {expected} for {width}x{height}")]
    LengthMismatch {
        /// Declared width in pixels.
        width: u32,
        /// Declared height in pixels.
        height: u32,
        /// Required buffer length in bytes.
        expected: usize,
        /// Length of the buffer that was supplied.
        actual: usize,
    },
    /// `width * height * 4` does not fit in `usize`.
    #[error("bitmap dimensions {width}x{height} overflow the address space")]
    TooLarge {
        /// Declared width in pixels.
        width: u32,
        /// Declared height in pixels.
        height: u32,
    },
}

/// A width × height grid of straight-alpha RGBA pixels with 8-bit channels.
///
/// Pixels are stored row-major, top-to-bottom and left-to-right.
#[derive(Clone, PartialEq, Eq)]
pub struct Bitmap {
    /// Width in pixels.
    width: u32,
    /// Height in pixels.
    height: u32,
    /// Raw RGBA pixel data (width * height * 4 bytes).
    rgba_data: Vec<u8>,
}

impl Bitmap {
    /// Create a new `Bitmap` from decoded RGBA pixel data.
    ///
    /// # Arguments
    ///
    /// * `width` - Width of the image in pixels
    /// * `height` - Height of the image in pixels
    /// * `rgba_data` - Raw RGBA pixel data (must be `width * height * 4` bytes)
    ///
    /// # Errors
    ///
    /// Returns [`BitmapError::LengthMismatch`] if the buffer does not match the
    /// declared dimensions, or [`BitmapError::TooLarge`] if the dimensions
    /// cannot be addressed.
    pub fn new(width: u32, height: u32, rgba_data: Vec<u8>) -> Result<Self, BitmapError> {
        let expected = usize::try_from(u64::from(width) * u64::from(height))
            .ok()
            .and_then(|n| n.checked_mul(BYTES_PER_PIXEL))
            .ok_or(BitmapError::TooLarge { width, height })?;

        if rgba_data.len() != expected {
            return Err(BitmapError::LengthMismatch {
                width,
                height,
                expected,
                actual: rgba_data.len(),
            });
        }

        Ok(Self {
            width,
            height,
            rgba_data,
        })
    }

    /// Build a bitmap by evaluating `f(x, y)` for every pixel.
    ///
    /// Mostly useful for tests and synthetic overlays.
    #[must_use]
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> [u8; 4]) -> Self {
        let mut rgba_data = Vec::with_capacity(width as usize * height as usize * BYTES_PER_PIXEL);
        for y in 0..height {
            for x in 0..width {
                rgba_data.extend_from_slice(&f(x, y));
            }
        }
        Self {
            width,
            height,
            rgba_data,
        }
    }

    /// Width of the bitmap in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height of the bitmap in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Whether the bitmap has no pixels (zero width or height).
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// The RGBA value at `(x, y)`, or `None` when out of bounds.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL;
        let px = self.rgba_data.get(idx..idx + BYTES_PER_PIXEL)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Iterate over every pixel in row-major order as `(x, y, rgba)`.
    pub fn pixels(&self) -> impl Iterator<Item = (u32, u32, [u8; 4])> + '_ {
        let width = self.width.max(1);
        (0u32..)
            .zip(self.rgba_data.chunks_exact(BYTES_PER_PIXEL))
            .map(move |(i, px)| (i % width, i / width, [px[0], px[1], px[2], px[3]]))
    }
}

impl std::fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bitmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.rgba_data.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_short_buffer() {
        let err = Bitmap::new(2, 2, vec![0; 15]).unwrap_err();
        assert_eq!(
            err,
            BitmapError::LengthMismatch {
                width: 2,
                height: 2,
                expected: 16,
                actual: 15
            }
        );
    }

    #[test]
    fn test_pixels_row_major() {
        let bitmap = Bitmap::from_fn(3, 2, |x, y| [x as u8, y as u8, 0, 255]);
        let coords: Vec<(u32, u32)> = bitmap.pixels().map(|(x, y, _)| (x, y)).collect();
        assert_eq!(coords, vec![(0, 0), (1, 0), (2, 0), (0, 1), (1, 1), (2, 1)]);
        assert_eq!(bitmap.pixel(2, 1), Some([2, 1, 0, 255]));
        assert_eq!(bitmap.pixel(3, 0), None);
    }

    #[test]
    fn test_empty_bitmap() {
        let bitmap = Bitmap::new(0, 5, Vec::new()).unwrap();
        assert!(bitmap.is_empty());
        assert_eq!(bitmap.pixels().count(), 0);
    }
}
