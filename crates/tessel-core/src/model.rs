//! Plain data types shared by the builder and the executor.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Tile size used when an origin basis does not report one.
pub const DEFAULT_TILE_SIZE: u32 = 1000;

/// Prefix carried by color control identifiers (`color-12` → `12`).
const CONTROL_ID_PREFIX: &str = "color-";

/// An opaque 24-bit sRGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Rgb {
    /// Red channel (0-255)
    pub r: u8,
    /// Green channel (0-255)
    pub g: u8,
    /// Blue channel (0-255)
    pub b: u8,
}

impl Rgb {
    /// Create an RGB triple.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// The color channels of an RGBA pixel, ignoring alpha.
    #[must_use]
    pub const fn from_rgba(px: [u8; 4]) -> Self {
        Self::new(px[0], px[1], px[2])
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

/// Identifier of a selectable palette color.
///
/// The value is opaque to the core; it is only ever handed back to the
/// control surface in [`Action::SelectColor`](crate::Action::SelectColor).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorId(String);

impl ColorId {
    /// Wrap an identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Identifier of a color control, with any `color-` prefix removed.
    #[must_use]
    pub fn from_control_id(control_id: &str) -> Self {
        Self::new(
            control_id
                .strip_prefix(CONTROL_ID_PREFIX)
                .unwrap_or(control_id),
        )
    }

    /// The identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ColorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ColorId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// A signed integer coordinate pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal component.
    pub x: i64,
    /// Vertical component.
    pub y: i64,
}

impl Point {
    /// Create a point.
    #[must_use]
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

/// One atomic paint action: apply `color` at the absolute canvas
/// coordinate `(x, y)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaintTask {
    /// Absolute canvas column.
    pub x: i64,
    /// Absolute canvas row.
    pub y: i64,
    /// Resolved palette color.
    pub color: ColorId,
}

impl PaintTask {
    /// Create a task.
    #[must_use]
    pub const fn new(x: i64, y: i64, color: ColorId) -> Self {
        Self { x, y, color }
    }

    /// The task's absolute coordinate.
    #[must_use]
    pub const fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Absolute canvas coordinate of a bitmap's top-left pixel.
///
/// An origin is fixed for the lifetime of one task sequence and is passed
/// explicitly to both the builder and the executor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Origin {
    /// Absolute column of the bitmap's left edge.
    pub x: i64,
    /// Absolute row of the bitmap's top edge.
    pub y: i64,
}

impl Origin {
    /// Create an origin.
    #[must_use]
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// `region * tile_size + pixel`, per axis.
    ///
    /// Returns `None` if the result does not fit in an `i64`.
    #[must_use]
    pub fn from_basis(basis: &OriginBasis) -> Option<Self> {
        let tile = i64::from(basis.effective_tile_size());
        let axis = |region: i64, pixel: i64| region.checked_mul(tile)?.checked_add(pixel);
        Some(Self {
            x: axis(basis.region.x, basis.pixel.x)?,
            y: axis(basis.region.y, basis.pixel.y)?,
        })
    }

    /// Translate a bitmap-local coordinate to an absolute one.
    #[must_use]
    pub fn absolute(self, local_x: u32, local_y: u32) -> Point {
        Point::new(self.x + i64::from(local_x), self.y + i64::from(local_y))
    }

    /// Translate an absolute coordinate back into this origin's frame.
    #[must_use]
    pub const fn relative(self, absolute: Point) -> Point {
        Point::new(absolute.x - self.x, absolute.y - self.y)
    }
}

/// The raw pieces an overlay reports for placing its image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OriginBasis {
    /// Index of the region (tile) containing the image's top-left pixel.
    pub region: Point,
    /// Offset of the top-left pixel inside that region.
    pub pixel: Point,
    /// Size of one region in pixels. Missing or zero means
    /// [`DEFAULT_TILE_SIZE`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tile_size: Option<u32>,
}

impl OriginBasis {
    /// The tile size actually used for origin computation.
    #[must_use]
    pub fn effective_tile_size(&self) -> u32 {
        self.tile_size
            .filter(|&size| size > 0)
            .unwrap_or(DEFAULT_TILE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_from_basis() {
        let basis = OriginBasis {
            region: Point::new(2, 3),
            pixel: Point::new(15, 40),
            tile_size: Some(500),
        };
        assert_eq!(Origin::from_basis(&basis), Some(Origin::new(1015, 1540)));
    }

    #[test]
    fn test_origin_default_tile_size() {
        let basis = OriginBasis {
            region: Point::new(1, -1),
            pixel: Point::new(5, 5),
            tile_size: None,
        };
        assert_eq!(Origin::from_basis(&basis), Some(Origin::new(1005, -995)));

        let zero = OriginBasis {
            tile_size: Some(0),
            ..basis
        };
        assert_eq!(zero.effective_tile_size(), DEFAULT_TILE_SIZE);
    }

    #[test]
    fn test_origin_overflow() {
        let basis = OriginBasis {
            region: Point::new(i64::MAX, 0),
            pixel: Point::new(0, 0),
            tile_size: Some(2),
        };
        assert_eq!(Origin::from_basis(&basis), None);
    }

    #[test]
    fn test_origin_relative_round_trip() {
        let origin = Origin::new(-10, 20);
        let abs = origin.absolute(3, 4);
        assert_eq!(abs, Point::new(-7, 24));
        assert_eq!(origin.relative(abs), Point::new(3, 4));
    }

    #[test]
    fn test_color_id_from_control_id() {
        assert_eq!(ColorId::from_control_id("color-12").as_str(), "12");
        assert_eq!(ColorId::from_control_id("eraser").as_str(), "eraser");
    }

    #[test]
    fn test_rgb_display() {
        assert_eq!(Rgb::new(1, 2, 3).to_string(), "rgb(1, 2, 3)");
    }
}
