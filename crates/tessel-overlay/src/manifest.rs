//! JSON manifests describing an overlay and a palette.
//!
//! Overlay manifest:
//!
//! ```json
//! {
//!   "image": "cat.png",
//!   "region": { "x": 1, "y": 2 },
//!   "pixel": { "x": 120, "y": 340 },
//!   "tile_size": 1000
//! }
//! ```
//!
//! Palette manifest:
//!
//! ```json
//! {
//!   "controls": [
//!     { "id": "color-1", "color": "rgb(0, 0, 0)" },
//!     { "id": "color-2", "color": "#ffffff" }
//!   ]
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use tessel_core::{ColorId, OriginBasis, PaletteControl, Point};

use crate::color::parse_css_color;
use crate::error::OverlayError;

/// Where to find an overlay image and where to put it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OverlayManifest {
    /// Image file (relative to the manifest) or `data:` URL.
    pub image: String,
    /// Region containing the image's top-left pixel.
    pub region: Point,
    /// Offset of the top-left pixel inside the region.
    pub pixel: Point,
    /// Region size in pixels; the canvas default applies when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tile_size: Option<u32>,
}

impl OverlayManifest {
    /// Read a manifest from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::Io`] or [`OverlayError::Manifest`].
    pub fn load(path: &Path) -> Result<Self, OverlayError> {
        read_json(path)
    }

    /// The placement as an [`OriginBasis`].
    #[must_use]
    pub const fn basis(&self) -> OriginBasis {
        OriginBasis {
            region: self.region,
            pixel: self.pixel,
            tile_size: self.tile_size,
        }
    }
}

/// One selectable color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PaletteEntry {
    /// Control identifier; a leading `color-` is stripped.
    pub id: String,
    /// CSS color string as rendered by the control.
    pub color: String,
}

/// The selectable colors, in UI order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PaletteManifest {
    /// Color controls in enumeration order.
    pub controls: Vec<PaletteEntry>,
}

impl PaletteManifest {
    /// Read a manifest from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::Io`] or [`OverlayError::Manifest`].
    pub fn load(path: &Path) -> Result<Self, OverlayError> {
        read_json(path)
    }

    /// Convert entries to palette controls, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::Color`] for the first entry whose color does
    /// not parse.
    pub fn to_controls(&self) -> Result<Vec<PaletteControl>, OverlayError> {
        self.controls
            .iter()
            .map(|entry| {
                Ok(PaletteControl::new(
                    parse_css_color(&entry.color)?,
                    ColorId::from_control_id(&entry.id),
                ))
            })
            .collect()
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, OverlayError> {
    let text = fs::read_to_string(path).map_err(|source| OverlayError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| OverlayError::Manifest {
        path: path.to_path_buf(),
        source,
    })
}
