//! [`OverlaySource`] and [`PaletteSource`] backed by manifest files.
//!
//! Both sources re-read their files on every call, so edits between builds
//! are picked up and nothing is cached across builds.

use std::path::{Path, PathBuf};

use tessel_common::warning::warn_once;
use tessel_core::{ColorId, Overlay, OverlaySource, PaletteControl, PaletteSource};

use crate::color::parse_css_color;
use crate::error::OverlayError;
use crate::image_loader::{ImageLoaderPipeline, resolve_image_ref};
use crate::manifest::{OverlayManifest, PaletteManifest};

/// An overlay described by an [`OverlayManifest`] on disk.
pub struct FileOverlay {
    manifest_path: PathBuf,
    pipeline: ImageLoaderPipeline,
}

impl FileOverlay {
    /// Overlay whose manifest lives at `manifest_path`.
    #[must_use]
    pub fn new(manifest_path: impl Into<PathBuf>) -> Self {
        Self {
            manifest_path: manifest_path.into(),
            pipeline: ImageLoaderPipeline::new(),
        }
    }

    /// Load the manifest and its image, reporting exactly what failed.
    ///
    /// # Errors
    ///
    /// Returns the first manifest or image error encountered.
    pub fn load(&self) -> Result<Overlay, OverlayError> {
        let manifest = OverlayManifest::load(&self.manifest_path)?;
        let base_dir = self.manifest_path.parent().unwrap_or_else(|| Path::new("."));
        let bitmap = self.pipeline.load(&resolve_image_ref(&manifest.image, base_dir))?;
        Ok(Overlay {
            bitmap: Some(bitmap),
            basis: Some(manifest.basis()),
        })
    }
}

impl OverlaySource for FileOverlay {
    /// A missing or invalid manifest means no overlay; an unreadable image
    /// leaves the overlay without a bitmap.
    fn overlay(&self) -> Option<Overlay> {
        let manifest = match OverlayManifest::load(&self.manifest_path) {
            Ok(manifest) => manifest,
            Err(e) => {
                log::warn!("overlay: {e}");
                return None;
            }
        };

        let base_dir = self.manifest_path.parent().unwrap_or_else(|| Path::new("."));
        let bitmap = match self.pipeline.load(&resolve_image_ref(&manifest.image, base_dir)) {
            Ok(bitmap) => Some(bitmap),
            Err(e) => {
                log::warn!("overlay: image '{}': {e}", manifest.image);
                None
            }
        };

        Some(Overlay {
            bitmap,
            basis: Some(manifest.basis()),
        })
    }
}

/// A palette described by a [`PaletteManifest`] on disk.
pub struct FilePalette {
    path: PathBuf,
}

impl FilePalette {
    /// Palette whose manifest lives at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load every control, failing on the first bad entry.
    ///
    /// # Errors
    ///
    /// Returns the manifest error or the first unparseable color.
    pub fn try_controls(&self) -> Result<Vec<PaletteControl>, OverlayError> {
        PaletteManifest::load(&self.path)?.to_controls()
    }
}

impl PaletteSource for FilePalette {
    /// Entries whose color does not parse are skipped with a warning.
    fn locate_palette_controls(&self) -> Vec<PaletteControl> {
        let manifest = match PaletteManifest::load(&self.path) {
            Ok(manifest) => manifest,
            Err(e) => {
                log::warn!("palette: {e}");
                return Vec::new();
            }
        };

        manifest
            .controls
            .iter()
            .filter_map(|entry| match parse_css_color(&entry.color) {
                Ok(rgb) => Some(PaletteControl::new(rgb, ColorId::from_control_id(&entry.id))),
                Err(e) => {
                    warn_once("palette", &format!("skipping control '{}': {e}", entry.id));
                    None
                }
            })
            .collect()
    }
}
