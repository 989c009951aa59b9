//! File-backed collaborators for Tessel.
//!
//! The core only sees the [`OverlaySource`](tessel_core::OverlaySource) and
//! [`PaletteSource`](tessel_core::PaletteSource) traits. This crate implements
//! them on top of two small JSON manifests:
//!
//! - **Overlay manifest** - which image to reproduce and where its top-left
//!   pixel goes (region, pixel offset, optional tile size)
//! - **Palette manifest** - the selectable colors, each as a control id and
//!   a CSS color string as read from the control's computed style
//!
//! Images are read from disk or from `data:` URLs and decoded through
//! [`ImageLoaderPipeline`](image_loader::ImageLoaderPipeline).

pub mod color;
pub mod data_url;
pub mod error;
pub mod image_loader;
pub mod manifest;
pub mod source;

pub use color::parse_css_color;
pub use error::OverlayError;
pub use manifest::{OverlayManifest, PaletteEntry, PaletteManifest};
pub use source::{FileOverlay, FilePalette};
