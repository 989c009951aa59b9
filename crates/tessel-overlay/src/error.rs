//! Errors raised while loading manifests and images.

use std::path::PathBuf;

use thiserror::Error;

/// Failure to load an overlay or palette from disk.
#[derive(Debug, Error)]
pub enum OverlayError {
    /// A file could not be read.
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        /// The file that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// A manifest is not valid JSON for its schema.
    #[error("invalid manifest '{}': {source}", path.display())]
    Manifest {
        /// The manifest that failed.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },
    /// A `data:` URL could not be decoded.
    #[error("invalid data URL: {0}")]
    DataUrl(String),
    /// Image bytes could not be decoded.
    #[error("could not decode image: {0}")]
    Decode(String),
    /// Decoded pixels do not form a valid bitmap.
    #[error(transparent)]
    Bitmap(#[from] tessel_common::BitmapError),
    /// A palette color string is not a supported CSS color.
    #[error("unsupported color '{0}'")]
    Color(String),
}
