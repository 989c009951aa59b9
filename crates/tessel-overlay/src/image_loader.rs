//! Image loading pipeline: read, detect format, and decode into a [`Bitmap`].
//!
//! 1. **Read** - [`read_image_bytes()`] handles `data:` URLs and file paths
//!    (relative paths resolve against the manifest's directory).
//! 2. **Detect** - [`detect_format()`] tells SVG from raster using the
//!    extension, the data URL media type, and magic-byte sniffing.
//! 3. **Decode** - [`ImageDecoder`] with [`SvgDecoder`] and [`RasterDecoder`].
//!
//! Decoding keeps straight alpha and exact channel values; no resampling or
//! color management happens here, so a palette-quantized PNG stays quantized.

use std::fs;
use std::path::{Path, PathBuf};

use tessel_common::Bitmap;

use crate::data_url::DataUrl;
use crate::error::OverlayError;

/// Detected image format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// SVG vector image (rasterized via usvg + resvg).
    Svg,
    /// Raster image (PNG, JPEG, GIF, WebP and friends, decoded by the `image` crate).
    Raster,
}

/// Resolve an image reference from a manifest.
///
/// `data:` URLs and absolute paths are returned unchanged; relative paths are
/// joined onto `base_dir`.
#[must_use]
pub fn resolve_image_ref(reference: &str, base_dir: &Path) -> ImageRef {
    if reference.starts_with("data:") {
        return ImageRef::DataUrl(reference.to_string());
    }
    let path = Path::new(reference.strip_prefix("file://").unwrap_or(reference));
    if path.is_absolute() {
        ImageRef::File(path.to_path_buf())
    } else {
        ImageRef::File(base_dir.join(path))
    }
}

/// Where an overlay image comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageRef {
    /// An inline `data:` URL.
    DataUrl(String),
    /// A file on disk.
    File(PathBuf),
}

impl ImageRef {
    /// Path used for extension checks (empty for data URLs).
    fn path_for_ext(&self) -> &Path {
        match self {
            Self::DataUrl(_) => Path::new(""),
            Self::File(path) => path,
        }
    }

    /// Media type declared by a data URL, if any.
    fn declared_media_type(&self) -> Option<&str> {
        match self {
            Self::DataUrl(url) => DataUrl::parse(url).ok().map(|d| d.media_type()),
            Self::File(_) => None,
        }
    }
}

/// Read the raw bytes behind `image`.
///
/// # Errors
///
/// Returns [`OverlayError::Io`] if a file cannot be read, or
/// [`OverlayError::DataUrl`] if a data URL is malformed.
pub fn read_image_bytes(image: &ImageRef) -> Result<Vec<u8>, OverlayError> {
    match image {
        ImageRef::DataUrl(url) => DataUrl::parse(url)?.decode(),
        ImageRef::File(path) => fs::read(path).map_err(|source| OverlayError::Io {
            path: path.clone(),
            source,
        }),
    }
}

/// Detect whether `bytes` represent an SVG or a raster image.
///
/// 1. **Extension check**: `.svg` on the file path.
/// 2. **Media type check**: `image/svg+xml` declared by a data URL.
/// 3. **Magic-byte sniffing**: `<?xml` or `<svg` after leading whitespace
///    within the first 256 bytes.
/// 4. **Default**: [`ImageFormat::Raster`].
#[must_use]
pub fn detect_format(path_for_ext: &Path, media_type: Option<&str>, bytes: &[u8]) -> ImageFormat {
    if path_for_ext
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"))
    {
        return ImageFormat::Svg;
    }

    if media_type.is_some_and(|mime| mime.starts_with("image/svg")) {
        return ImageFormat::Svg;
    }

    let trimmed = bytes
        .iter()
        .skip_while(|b| b.is_ascii_whitespace())
        .take(256)
        .copied()
        .collect::<Vec<u8>>();

    if trimmed.starts_with(b"<?xml") || trimmed.starts_with(b"<svg") {
        return ImageFormat::Svg;
    }

    ImageFormat::Raster
}

/// A decoder that can turn raw bytes into a [`Bitmap`].
pub trait ImageDecoder {
    /// Human-readable name (for diagnostics).
    fn name(&self) -> &'static str;

    /// Whether this decoder handles the given format.
    fn supports(&self, format: ImageFormat) -> bool;

    /// Attempt to decode `bytes` into a [`Bitmap`].
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::Decode`] if the bytes cannot be decoded by this
    /// decoder.
    fn decode(&self, bytes: &[u8]) -> Result<Bitmap, OverlayError>;
}

/// Rasterizes SVG images via usvg → resvg at their intrinsic size.
pub struct SvgDecoder;

impl ImageDecoder for SvgDecoder {
    fn name(&self) -> &'static str {
        "SVG (resvg)"
    }

    fn supports(&self, format: ImageFormat) -> bool {
        format == ImageFormat::Svg
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn decode(&self, bytes: &[u8]) -> Result<Bitmap, OverlayError> {
        let opts = usvg::Options::default();
        let tree = usvg::Tree::from_data(bytes, &opts)
            .map_err(|e| OverlayError::Decode(format!("failed to parse SVG: {e}")))?;

        let size = tree.size();
        let (w, h) = (size.width().ceil() as u32, size.height().ceil() as u32);
        if w == 0 || h == 0 {
            return Err(OverlayError::Decode(
                "SVG has zero-size dimensions".to_string(),
            ));
        }

        let mut pixmap = tiny_skia::Pixmap::new(w, h)
            .ok_or_else(|| OverlayError::Decode("failed to allocate pixmap for SVG".to_string()))?;

        resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

        // tiny-skia stores premultiplied RGBA; the builder matches straight colors.
        let rgba = pixmap
            .pixels()
            .iter()
            .flat_map(|px| {
                let c = px.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect();

        Ok(Bitmap::new(w, h, rgba)?)
    }
}

/// Decodes raster images (PNG, JPEG, GIF, WebP, …) via the `image` crate.
pub struct RasterDecoder;

impl ImageDecoder for RasterDecoder {
    fn name(&self) -> &'static str {
        "Raster (image crate)"
    }

    fn supports(&self, format: ImageFormat) -> bool {
        format == ImageFormat::Raster
    }

    fn decode(&self, bytes: &[u8]) -> Result<Bitmap, OverlayError> {
        let dynamic_img =
            image::load_from_memory(bytes).map_err(|e| OverlayError::Decode(e.to_string()))?;
        let rgba = dynamic_img.to_rgba8();
        let (w, h) = rgba.dimensions();
        Ok(Bitmap::new(w, h, rgba.into_raw())?)
    }
}

/// Image loading pipeline that detects format and dispatches to the
/// appropriate decoder.
pub struct ImageLoaderPipeline {
    decoders: Vec<Box<dyn ImageDecoder>>,
}

impl ImageLoaderPipeline {
    /// Create a pipeline with the default decoders (SVG + raster).
    #[must_use]
    pub fn new() -> Self {
        Self {
            decoders: vec![Box::new(SvgDecoder), Box::new(RasterDecoder)],
        }
    }

    /// Read and decode `image`.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes cannot be read, no decoder supports the
    /// detected format, or decoding fails.
    pub fn load(&self, image: &ImageRef) -> Result<Bitmap, OverlayError> {
        let bytes = read_image_bytes(image)?;
        let format = detect_format(image.path_for_ext(), image.declared_media_type(), &bytes);

        let decoder = self
            .decoders
            .iter()
            .find(|decoder| decoder.supports(format))
            .ok_or_else(|| OverlayError::Decode(format!("no decoder available for {format:?}")))?;

        log::debug!("image: decoding {} bytes with {}", bytes.len(), decoder.name());
        decoder.decode(&bytes)
    }
}

impl Default for ImageLoaderPipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_svg_by_extension() {
        assert_eq!(
            detect_format(Path::new("art/logo.SVG"), None, b"\x89PNG"),
            ImageFormat::Svg
        );
    }

    #[test]
    fn test_detect_svg_by_sniffing() {
        assert_eq!(
            detect_format(Path::new(""), None, b"  \n<svg xmlns='...'>"),
            ImageFormat::Svg
        );
        assert_eq!(
            detect_format(Path::new("a.png"), Some("image/png"), b"\x89PNG"),
            ImageFormat::Raster
        );
    }

    #[test]
    fn test_resolve_relative_against_base() {
        let base = Path::new("/srv/overlays");
        assert_eq!(
            resolve_image_ref("art/cat.png", base),
            ImageRef::File(PathBuf::from("/srv/overlays/art/cat.png"))
        );
        assert_eq!(
            resolve_image_ref("/tmp/cat.png", base),
            ImageRef::File(PathBuf::from("/tmp/cat.png"))
        );
        assert!(matches!(
            resolve_image_ref("data:image/png;base64,AAAA", base),
            ImageRef::DataUrl(_)
        ));
    }

    #[test]
    fn test_svg_rasterizes_exact_colors() {
        let svg = br##"<svg xmlns="http://www.w3.org/2000/svg" width="2" height="1">
            <rect x="0" y="0" width="1" height="1" fill="#ff0000" shape-rendering="crispEdges"/>
        </svg>"##;
        let bitmap = SvgDecoder.decode(svg).unwrap();
        assert_eq!((bitmap.width(), bitmap.height()), (2, 1));
        assert_eq!(bitmap.pixel(0, 0), Some([255, 0, 0, 255]));
        assert_eq!(bitmap.pixel(1, 0).map(|px| px[3]), Some(0));
    }
}
