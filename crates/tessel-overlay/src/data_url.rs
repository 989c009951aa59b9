//! `data:` URL decoding for inline overlay images.
//!
//! [RFC 2397](https://www.rfc-editor.org/rfc/rfc2397)

use base64::Engine;

use crate::error::OverlayError;

/// A parsed `data:` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl<'a> {
    /// Media type and parameters, e.g. `image/png;base64`.
    pub metadata: &'a str,
    /// Everything after the first comma.
    pub payload: &'a str,
}

impl<'a> DataUrl<'a> {
    /// Split a `data:` URL into metadata and payload.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::DataUrl`] if `url` does not start with
    /// `data:` or has no comma.
    pub fn parse(url: &'a str) -> Result<Self, OverlayError> {
        let rest = url
            .strip_prefix("data:")
            .ok_or_else(|| OverlayError::DataUrl("missing 'data:' scheme".to_string()))?;
        let (metadata, payload) = rest
            .split_once(',')
            .ok_or_else(|| OverlayError::DataUrl("missing comma".to_string()))?;
        Ok(Self { metadata, payload })
    }

    /// The media type, without parameters.
    #[must_use]
    pub fn media_type(&self) -> &'a str {
        self.metadata.split(';').next().unwrap_or_default()
    }

    /// Whether the payload is base64-encoded.
    #[must_use]
    pub fn is_base64(&self) -> bool {
        self.metadata
            .rsplit(';')
            .next()
            .is_some_and(|param| param.eq_ignore_ascii_case("base64"))
    }

    /// Decode the payload into raw bytes.
    ///
    /// Base64 payloads are decoded as such; anything else is percent-decoded.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::DataUrl`] if the payload is malformed.
    pub fn decode(&self) -> Result<Vec<u8>, OverlayError> {
        if self.is_base64() {
            base64::engine::general_purpose::STANDARD
                .decode(self.payload.trim())
                .map_err(|e| OverlayError::DataUrl(format!("base64 decode error: {e}")))
        } else {
            percent_decode(self.payload)
        }
    }
}

fn percent_decode(input: &str) -> Result<Vec<u8>, OverlayError> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = input
                .get(i + 1..i + 3)
                .and_then(|h| u8::from_str_radix(h, 16).ok())
                .ok_or_else(|| OverlayError::DataUrl(format!("bad percent escape at byte {i}")))?;
            out.push(hex);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    Ok(out)
}
