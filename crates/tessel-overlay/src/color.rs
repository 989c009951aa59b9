//! CSS color strings → [`Rgb`].
//!
//! Palette controls report their color through computed styles, which
//! serialize as `rgb(r, g, b)` or `rgba(r, g, b, a)`. Hex notations are also
//! accepted so palette manifests can be written by hand.
//!
//! [CSS Color Level 4](https://www.w3.org/TR/css-color-4/)

use tessel_core::Rgb;

use crate::error::OverlayError;

/// Parse a CSS color string into its RGB channels. Alpha is ignored.
///
/// # Errors
///
/// Returns [`OverlayError::Color`] if `input` is neither a hex color nor an
/// `rgb()`/`rgba()` function with three in-range channels.
pub fn parse_css_color(input: &str) -> Result<Rgb, OverlayError> {
    let trimmed = input.trim();
    let invalid = || OverlayError::Color(trimmed.to_string());

    if trimmed.starts_with('#') {
        return from_hex(trimmed).ok_or_else(invalid);
    }

    let lower = trimmed.to_ascii_lowercase();
    let args = lower
        .strip_prefix("rgba(")
        .or_else(|| lower.strip_prefix("rgb("))
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or_else(invalid)?;

    from_rgb_args(args).ok_or_else(invalid)
}

/// [§ 4.2 The RGB hexadecimal notations](https://www.w3.org/TR/css-color-4/#hex-notation)
/// "The syntax of a <hex-color> is a <hash-token> token whose value consists of
/// 3, 4, 6, or 8 hexadecimal digits."
fn from_hex(hex: &str) -> Option<Rgb> {
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if !hex.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| -> Option<u8> {
        let digits = &hex[range];
        if digits.len() == 1 {
            // "The three-digit RGB notation (#RGB) is converted into six-digit
            // form (#RRGGBB) by replicating digits, not by adding zeros."
            u8::from_str_radix(&digits.repeat(2), 16).ok()
        } else {
            u8::from_str_radix(digits, 16).ok()
        }
    };
    match hex.len() {
        3 | 4 => Some(Rgb::new(channel(0..1)?, channel(1..2)?, channel(2..3)?)),
        6 | 8 => Some(Rgb::new(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
        _ => None,
    }
}

/// Channels of `rgb()`/`rgba()`, comma- or space-separated, with an optional
/// `/ alpha` tail.
fn from_rgb_args(args: &str) -> Option<Rgb> {
    let mut channels = args
        .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(parse_channel);

    let r = channels.next()??;
    let g = channels.next()??;
    let b = channels.next()??;
    Some(Rgb::new(r, g, b))
}

/// A single channel: an integer or number in 0–255, or a percentage.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn parse_channel(part: &str) -> Option<u8> {
    let value = if let Some(pct) = part.strip_suffix('%') {
        pct.parse::<f32>().ok()? * 255.0 / 100.0
    } else {
        part.parse::<f32>().ok()?
    };
    if !value.is_finite() || !(0.0..=255.0).contains(&value.round()) {
        return None;
    }
    Some(value.round() as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_computed_style_rgb() {
        assert_eq!(parse_css_color("rgb(255, 0, 0)").unwrap(), Rgb::new(255, 0, 0));
        assert_eq!(
            parse_css_color("rgba(12, 34, 56, 0.5)").unwrap(),
            Rgb::new(12, 34, 56)
        );
    }

    #[test]
    fn test_space_syntax_and_percentages() {
        assert_eq!(
            parse_css_color("RGB(100% 0% 50% / 1)").unwrap(),
            Rgb::new(255, 0, 128)
        );
    }

    #[test]
    fn test_hex_forms() {
        assert_eq!(parse_css_color("#f00").unwrap(), Rgb::new(255, 0, 0));
        assert_eq!(parse_css_color("#00ff0080").unwrap(), Rgb::new(0, 255, 0));
        assert_eq!(parse_css_color("#FfA500").unwrap(), Rgb::new(255, 165, 0));
    }

    #[test]
    fn test_rejects_malformed() {
        for bad in ["", "red", "rgb(1, 2)", "rgb(1, 2, 300)", "#12", "rgb(a, b, c)"] {
            assert!(parse_css_color(bad).is_err(), "{bad} should be rejected");
        }
    }
}
