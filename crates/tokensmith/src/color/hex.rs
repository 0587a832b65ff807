//! Hex color notation.

use once_cell::sync::Lazy;
use regex::Regex;

use super::Rgba;

static HEX_COLOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^#?([0-9a-f]{2})([0-9a-f]{2})([0-9a-f]{2})([0-9a-f]{2})?$")
        .expect("hex color pattern is valid")
});

/// Converts `RRGGBB` or `RRGGBBAA` hex (leading `#` optional, any case) to [`Rgba`].
///
/// Missing alpha defaults to `1.0`. Input that does not match the pattern
/// yields [`Rgba::OPAQUE_BLACK`] instead of an error.
///
/// # Example
///
/// ```rust
/// use tokensmith::color::{hex_to_rgba, Rgba};
///
/// assert_eq!(hex_to_rgba("#ff0000"), Rgba::new(1.0, 0.0, 0.0, 1.0));
/// assert_eq!(hex_to_rgba("not hex"), Rgba::OPAQUE_BLACK);
/// ```
pub fn hex_to_rgba(hex: &str) -> Rgba {
    let Some(caps) = HEX_COLOR.captures(hex.trim()) else {
        tracing::warn!(value = hex, "malformed hex color, using opaque black");
        return Rgba::OPAQUE_BLACK;
    };

    let channel = |i: usize| -> Option<f64> {
        caps.get(i)
            .and_then(|m| u8::from_str_radix(m.as_str(), 16).ok())
            .map(|v| f64::from(v) / 255.0)
    };

    match (channel(1), channel(2), channel(3)) {
        (Some(r), Some(g), Some(b)) => Rgba::new(r, g, b, channel(4).unwrap_or(1.0)),
        _ => Rgba::OPAQUE_BLACK,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_six_digit_hex() {
        assert_eq!(hex_to_rgba("#FF0000"), Rgba::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(hex_to_rgba("00ff00"), Rgba::new(0.0, 1.0, 0.0, 1.0));
    }

    #[test]
    fn test_eight_digit_hex_alpha() {
        let c = hex_to_rgba("#0000FF80");
        assert_eq!(c.b, 1.0);
        assert!((c.a - 128.0 / 255.0).abs() < 1e-9);
    }

    #[test]
    fn test_mixed_case() {
        assert_eq!(hex_to_rgba("#fFfFfF"), Rgba::new(1.0, 1.0, 1.0, 1.0));
    }

    #[test]
    fn test_malformed_is_opaque_black() {
        assert_eq!(hex_to_rgba("#fff"), Rgba::OPAQUE_BLACK);
        assert_eq!(hex_to_rgba("#12345"), Rgba::OPAQUE_BLACK);
        assert_eq!(hex_to_rgba("#gg0000"), Rgba::OPAQUE_BLACK);
        assert_eq!(hex_to_rgba("#1234567890"), Rgba::OPAQUE_BLACK);
        assert_eq!(hex_to_rgba(""), Rgba::OPAQUE_BLACK);
    }
}
