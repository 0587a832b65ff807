//! Color normalization.
//!
//! Token files spell colors in several textual encodings. This module turns
//! each of them into one canonical [`Rgba`] quadruple with every channel in
//! the unit interval:
//!
//! - `#RRGGBB` / `#RRGGBBAA` hex (see [`hex_to_rgba`])
//! - `rgb(r, g, b)` / `rgba(r, g, b, a)` functional notation
//! - `oklch(L C H)` perceptual notation
//!
//! The grammars are tried in that fixed order by [`parse_color`]. Anything
//! else is "not a color", which callers treat as a plain string rather than
//! an error.

mod functional;
mod hex;

use serde::{Deserialize, Serialize};

pub use functional::{oklch_to_rgba, parse_oklch, parse_rgb_function};
pub use hex::hex_to_rgba;

/// A color with red, green, blue and alpha channels in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    /// Fully opaque black, also the fallback for malformed hex input.
    pub const OPAQUE_BLACK: Rgba = Rgba::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Builds an opaque color from 8-bit channels.
    pub fn from_rgb8((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(
            f64::from(r) / 255.0,
            f64::from(g) / 255.0,
            f64::from(b) / 255.0,
            1.0,
        )
    }

    /// Returns the channels quantized back to 8 bits.
    pub fn to_rgba8(self) -> (u8, u8, u8, u8) {
        let q = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        (q(self.r), q(self.g), q(self.b), q(self.a))
    }
}

impl std::fmt::Display for Rgba {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (r, g, b, a) = self.to_rgba8();
        if a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", r, g, b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", r, g, b, a)
        }
    }
}

/// Parses a color value in any supported encoding.
///
/// Returns `None` when the value is not written in one of the recognized
/// grammars. A `#`-prefixed value always yields a color: malformed hex falls
/// back to opaque black.
///
/// # Example
///
/// ```rust
/// use tokensmith::color::{parse_color, Rgba};
///
/// assert_eq!(parse_color("#FF0000"), Some(Rgba::new(1.0, 0.0, 0.0, 1.0)));
/// assert_eq!(parse_color("rgba(0, 0, 255, 0.5)"), Some(Rgba::new(0.0, 0.0, 1.0, 0.5)));
/// assert_eq!(parse_color("bold"), None);
/// ```
pub fn parse_color(value: &str) -> Option<Rgba> {
    let value = value.trim();

    if value.starts_with('#') {
        return Some(hex_to_rgba(value));
    }

    if let Some(color) = parse_rgb_function(value) {
        return Some(color);
    }

    parse_oklch(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_color_dispatches_hex() {
        assert_eq!(parse_color("#00ff00"), Some(Rgba::new(0.0, 1.0, 0.0, 1.0)));
    }

    #[test]
    fn test_parse_color_trims_input() {
        assert_eq!(parse_color("  #0000FF \n"), Some(Rgba::new(0.0, 0.0, 1.0, 1.0)));
    }

    #[test]
    fn test_parse_color_malformed_hex_is_black() {
        assert_eq!(parse_color("#zzz"), Some(Rgba::OPAQUE_BLACK));
    }

    #[test]
    fn test_parse_color_dispatches_functional() {
        assert_eq!(
            parse_color("rgb(255, 255, 255)"),
            Some(Rgba::new(1.0, 1.0, 1.0, 1.0))
        );
        assert!(parse_color("oklch(0.5 0.1 120)").is_some());
    }

    #[test]
    fn test_parse_color_rejects_other_text() {
        assert_eq!(parse_color("16px"), None);
        assert_eq!(parse_color("{Brand.Primary}"), None);
        assert_eq!(parse_color("FF0000"), None);
        assert_eq!(parse_color(""), None);
    }

    #[test]
    fn test_rgba_display() {
        assert_eq!(Rgba::new(1.0, 0.0, 0.0, 1.0).to_string(), "#ff0000");
        assert_eq!(Rgba::new(0.0, 0.0, 0.0, 0.0).to_string(), "#00000000");
    }

    #[test]
    fn test_from_rgb8() {
        let c = Rgba::from_rgb8((255, 0, 51));
        assert_eq!(c.r, 1.0);
        assert_eq!(c.g, 0.0);
        assert!((c.b - 0.2).abs() < 1e-9);
        assert_eq!(c.a, 1.0);
    }
}
