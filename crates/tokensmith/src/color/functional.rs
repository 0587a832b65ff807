//! Functional color notations: `rgb()`/`rgba()` and `oklch()`.

use once_cell::sync::Lazy;
use regex::Regex;

use super::Rgba;

static RGB_FUNCTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^rgba?\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*(?:,\s*(\d*\.?\d+)\s*)?\)$",
    )
    .expect("rgb pattern is valid")
});

static OKLCH_FUNCTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^oklch\(\s*(-?\d*\.?\d+)(%?)\s+(-?\d*\.?\d+)\s+(-?\d*\.?\d+)(?:deg)?\s*\)$",
    )
    .expect("oklch pattern is valid")
});

/// Parses `rgb(r, g, b)` or `rgba(r, g, b, a)`.
///
/// Channels are integers in `0..=255` (larger values saturate) and alpha is a
/// float in `0..=1` defaulting to `1.0`.
pub fn parse_rgb_function(value: &str) -> Option<Rgba> {
    let caps = RGB_FUNCTION.captures(value.trim())?;

    let channel = |i: usize| -> Option<f64> {
        let v: u16 = caps.get(i)?.as_str().parse().ok()?;
        Some(f64::from(v.min(255)) / 255.0)
    };

    let alpha = match caps.get(4) {
        Some(m) => m.as_str().parse::<f64>().ok()?.clamp(0.0, 1.0),
        None => 1.0,
    };

    Some(Rgba::new(channel(1)?, channel(2)?, channel(3)?, alpha))
}

/// Parses `oklch(L C H)` with space-separated lightness, chroma and hue (degrees).
///
/// Lightness may also be written as a percentage (`62%`).
pub fn parse_oklch(value: &str) -> Option<Rgba> {
    let caps = OKLCH_FUNCTION.captures(value.trim())?;

    let mut lightness: f64 = caps.get(1)?.as_str().parse().ok()?;
    if !caps.get(2)?.as_str().is_empty() {
        lightness /= 100.0;
    }
    let chroma: f64 = caps.get(3)?.as_str().parse().ok()?;
    let hue: f64 = caps.get(4)?.as_str().parse().ok()?;

    Some(oklch_to_rgba(lightness, chroma, hue))
}

/// Converts OKLCH coordinates to [`Rgba`].
///
/// Goes through OKLab and LMS into linear RGB and clamps each channel to
/// `0..=1`. No sRGB transfer function is applied to the result. Alpha is
/// always `1.0`.
pub fn oklch_to_rgba(lightness: f64, chroma: f64, hue_degrees: f64) -> Rgba {
    let hue = hue_degrees.to_radians();
    let a = chroma * hue.cos();
    let b = chroma * hue.sin();

    // OKLab -> LMS'
    let l_ = lightness + 0.3963377774 * a + 0.2158037573 * b;
    let m_ = lightness - 0.1055613458 * a - 0.0638541728 * b;
    let s_ = lightness - 0.0894841775 * a - 1.2914855480 * b;

    let l = l_.powi(3);
    let m = m_.powi(3);
    let s = s_.powi(3);

    // LMS -> linear RGB
    let red = 4.0767416621 * l - 3.3077115913 * m + 0.2309699292 * s;
    let green = -1.2684380046 * l + 2.6097574011 * m - 0.3413193965 * s;
    let blue = -0.0041960863 * l - 0.7034186147 * m + 1.7076147010 * s;

    Rgba::new(
        red.clamp(0.0, 1.0),
        green.clamp(0.0, 1.0),
        blue.clamp(0.0, 1.0),
        1.0,
    )
}
