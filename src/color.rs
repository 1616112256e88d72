//! Color parsing utilities for CSS color strings
//!
//! Supports the following formats, tried in this order:
//! - Hex shorthand: `#RGB`, `#RGBA`
//! - Hex long: `#RRGGBB`, `#RRGGBBAA`
//! - Functional: `rgb(r, g, b)`, `rgba(r, g, b, a)`
//! - Named: `red`, `rebeccapurple`, `transparent`, etc.

use std::sync::OnceLock;

use image::Rgba;
use regex::Regex;
use thiserror::Error;

use crate::named_colors;

/// Fully transparent black, the color of every unset cell.
pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Error type for color parsing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    /// Input matched none of the accepted grammars, or a component was out of range
    #[error("malformed color '{input}': {reason}")]
    Malformed { input: String, reason: &'static str },
}

impl ColorError {
    fn malformed(input: &str, reason: &'static str) -> Self {
        ColorError::Malformed { input: input.to_string(), reason }
    }
}

/// Parse a CSS color string into an RGBA color.
///
/// # Supported Formats
///
/// ## Hex Colors
/// - `#RGB` - 3-digit hex, each digit is doubled (e.g., `#F00` -> red)
/// - `#RGBA` - 4-digit hex, each digit is doubled
/// - `#RRGGBB` - 6-digit hex, alpha defaults to 255 (opaque)
/// - `#RRGGBBAA` - 8-digit hex, explicit alpha channel
///
/// ## Functional Notation
/// - `rgb(255, 0, 0)` - channels are integers (or integer-valued decimals) in 0..=255
/// - `rgba(0, 128, 255, 0.5)` - alpha is a decimal in 0..=1, scaled by 255 and rounded
///
/// ## Named Colors
/// - The CSS named colors, matched case-insensitively. `transparent` is `[0, 0, 0, 0]`.
///
/// # Examples
///
/// ```
/// use sketchgrid::color::parse_color;
///
/// let red = parse_color("#F00").unwrap();
/// assert_eq!(red, image::Rgba([255, 0, 0, 255]));
///
/// let half = parse_color("rgba(0, 128, 255, 0.5)").unwrap();
/// assert_eq!(half, image::Rgba([0, 128, 255, 128]));
///
/// let blue = parse_color("Blue").unwrap();
/// assert_eq!(blue, image::Rgba([0, 0, 255, 255]));
/// ```
///
/// # Errors
///
/// Returns `ColorError::Malformed` if the input is not a recognized color.
pub fn parse_color(s: &str) -> Result<Rgba<u8>, ColorError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(ColorError::malformed(s, "empty color string"));
    }

    if let Some(hex) = trimmed.strip_prefix('#') {
        return parse_hex_color(s, hex);
    }

    let lower = trimmed.to_ascii_lowercase();
    if let Some(color) = parse_functional(s, &lower)? {
        return Ok(color);
    }

    if lower == "transparent" {
        return Ok(TRANSPARENT);
    }

    named_colors::lookup(&lower).ok_or_else(|| ColorError::malformed(s, "unknown color name"))
}

/// Parse a color, falling back to transparent when the text is not a color.
///
/// Unset and unparseable colors look the same downstream, so a bad value never
/// aborts an export.
pub fn parse_color_lenient(s: &str) -> Rgba<u8> {
    match parse_color(s) {
        Ok(color) => color,
        Err(e) => {
            log::warn!("{}; using transparent", e);
            TRANSPARENT
        }
    }
}

/// Format a color as lowercase `#rrggbbaa`.
pub fn to_hex(color: Rgba<u8>) -> String {
    let [r, g, b, a] = color.0;
    format!("#{:02x}{:02x}{:02x}{:02x}", r, g, b, a)
}

/// Parse the digits after '#'.
fn parse_hex_color(input: &str, hex: &str) -> Result<Rgba<u8>, ColorError> {
    let digits = hex
        .bytes()
        .map(hex_value)
        .collect::<Option<Vec<u8>>>()
        .ok_or_else(|| ColorError::malformed(input, "invalid hex digit"))?;

    match digits[..] {
        // Shorthand: each digit is doubled, so 0xF becomes 0xFF
        [r, g, b] => Ok(Rgba([r * 17, g * 17, b * 17, 255])),
        [r, g, b, a] => Ok(Rgba([r * 17, g * 17, b * 17, a * 17])),
        [r1, r0, g1, g0, b1, b0] => Ok(Rgba([r1 << 4 | r0, g1 << 4 | g0, b1 << 4 | b0, 255])),
        [r1, r0, g1, g0, b1, b0, a1, a0] => {
            Ok(Rgba([r1 << 4 | r0, g1 << 4 | g0, b1 << 4 | b0, a1 << 4 | a0]))
        }
        _ => Err(ColorError::malformed(input, "expected 3, 4, 6, or 8 hex digits")),
    }
}

/// Value of a single hex digit (0-9, A-F, a-f)
fn hex_value(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

fn functional_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(rgba?)\s*\((.*)\)$").expect("functional color regex is valid")
    })
}

fn number_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[+-]?(\d+(\.\d*)?|\.\d+)$").expect("color component regex is valid")
    })
}

/// Parse `rgb(...)` / `rgba(...)`.
///
/// Returns `Ok(None)` when the text is not functional notation at all, so the
/// caller can move on to named colors.
fn parse_functional(input: &str, lower: &str) -> Result<Option<Rgba<u8>>, ColorError> {
    let Some(caps) = functional_regex().captures(lower) else {
        return Ok(None);
    };

    let has_alpha = &caps[1] == "rgba";
    let args: Vec<&str> = caps[2].split(',').map(str::trim).collect();
    let expected = if has_alpha { 4 } else { 3 };
    if args.len() != expected {
        return Err(ColorError::malformed(input, "wrong number of color components"));
    }

    let r = parse_channel(input, args[0])?;
    let g = parse_channel(input, args[1])?;
    let b = parse_channel(input, args[2])?;
    let a = if has_alpha { parse_alpha(input, args[3])? } else { 255 };

    Ok(Some(Rgba([r, g, b, a])))
}

fn parse_number(input: &str, text: &str) -> Result<f64, ColorError> {
    if !number_regex().is_match(text) {
        return Err(ColorError::malformed(input, "color component is not a number"));
    }
    text.parse::<f64>()
        .map_err(|_| ColorError::malformed(input, "color component is not a number"))
}

/// An r/g/b channel: integer-valued, 0..=255.
fn parse_channel(input: &str, text: &str) -> Result<u8, ColorError> {
    let value = parse_number(input, text)?;
    if value.fract() != 0.0 {
        return Err(ColorError::malformed(input, "color channel must be an integer"));
    }
    if !(0.0..=255.0).contains(&value) {
        return Err(ColorError::malformed(input, "color channel out of range 0-255"));
    }
    Ok(value as u8)
}

/// The alpha channel: decimal 0..=1, scaled to 0..=255.
fn parse_alpha(input: &str, text: &str) -> Result<u8, ColorError> {
    let value = parse_number(input, text)?;
    if !(0.0..=1.0).contains(&value) {
        return Err(ColorError::malformed(input, "alpha out of range 0-1"));
    }
    Ok((value * 255.0).round() as u8)
}
