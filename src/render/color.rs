//! RGB colors: parsing, shape-checked conversion, terminal palette mapping.

use crate::error::{Error, Result};

/// A 24-bit color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    /// Create a color from channels.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a color string.
    ///
    /// Supports:
    /// - Hex colors: `#rrggbb` or `#rgb`
    /// - Named colors: `black`, `red`, `green`, `yellow`, `blue`, `magenta`, `cyan`, `white`,
    ///   `dark_red`, `dark_green`, `dark_yellow`, `dark_blue`, `dark_magenta`, `dark_cyan`,
    ///   `dark_grey`/`dark_gray`, `grey`/`gray`
    ///
    /// Returns `None` if the color string cannot be parsed.
    pub fn parse(s: &str) -> Option<Rgb> {
        let s = s.trim();

        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex);
        }

        // Named colors (case-insensitive)
        let rgb = match s.to_ascii_lowercase().as_str() {
            "black" => Rgb::new(0, 0, 0),
            "red" => Rgb::new(255, 0, 0),
            "green" => Rgb::new(0, 255, 0),
            "yellow" => Rgb::new(255, 255, 0),
            "blue" => Rgb::new(0, 0, 255),
            "magenta" => Rgb::new(255, 0, 255),
            "cyan" => Rgb::new(0, 255, 255),
            "white" => Rgb::new(255, 255, 255),
            "dark_red" | "darkred" => Rgb::new(128, 0, 0),
            "dark_green" | "darkgreen" => Rgb::new(0, 128, 0),
            "dark_yellow" | "darkyellow" => Rgb::new(128, 128, 0),
            "dark_blue" | "darkblue" => Rgb::new(0, 0, 128),
            "dark_magenta" | "darkmagenta" => Rgb::new(128, 0, 128),
            "dark_cyan" | "darkcyan" => Rgb::new(0, 128, 128),
            "dark_grey" | "dark_gray" | "darkgrey" | "darkgray" => Rgb::new(128, 128, 128),
            "grey" | "gray" => Rgb::new(192, 192, 192),
            _ => return None,
        };
        Some(rgb)
    }

    /// Parse a color string, or fall back to `default`.
    pub fn parse_or(s: Option<&str>, default: Rgb) -> Rgb {
        s.and_then(Rgb::parse).unwrap_or(default)
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Rgb::new(r, g, b)
    }
}

/// Parse a hex color string (without the leading `#`).
fn parse_hex(hex: &str) -> Option<Rgb> {
    if !hex.is_ascii() {
        return None;
    }
    match hex.len() {
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Rgb::new(r, g, b))
        }
        3 => {
            let r = u8::from_str_radix(&hex[0..1], 16).ok()?;
            let g = u8::from_str_radix(&hex[1..2], 16).ok()?;
            let b = u8::from_str_radix(&hex[2..3], 16).ok()?;
            // Expand: 0xA -> 0xAA
            Some(Rgb::new(r * 17, g * 17, b * 17))
        }
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// IntoRgb
// ---------------------------------------------------------------------------

/// Color arguments accepted by [`Canvas::set_color_fg`](super::canvas::Canvas::set_color_fg).
///
/// Either one 3-tuple or three channels. Anything else, including channels
/// outside `0..=255`, is an [`Error::InvalidColor`].
pub trait IntoRgb {
    fn into_rgb(self) -> Result<Rgb>;
}

impl IntoRgb for Rgb {
    fn into_rgb(self) -> Result<Rgb> {
        Ok(self)
    }
}

impl IntoRgb for (u8, u8, u8) {
    fn into_rgb(self) -> Result<Rgb> {
        Ok(self.into())
    }
}

impl IntoRgb for (i32, i32, i32) {
    fn into_rgb(self) -> Result<Rgb> {
        channels(&[self.0, self.1, self.2])
    }
}

impl IntoRgb for [i32; 3] {
    fn into_rgb(self) -> Result<Rgb> {
        channels(&self)
    }
}

impl IntoRgb for &[i32] {
    fn into_rgb(self) -> Result<Rgb> {
        channels(self)
    }
}

fn channels(values: &[i32]) -> Result<Rgb> {
    let [r, g, b] = values else {
        return Err(Error::InvalidColor(format!("expected 3 channels, got {values:?}")));
    };
    let channel = |v: i32| u8::try_from(v).map_err(|_| Error::InvalidColor(format!("channel out of range in {values:?}")));
    Ok(Rgb::new(channel(*r)?, channel(*g)?, channel(*b)?))
}

// ---------------------------------------------------------------------------
// Palette mapping
// ---------------------------------------------------------------------------

/// Map a color onto the 6x6x6 cube of the 256-color palette.
pub fn rgb_to_ansi256(color: Rgb) -> u8 {
    let level = |c: u8| (f32::from(c) / 51.0).round() as u8;
    16 + 36 * level(color.r) + 6 * level(color.g) + level(color.b)
}

// ===========================================================================
// Tests
// ===========================================================================
