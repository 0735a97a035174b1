//! Display colors
//!
//! Colors travel as `#rrggbb` strings (the presentation layer's format).
//! `Color` is the parsed value; inversion of an unparseable string falls
//! back to a fixed color instead of failing.

use std::fmt;
use std::str::FromStr;

/// Color used when an object's color can't be parsed for inversion
pub const FALLBACK_INVERTED_COLOR: &str = "#22d3ee";

/// Display color of an interactable object without an explicit color
pub const DEFAULT_INTERACTABLE_COLOR: &str = "#f59e0b";

/// Display color of a static object without an explicit color
pub const DEFAULT_STATIC_COLOR: &str = "#60a5fa";

/// RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb`, `#rgb`, or the same without `#` (case-insensitive)
    pub fn parse(value: &str) -> Option<Color> {
        let hex = value.strip_prefix('#').unwrap_or(value);
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }

        match hex.len() {
            6 => Some(Color {
                r: u8::from_str_radix(&hex[0..2], 16).ok()?,
                g: u8::from_str_radix(&hex[2..4], 16).ok()?,
                b: u8::from_str_radix(&hex[4..6], 16).ok()?,
            }),
            3 => {
                let digit = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok().map(|d| d * 17);
                Some(Color {
                    r: digit(0)?,
                    g: digit(1)?,
                    b: digit(2)?,
                })
            }
            _ => None,
        }
    }

    /// Channel-wise `255 - c`
    pub fn inverted(self) -> Color {
        Color {
            r: 255 - self.r,
            g: 255 - self.g,
            b: 255 - self.b,
        }
    }

    /// Lowercase `#rrggbb`
    pub fn to_hex(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Color::parse(s).ok_or(())
    }
}

/// Invert a hex color string, or return `fallback` if it doesn't parse
pub fn invert_hex_color(value: &str, fallback: &str) -> String {
    match Color::parse(value) {
        Some(color) => color.inverted().to_hex(),
        None => fallback.to_string(),
    }
}

/// Normalize a hex color string to lowercase `#rrggbb`
pub fn normalize_hex_color(value: &str) -> Option<String> {
    Color::parse(value).map(Color::to_hex)
}
