//! 24-bit colour carried by the redraw stream

use serde::{Deserialize, Serialize};

/// An RGB colour
///
/// The editor sends colours as `0xRRGGBB` integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Decode a packed `0xRRGGBB` value
    ///
    /// Negative values are the editor's "use the default colour" marker and
    /// yield `None`.
    pub fn from_packed(value: i64) -> Option<Self> {
        if value < 0 {
            return None;
        }
        Some(Self {
            r: (value >> 16) as u8,
            g: (value >> 8) as u8,
            b: value as u8,
        })
    }

    /// Parse `#RRGGBB`
    pub fn parse_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#')?;
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Self { r, g, b })
    }

    /// Pack into an opaque ARGB pixel
    pub const fn to_pixel(self) -> u32 {
        0xFF00_0000 | ((self.r as u32) << 16) | ((self.g as u32) << 8) | (self.b as u32)
    }

    /// Unpack an ARGB pixel, ignoring alpha
    pub const fn from_pixel(pixel: u32) -> Self {
        Self {
            r: (pixel >> 16) as u8,
            g: (pixel >> 8) as u8,
            b: pixel as u8,
        }
    }
}
