//! 16-bit RGB colors and color-specification parsing.
//!
//! The display layer works with 16 bits per channel. Specifications are
//! either `#` followed by 1-4 hex digits per channel (`#rgb`, `#rrggbb`,
//! `#rrrgggbbb`, `#rrrrggggbbbb`) or an X11 color name.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color_names::X11_COLORS;

/// An RGB color with 16-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb16 {
    pub red: u16,
    pub green: u16,
    pub blue: u16,
}

impl Rgb16 {
    pub const WHITE: Self = Self::new(0xffff, 0xffff, 0xffff);
    pub const BLACK: Self = Self::new(0, 0, 0);

    pub const fn new(red: u16, green: u16, blue: u16) -> Self {
        Self { red, green, blue }
    }

    /// Widen 8-bit channels by byte replication (`0x12` becomes `0x1212`).
    pub const fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(
            (r as u16) << 8 | r as u16,
            (g as u16) << 8 | g as u16,
            (b as u16) << 8 | b as u16,
        )
    }

    /// High byte of each channel.
    pub const fn to_rgb8(self) -> (u8, u8, u8) {
        (
            (self.red >> 8) as u8,
            (self.green >> 8) as u8,
            (self.blue >> 8) as u8,
        )
    }

    /// `#rrggbb` rendering of [`to_rgb8`](Self::to_rgb8).
    pub fn to_hex(self) -> String {
        let (r, g, b) = self.to_rgb8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

impl Default for Rgb16 {
    fn default() -> Self {
        Self::WHITE
    }
}

impl fmt::Display for Rgb16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Parse a color specification. Returns `None` for anything malformed.
pub fn parse_color(spec: &str) -> Option<Rgb16> {
    match spec.strip_prefix('#') {
        Some(hex) => parse_hex(hex),
        None => named_color(spec),
    }
}

fn parse_hex(hex: &str) -> Option<Rgb16> {
    if !matches!(hex.len(), 3 | 6 | 9 | 12) || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let digits = hex.len() / 3;
    let channel = |i: usize| -> Option<u16> {
        let raw = u16::from_str_radix(&hex[i * digits..(i + 1) * digits], 16).ok()?;
        Some(scale_channel(raw, digits as u32 * 4))
    };
    Some(Rgb16::new(channel(0)?, channel(1)?, channel(2)?))
}

/// Scale a `bits`-wide channel to 16 bits by repeating its bit pattern.
fn scale_channel(raw: u16, bits: u32) -> u16 {
    let mut value = u32::from(raw) << (16 - bits);
    let mut filled = bits;
    while filled < 16 {
        value |= value >> filled;
        filled *= 2;
    }
    (value & 0xffff) as u16
}

/// Look up an X11 color name. Matching ignores case and spaces, so
/// `Light Blue` and `lightblue` are the same color.
fn named_color(name: &str) -> Option<Rgb16> {
    let key: String = name
        .chars()
        .filter(|c| *c != ' ')
        .map(|c| c.to_ascii_lowercase())
        .collect();
    if let Some(level) = gray_level(&key) {
        return Some(Rgb16::from_rgb8(level, level, level));
    }
    let idx = X11_COLORS
        .binary_search_by(|(name, _)| (*name).cmp(key.as_str()))
        .ok()?;
    let [r, g, b] = X11_COLORS[idx].1;
    Some(Rgb16::from_rgb8(r, g, b))
}

/// `gray0` through `gray100` (either spelling), as a percentage of white.
fn gray_level(key: &str) -> Option<u8> {
    let digits = key
        .strip_prefix("gray")
        .or_else(|| key.strip_prefix("grey"))?;
    if digits.is_empty()
        || !digits.bytes().all(|b| b.is_ascii_digit())
        || (digits.len() > 1 && digits.starts_with('0'))
    {
        return None;
    }
    let percent: u8 = digits.parse().ok()?;
    (percent <= 100).then(|| (f64::from(percent) * 2.55 + 0.5) as u8)
}
