//! Color-scheme strings.
//!
//! A scheme string is a list of `name:color` pairs separated by `;` (or by
//! newlines when no `;` appears), e.g.
//! `fg_color:#000000;bg_color:#ededed;selected_bg_color:#86abd9`.
//! Only three names matter to the theme preview; everything else is ignored.

use std::ops::Index;

use blsettings_types::{Rgb16, parse_color};

/// The symbolic colors a theme preview needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemeColor {
    Foreground,
    Background,
    SelectedBackground,
}

impl SchemeColor {
    pub const ALL: [SchemeColor; 3] = [
        SchemeColor::Foreground,
        SchemeColor::Background,
        SchemeColor::SelectedBackground,
    ];

    /// Key used in scheme strings.
    pub fn key(self) -> &'static str {
        match self {
            Self::Foreground => "fg_color",
            Self::Background => "bg_color",
            Self::SelectedBackground => "selected_bg_color",
        }
    }

    /// Exact, case-sensitive key lookup.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }

    fn slot(self) -> usize {
        self as usize
    }
}

/// One color per [`SchemeColor`], white unless set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorScheme {
    colors: [Rgb16; 3],
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            colors: [Rgb16::WHITE; 3],
        }
    }
}

impl ColorScheme {
    pub fn get(&self, which: SchemeColor) -> Rgb16 {
        self.colors[which.slot()]
    }

    pub fn set(&mut self, which: SchemeColor, color: Rgb16) {
        self.colors[which.slot()] = color;
    }

    pub fn foreground(&self) -> Rgb16 {
        self.get(SchemeColor::Foreground)
    }

    pub fn background(&self) -> Rgb16 {
        self.get(SchemeColor::Background)
    }

    pub fn selected_background(&self) -> Rgb16 {
        self.get(SchemeColor::SelectedBackground)
    }
}

impl Index<SchemeColor> for ColorScheme {
    type Output = Rgb16;

    fn index(&self, which: SchemeColor) -> &Rgb16 {
        &self.colors[which.slot()]
    }
}

/// Result of [`decode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecodedScheme {
    pub colors: ColorScheme,
    /// Whether at least one recognized color parsed successfully.
    pub any_found: bool,
}

/// Decode a scheme string.
///
/// Never fails: unknown names, entries without `:` and unparseable colors are
/// skipped, and their slots keep the white default.
pub fn decode(scheme: &str) -> DecodedScheme {
    let mut decoded = DecodedScheme::default();

    let delimiter = if scheme.contains(';') { ';' } else { '\n' };
    for entry in scheme.split(delimiter) {
        let Some((key, value)) = entry.split_once(':') else {
            continue;
        };
        let Some(which) = SchemeColor::from_key(key.trim()) else {
            continue;
        };
        if let Some(color) = parse_color(value.trim()) {
            decoded.colors.set(which, color);
            decoded.any_found = true;
        }
    }

    decoded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_is_all_white() {
        let d = decode("");
        assert!(!d.any_found);
        for c in SchemeColor::ALL {
            assert_eq!(d.colors.get(c), Rgb16::WHITE);
        }
    }

    #[test]
    fn semicolon_delimited() {
        let d = decode("fg_color:#112233;bg_color:#445566");
        assert!(d.any_found);
        assert_eq!(d.colors.foreground().to_rgb8(), (0x11, 0x22, 0x33));
        assert_eq!(d.colors.background().to_rgb8(), (0x44, 0x55, 0x66));
        assert_eq!(d.colors.selected_background(), Rgb16::WHITE);
    }

    #[test]
    fn newline_delimited() {
        let d = decode("bg_color:#000000\nselected_bg_color:#ffffff");
        assert!(d.any_found);
        assert_eq!(d.colors[SchemeColor::Background], Rgb16::BLACK);
        assert_eq!(d.colors[SchemeColor::SelectedBackground], Rgb16::WHITE);
        assert_eq!(d.colors[SchemeColor::Foreground], Rgb16::WHITE);
    }

    #[test]
    fn semicolon_wins_over_newline() {
        // With a ';' present the newline stays inside the first entry, so its
        // value is "#111111\nbg_color:#222222" and fails to parse.
        let d = decode("fg_color:#111111\nbg_color:#222222;selected_bg_color:#333333");
        assert_eq!(d.colors.foreground(), Rgb16::WHITE);
        assert_eq!(d.colors.selected_background().to_rgb8(), (0x33, 0x33, 0x33));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let d = decode("unknown_key:#ffffff");
        assert!(!d.any_found);
        assert_eq!(d, DecodedScheme::default());
    }

    #[test]
    fn keys_are_case_sensitive() {
        assert!(!decode("FG_COLOR:#000000").any_found);
    }

    #[test]
    fn whitespace_is_trimmed() {
        let d = decode("\n  fg_color : #010203 \n\tbg_color:\tblack\n");
        assert!(d.any_found);
        assert_eq!(d.colors.foreground().to_rgb8(), (1, 2, 3));
        assert_eq!(d.colors.background(), Rgb16::BLACK);
    }

    #[test]
    fn malformed_entries_are_skipped() {
        let d = decode("fg_color;bg_color:#zzzzzz;selected_bg_color:");
        assert!(!d.any_found);
        assert_eq!(d.colors, ColorScheme::default());
    }

    #[test]
    fn failed_parse_keeps_previous_value() {
        let d = decode("bg_color:#101010;bg_color:nonsense");
        assert!(d.any_found);
        assert_eq!(d.colors.background().to_rgb8(), (0x10, 0x10, 0x10));
    }

    #[test]
    fn later_entries_override() {
        let d = decode("fg_color:#000000;fg_color:#ffffff");
        assert_eq!(d.colors.foreground(), Rgb16::WHITE);
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn decode_is_deterministic(s in ".{0,80}") {
                prop_assert_eq!(decode(&s), decode(&s));
            }

            #[test]
            fn hex_entries_always_decode(r: u8, g: u8, b: u8) {
                let s = format!("selected_bg_color:#{r:02x}{g:02x}{b:02x}");
                let d = decode(&s);
                prop_assert!(d.any_found);
                prop_assert_eq!(d.colors.selected_background().to_rgb8(), (r, g, b));
            }
        }
    }
}
