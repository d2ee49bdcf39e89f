//! XSettings controls of the appearance dialog.
//!
//! Every control maps onto one or two properties of the `xsettings`
//! channel. [`AppearanceSettings`] wraps a [`Channel`] and performs those
//! writes, including the coupled ones (hinting, DPI, event sounds).

use std::fmt;

use blsettings_channel::Channel;
use blsettings_types::error::Result;

use crate::rc::decode_rc;
use crate::scheme::DecodedScheme;

pub const THEME_NAME: &str = "/Net/ThemeName";
pub const ICON_THEME_NAME: &str = "/Net/IconThemeName";
pub const TOOLBAR_STYLE: &str = "/Gtk/ToolbarStyle";
pub const CAN_CHANGE_ACCELS: &str = "/Gtk/CanChangeAccels";
pub const MENU_IMAGES: &str = "/Gtk/MenuImages";
pub const BUTTON_IMAGES: &str = "/Gtk/ButtonImages";
pub const FONT_NAME: &str = "/Gtk/FontName";
pub const MONOSPACE_FONT_NAME: &str = "/Gtk/MonospaceFontName";
pub const EVENT_SOUNDS: &str = "/Net/EnableEventSounds";
pub const INPUT_FEEDBACK_SOUNDS: &str = "/Net/EnableInputFeedbackSounds";
pub const ANTIALIAS: &str = "/Xft/Antialias";
pub const HINTING: &str = "/Xft/Hinting";
pub const HINT_STYLE: &str = "/Xft/HintStyle";
pub const RGBA: &str = "/Xft/RGBA";
pub const DPI: &str = "/Xft/DPI";
pub const LAST_CUSTOM_DPI: &str = "/Xfce/LastCustomDPI";

/// DPI used when the screen does not report its physical size.
pub const FALLBACK_DPI: i32 = 96;

/// Combo-box backed enumerations: wire string plus position in the combo.
macro_rules! combo_enum {
    (
        $(#[$meta:meta])*
        $name:ident, default $default:ident {
            $($variant:ident => $wire:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $(
                #[doc = concat!("`", $wire, "`")]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Value stored in the channel.
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $wire,)+
                }
            }

            /// Parse a stored value; `None` when unknown.
            pub fn from_name(name: &str) -> Option<Self> {
                Self::ALL.iter().copied().find(|v| v.as_str() == name)
            }

            /// Position in the combo box.
            pub fn index(self) -> i32 {
                self as i32
            }

            /// Combo position to value, clamped into range.
            pub fn from_index(index: i32) -> Self {
                let last = Self::ALL.len() as i32 - 1;
                Self::ALL[index.clamp(0, last) as usize]
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }
    };
}

combo_enum! {
    /// Toolbar button layout.
    ToolbarStyle, default Both {
        Icons => "icons",
        Text => "text",
        Both => "both",
        BothHoriz => "both-horiz",
    }
}

combo_enum! {
    /// Font hinting strength.
    HintStyle, default None {
        None => "hintnone",
        Slight => "hintslight",
        Medium => "hintmedium",
        Full => "hintfull",
    }
}

combo_enum! {
    /// Subpixel geometry for font antialiasing.
    SubpixelOrder, default None {
        None => "none",
        Rgb => "rgb",
        Bgr => "bgr",
        Vrgb => "vrgb",
        Vbgr => "vbgr",
    }
}

/// Screen size in pixels and millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScreenGeometry {
    pub width_px: u32,
    pub height_px: u32,
    pub width_mm: u32,
    pub height_mm: u32,
}

impl ScreenGeometry {
    pub fn new(width_px: u32, height_px: u32, width_mm: u32, height_mm: u32) -> Self {
        Self {
            width_px,
            height_px,
            width_mm,
            height_mm,
        }
    }
}

/// DPI of `screen`, or [`FALLBACK_DPI`] when a physical size is unknown.
pub fn compute_dpi(screen: ScreenGeometry) -> i32 {
    if screen.width_mm == 0 || screen.height_mm == 0 {
        return FALLBACK_DPI;
    }
    let horizontal = 25.4 * f64::from(screen.width_px) / f64::from(screen.width_mm);
    let vertical = 25.4 * f64::from(screen.height_px) / f64::from(screen.height_mm);
    horizontal.min(vertical) as i32
}

/// State of the custom-DPI checkbox and spin button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DpiState {
    pub custom_enabled: bool,
    pub spin_value: i32,
}

/// Appearance controls over an `xsettings` channel.
pub struct AppearanceSettings<C: Channel> {
    channel: C,
}

impl<C: Channel> AppearanceSettings<C> {
    pub fn new(channel: C) -> Self {
        Self { channel }
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    pub fn channel_mut(&mut self) -> &mut C {
        &mut self.channel
    }

    pub fn into_inner(self) -> C {
        self.channel
    }

    // -- Themes --------------------------------------------------------------

    pub fn theme_name(&self) -> String {
        self.channel.get_string(THEME_NAME, "Default")
    }

    pub fn set_theme_name(&mut self, name: &str) -> Result<()> {
        self.channel.set_string(THEME_NAME, name)
    }

    pub fn icon_theme_name(&self) -> String {
        self.channel.get_string(ICON_THEME_NAME, "Rodent")
    }

    pub fn set_icon_theme_name(&mut self, name: &str) -> Result<()> {
        self.channel.set_string(ICON_THEME_NAME, name)
    }

    /// Preview colors of a theme from its RC source.
    pub fn scheme_for_rc(&self, source: &str) -> DecodedScheme {
        decode_rc(source)
    }

    // -- Toolbar -------------------------------------------------------------

    pub fn toolbar_style(&self) -> ToolbarStyle {
        let stored = self.channel.get_string(TOOLBAR_STYLE, ToolbarStyle::default().as_str());
        ToolbarStyle::from_name(&stored).unwrap_or_default()
    }

    pub fn set_toolbar_style(&mut self, style: ToolbarStyle) -> Result<()> {
        self.channel.set_string(TOOLBAR_STYLE, style.as_str())
    }

    // -- Fonts ---------------------------------------------------------------

    pub fn font_name(&self) -> String {
        self.channel.get_string(FONT_NAME, "Sans 10")
    }

    pub fn set_font_name(&mut self, font: &str) -> Result<()> {
        self.channel.set_string(FONT_NAME, font)
    }

    pub fn monospace_font_name(&self) -> String {
        self.channel.get_string(MONOSPACE_FONT_NAME, "Monospace 10")
    }

    pub fn set_monospace_font_name(&mut self, font: &str) -> Result<()> {
        self.channel.set_string(MONOSPACE_FONT_NAME, font)
    }

    /// `None` when the stored value is neither 0 nor 1.
    pub fn antialias(&self) -> Option<bool> {
        match self.channel.get_int(ANTIALIAS, -1) {
            1 => Some(true),
            0 => Some(false),
            _ => None,
        }
    }

    pub fn set_antialias(&mut self, enabled: bool) -> Result<()> {
        self.channel.set_int(ANTIALIAS, i32::from(enabled))
    }

    pub fn hint_style(&self) -> HintStyle {
        let stored = self.channel.get_string(HINT_STYLE, HintStyle::default().as_str());
        HintStyle::from_name(&stored).unwrap_or_default()
    }

    /// Writes the style and turns hinting off for `hintnone`.
    pub fn set_hint_style(&mut self, style: HintStyle) -> Result<()> {
        self.channel.set_string(HINT_STYLE, style.as_str())?;
        self.channel
            .set_int(HINTING, i32::from(style != HintStyle::None))
    }

    pub fn subpixel_order(&self) -> SubpixelOrder {
        let stored = self.channel.get_string(RGBA, SubpixelOrder::default().as_str());
        SubpixelOrder::from_name(&stored).unwrap_or_default()
    }

    pub fn set_subpixel_order(&mut self, order: SubpixelOrder) -> Result<()> {
        self.channel.set_string(RGBA, order.as_str())
    }

    // -- DPI -----------------------------------------------------------------

    fn last_custom_dpi(&self) -> i32 {
        self.channel.get_int(LAST_CUSTOM_DPI, -1)
    }

    /// Checkbox and spin-button state for the current `/Xft/DPI`.
    ///
    /// An unset `/Xft/DPI` reads as [`FALLBACK_DPI`], so the checkbox starts
    /// enabled. The screen's DPI stands in for a last custom value of `-1`.
    pub fn dpi_state(&self, screen: ScreenGeometry) -> DpiState {
        let dpi = self.channel.get_int(DPI, FALLBACK_DPI);
        let spin_value = if dpi > 0 {
            dpi
        } else {
            match self.last_custom_dpi() {
                -1 => compute_dpi(screen),
                last => last,
            }
        };
        DpiState {
            custom_enabled: dpi >= 0,
            spin_value,
        }
    }

    /// Restore the last custom DPI, or the screen's when none is known, and
    /// apply it.
    pub fn enable_custom_dpi(&mut self, screen: ScreenGeometry) -> Result<i32> {
        let dpi = match self.last_custom_dpi() {
            last if last <= 0 => compute_dpi(screen),
            last => last,
        };
        log::debug!("Custom DPI enabled at {dpi}");
        self.channel.set_int(DPI, dpi)?;
        Ok(dpi)
    }

    /// Remember `current` and let the session pick the DPI.
    pub fn disable_custom_dpi(&mut self, current: i32) -> Result<()> {
        self.channel.set_int(LAST_CUSTOM_DPI, current)?;
        self.channel.set_int(DPI, -1)
    }

    pub fn set_custom_dpi(&mut self, dpi: i32, custom_enabled: bool) -> Result<()> {
        if custom_enabled {
            self.channel.set_int(LAST_CUSTOM_DPI, dpi)?;
        }
        self.channel.set_int(DPI, dpi)
    }

    // -- Toggles -------------------------------------------------------------

    pub fn can_change_accels(&self) -> bool {
        self.channel.get_bool(CAN_CHANGE_ACCELS, false)
    }

    pub fn set_can_change_accels(&mut self, enabled: bool) -> Result<()> {
        self.channel.set_bool(CAN_CHANGE_ACCELS, enabled)
    }

    pub fn menu_images(&self) -> bool {
        self.channel.get_bool(MENU_IMAGES, true)
    }

    pub fn set_menu_images(&mut self, enabled: bool) -> Result<()> {
        self.channel.set_bool(MENU_IMAGES, enabled)
    }

    pub fn button_images(&self) -> bool {
        self.channel.get_bool(BUTTON_IMAGES, true)
    }

    pub fn set_button_images(&mut self, enabled: bool) -> Result<()> {
        self.channel.set_bool(BUTTON_IMAGES, enabled)
    }

    pub fn event_sounds(&self) -> bool {
        self.channel.get_bool(EVENT_SOUNDS, true)
    }

    /// Input feedback sounds depend on event sounds and are switched off with
    /// them.
    pub fn set_event_sounds(&mut self, enabled: bool) -> Result<()> {
        self.channel.set_bool(EVENT_SOUNDS, enabled)?;
        if !enabled {
            self.channel.set_bool(INPUT_FEEDBACK_SOUNDS, false)?;
        }
        Ok(())
    }

    pub fn input_feedback_sounds(&self) -> bool {
        self.channel.get_bool(INPUT_FEEDBACK_SOUNDS, false)
    }

    pub fn set_input_feedback_sounds(&mut self, enabled: bool) -> Result<()> {
        self.channel.set_bool(INPUT_FEEDBACK_SOUNDS, enabled)
    }
}
