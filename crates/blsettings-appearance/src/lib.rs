//! Appearance settings.
//!
//! Color schemes decoded from theme resources, the RC-file color extractor
//! that feeds them, and the XSettings controls of the appearance dialog
//! (toolbar style, font rendering, DPI).

pub mod rc;
pub mod scheme;
pub mod xsettings;

pub use rc::{decode_rc, extract_scheme, extract_scheme_from_file};
pub use scheme::{ColorScheme, DecodedScheme, SchemeColor, decode};
pub use xsettings::{
    AppearanceSettings, DpiState, FALLBACK_DPI, HintStyle, ScreenGeometry, SubpixelOrder,
    ToolbarStyle, compute_dpi,
};
