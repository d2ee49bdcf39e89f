//! Foundation types for blade-settings.
//!
//! This crate contains the service-agnostic types shared by every
//! blade-settings crate: validated property names, typed property values,
//! 16-bit colors, debug domains and the error type.

pub mod color;
mod color_names;
pub mod debug;
pub mod error;
pub mod property;
pub mod value;

pub use color::{Rgb16, parse_color};
pub use debug::DebugDomains;
pub use error::{BlsettingsError, Result};
pub use property::{InvalidPropertyReason, PropertyName, validate, validate_optional};
pub use value::{PropertyValue, ValueType};
