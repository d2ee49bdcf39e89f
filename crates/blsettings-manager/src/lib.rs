//! Settings manager.
//!
//! The searchable overview of every settings dialog, grouped by category.

pub mod index;

pub use index::{Category, ReturnAction, SettingsIndex, SettingsItem, VisibleCategory};
