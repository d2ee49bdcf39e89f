//! Settings editor models.
//!
//! The property dialog of the settings editor, without any toolkit: it
//! tracks the name entry, the type combo and the value fields, and writes
//! the result to a [`Channel`](blsettings_channel::Channel).

pub mod editor;

pub use editor::{EditMode, NameStatus, PropertyEditor, ValueField};
