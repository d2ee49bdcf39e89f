//! Property channels.
//!
//! A channel is a named set of typed properties on the configuration bus
//! (`xsettings`, `xfwm4`, ...). Dialogs read and write properties through the
//! [`Channel`] trait and react to [`PropertyChange`] notifications.

mod memory;
mod store;

pub use memory::MemoryChannel;
pub use store::ChannelStore;

use std::sync::mpsc::Receiver;

use blsettings_types::error::Result;
use blsettings_types::{PropertyName, PropertyValue};

/// Name of the channel holding XSettings properties.
pub const XSETTINGS_CHANNEL: &str = "xsettings";

/// A property was set or reset on a channel.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyChange {
    /// Channel the property belongs to.
    pub channel: String,
    pub property: PropertyName,
    /// New value, or `None` when the property was reset.
    pub value: Option<PropertyValue>,
}

/// Abstraction over a configuration channel.
pub trait Channel {
    /// Channel name.
    fn name(&self) -> &str;

    /// Current value of `property`.
    fn get(&self, property: &PropertyName) -> Option<PropertyValue>;

    /// Store `value` under `property`.
    fn set(&mut self, property: &PropertyName, value: PropertyValue) -> Result<()>;

    /// Remove `property`. Returns whether it existed.
    fn reset(&mut self, property: &PropertyName) -> Result<bool>;

    /// All property names, sorted.
    fn properties(&self) -> Vec<PropertyName>;

    /// Receive a notification for every subsequent change.
    fn subscribe(&mut self) -> Receiver<PropertyChange>;

    fn has_property(&self, property: &PropertyName) -> bool {
        self.get(property).is_some()
    }

    /// String value of `property`, or `default` when the name is invalid,
    /// unset, or holds another type.
    fn get_string(&self, property: &str, default: &str) -> String {
        lookup(self, property)
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_else(|| default.to_string())
    }

    /// Integer value of `property`; any integer type that fits in `i32`.
    fn get_int(&self, property: &str, default: i32) -> i32 {
        lookup(self, property)
            .and_then(|v| v.as_i32())
            .unwrap_or(default)
    }

    fn get_bool(&self, property: &str, default: bool) -> bool {
        lookup(self, property)
            .and_then(|v| v.as_bool())
            .unwrap_or(default)
    }

    fn set_string(&mut self, property: &str, value: &str) -> Result<()> {
        let name = PropertyName::new(property)?;
        self.set(&name, PropertyValue::String(value.to_string()))
    }

    fn set_int(&mut self, property: &str, value: i32) -> Result<()> {
        let name = PropertyName::new(property)?;
        self.set(&name, PropertyValue::Int(value))
    }

    fn set_bool(&mut self, property: &str, value: bool) -> Result<()> {
        let name = PropertyName::new(property)?;
        self.set(&name, PropertyValue::Bool(value))
    }
}

impl<C: Channel + ?Sized> Channel for &mut C {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn get(&self, property: &PropertyName) -> Option<PropertyValue> {
        (**self).get(property)
    }

    fn set(&mut self, property: &PropertyName, value: PropertyValue) -> Result<()> {
        (**self).set(property, value)
    }

    fn reset(&mut self, property: &PropertyName) -> Result<bool> {
        (**self).reset(property)
    }

    fn properties(&self) -> Vec<PropertyName> {
        (**self).properties()
    }

    fn subscribe(&mut self) -> Receiver<PropertyChange> {
        (**self).subscribe()
    }
}

fn lookup<C: Channel + ?Sized>(channel: &C, property: &str) -> Option<PropertyValue> {
    let name = PropertyName::new(property).ok()?;
    channel.get(&name)
}
