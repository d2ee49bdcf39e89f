//! In-memory channel implementation.
//!
//! Backs the command-line tool and every test. Properties live in a
//! `BTreeMap` so listings come out sorted.

use std::collections::BTreeMap;
use std::sync::mpsc::{self, Receiver, Sender};

use serde::{Deserialize, Serialize};

use blsettings_types::error::Result;
use blsettings_types::{PropertyName, PropertyValue};

use crate::{Channel, PropertyChange};

/// A channel whose properties live entirely in memory.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct MemoryChannel {
    name: String,
    properties: BTreeMap<PropertyName, PropertyValue>,
    #[serde(skip)]
    subscribers: Vec<Sender<PropertyChange>>,
}

impl MemoryChannel {
    /// Create an empty channel.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: BTreeMap::new(),
            subscribers: Vec::new(),
        }
    }

    /// Number of stored properties.
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Iterate over `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&PropertyName, &PropertyValue)> {
        self.properties.iter()
    }

    /// Properties under a `/`-terminated prefix or equal to a full name.
    pub fn properties_under(&self, prefix: &str) -> Vec<PropertyName> {
        self.properties
            .keys()
            .filter(|name| name.is_under(prefix))
            .cloned()
            .collect()
    }

    pub(crate) fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    /// Deliver `change` to every live subscriber, dropping closed ones.
    fn notify(&mut self, change: PropertyChange) {
        self.subscribers.retain(|tx| tx.send(change.clone()).is_ok());
    }
}

impl Channel for MemoryChannel {
    fn name(&self) -> &str {
        &self.name
    }

    fn get(&self, property: &PropertyName) -> Option<PropertyValue> {
        self.properties.get(property).cloned()
    }

    fn set(&mut self, property: &PropertyName, value: PropertyValue) -> Result<()> {
        if self.properties.get(property) == Some(&value) {
            return Ok(());
        }
        log::debug!("{}: {property} = {value}", self.name);
        self.properties.insert(property.clone(), value.clone());
        self.notify(PropertyChange {
            channel: self.name.clone(),
            property: property.clone(),
            value: Some(value),
        });
        Ok(())
    }

    fn reset(&mut self, property: &PropertyName) -> Result<bool> {
        if self.properties.remove(property).is_none() {
            return Ok(false);
        }
        log::debug!("{}: {property} reset", self.name);
        self.notify(PropertyChange {
            channel: self.name.clone(),
            property: property.clone(),
            value: None,
        });
        Ok(true)
    }

    fn properties(&self) -> Vec<PropertyName> {
        self.properties.keys().cloned().collect()
    }

    fn subscribe(&mut self) -> Receiver<PropertyChange> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }
}
