//! JSON snapshot of a set of channels.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use blsettings_types::error::{BlsettingsError, Result};

use crate::MemoryChannel;

/// Named in-memory channels persisted as one JSON document.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ChannelStore {
    channels: BTreeMap<String, MemoryChannel>,
}

impl ChannelStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a store from `path`. A missing file yields an empty store.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No channel store at {}, starting empty", path.display());
            return Ok(Self::new());
        }
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Parse a store from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        let mut store: Self = serde_json::from_str(text)?;
        // The map key is authoritative for each channel's name.
        for (name, channel) in &mut store.channels {
            channel.set_name(name);
        }
        Ok(store)
    }

    /// Write the store to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text)?;
        log::debug!("Saved {} channel(s) to {}", self.channels.len(), path.display());
        Ok(())
    }

    /// Look up a channel by name.
    pub fn channel(&self, name: &str) -> Option<&MemoryChannel> {
        self.channels.get(name)
    }

    /// Channel `name`, created empty on first use.
    pub fn channel_mut(&mut self, name: &str) -> Result<&mut MemoryChannel> {
        if name.is_empty() || name.contains('/') {
            return Err(BlsettingsError::Channel(format!(
                "invalid channel name '{name}'"
            )));
        }
        Ok(self
            .channels
            .entry(name.to_string())
            .or_insert_with(|| MemoryChannel::new(name)))
    }

    /// Channel names in sorted order.
    pub fn channel_names(&self) -> Vec<&str> {
        self.channels.keys().map(String::as_str).collect()
    }
}
