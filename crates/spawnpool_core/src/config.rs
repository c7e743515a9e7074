//! # Pool Configuration
//!
//! Startup settings for a pool, loaded once from TOML:
//!
//! ```toml
//! name = "bullets"
//! initial_capacity = 256
//! start_buffered = true
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{PoolError, PoolResult};

/// Configuration for a pool.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PoolConfig {
    /// Name attached to the pool's log events.
    pub name: String,
    /// Slots constructed up front, so the first spawns don't grow.
    pub initial_capacity: usize,
    /// Start with deferred release enabled.
    pub start_buffered: bool,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            name: String::from("pool"),
            initial_capacity: 0,
            start_buffered: false,
        }
    }
}

impl PoolConfig {
    /// Config that pre-warms `capacity` slots.
    #[must_use]
    pub fn prewarmed(capacity: usize) -> Self {
        Self {
            initial_capacity: capacity,
            ..Self::default()
        }
    }

    /// Sets the pool name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Enables deferred release from the start.
    #[must_use]
    pub const fn buffered(mut self) -> Self {
        self.start_buffered = true;
        self
    }

    /// Parses a config from a TOML document.
    ///
    /// Missing keys take their default value.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidConfig`] if the document is not valid
    /// TOML or contains unknown keys or mistyped values.
    pub fn from_toml_str(source: &str) -> PoolResult<Self> {
        toml::from_str(source).map_err(|e| PoolError::InvalidConfig(e.to_string()))
    }

    /// Serializes the config as TOML.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::InvalidConfig`] if serialization fails.
    pub fn to_toml_string(&self) -> PoolResult<String> {
        toml::to_string(self).map_err(|e| PoolError::InvalidConfig(e.to_string()))
    }
}
