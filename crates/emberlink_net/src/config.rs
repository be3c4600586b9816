//! # Runtime Configuration
//!
//! Startup-time settings for the replication layer, loaded from TOML once
//! and immutable afterward. Parse and validation failures are reported to
//! the operator before the server ever binds a socket.

use emberlink_core::{PoolConfig, DEFAULT_DIRTY_CAPACITY};
use serde::Deserialize;

use crate::error::ConfigError;

/// Replication-layer configuration.
///
/// ## Example
///
/// ```toml
/// dirty_capacity = 4096
///
/// [pool]
/// shards = 3
/// prewarm = 1000
/// writer_capacity = 1200
/// ```
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(default)]
pub struct NetConfig {
    /// Writer pool sizing.
    pub pool: PoolConfig,
    /// Initial dirty-set capacity for each new connection.
    pub dirty_capacity: usize,
}

impl Default for NetConfig {
    fn default() -> Self {
        Self {
            pool: PoolConfig::default(),
            dirty_capacity: DEFAULT_DIRTY_CAPACITY,
        }
    }
}

impl NetConfig {
    /// Parses and validates a TOML document.
    ///
    /// Missing fields fall back to defaults; present fields must hold
    /// workable values.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] for a malformed document,
    /// [`ConfigError::Invalid`] for values the runtime cannot operate with.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.check()?;
        Ok(config)
    }

    fn check(&self) -> Result<(), ConfigError> {
        if self.pool.shards == 0 {
            return Err(ConfigError::Invalid("pool.shards must be at least 1"));
        }
        if self.pool.writer_capacity == 0 {
            return Err(ConfigError::Invalid(
                "pool.writer_capacity must be at least 1",
            ));
        }
        if self.dirty_capacity == 0 {
            return Err(ConfigError::Invalid("dirty_capacity must be at least 1"));
        }
        Ok(())
    }
}
