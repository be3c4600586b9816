//! # Error Types
//!
//! Failures in this layer are scoped to one connection or to startup
//! configuration; neither may take the whole process down mid-run.

use thiserror::Error;

/// Errors surfaced by per-connection operations.
///
/// These mark programmer errors on the calling side. Policy on the server
/// is to disconnect the affected connection, never to crash.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConnectionError {
    /// A null entity reference reached an operation whose downstream
    /// effects (show/hide/destroy) cannot act on nothing.
    #[error("null entity passed to {operation}")]
    NullEntity {
        /// The operation that rejected the entity.
        operation: &'static str,
    },
}

/// Errors produced while loading startup configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The TOML document could not be parsed.
    #[error("malformed config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A field held a value the runtime cannot operate with.
    #[error("invalid config: {0}")]
    Invalid(&'static str),
}
