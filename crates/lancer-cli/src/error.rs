//! Error types for the inspector.

use lancer_utf::UtfError;
use std::path::PathBuf;
use thiserror::Error;

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An option has a value the inspector cannot use
    #[error("Invalid value for --{field}: {reason}")]
    InvalidValue {
        /// Option name
        field: &'static str,
        /// Reason for invalidity
        reason: String,
    },
}

/// Command execution errors.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The container could not be decoded
    #[error("Failed to read {path}: {source}")]
    Decode {
        /// Container path
        path: PathBuf,
        /// Underlying decode error
        #[source]
        source: UtfError,
    },

    /// No node matches the requested path
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    /// The requested node carries no payload
    #[error("Node is not a leaf: {0}")]
    NotALeaf(String),

    /// Invalid configuration
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Failed to write output
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to serialize JSON output
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
