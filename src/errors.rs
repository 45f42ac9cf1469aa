//! # Error Types Module
//!
//! Typed errors for the two places where failures are part of the contract:
//! the profile store (I/O, always non-fatal for the bot) and process
//! configuration (fatal at startup).

use std::path::PathBuf;

/// Failures while loading or flushing the profile file
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing the file (or its temporary sibling) failed
    #[error("profile store I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The file exists but does not hold a valid profile map
    #[error("malformed profile file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// The in-memory map could not be serialized
    #[error("failed to serialize profiles: {0}")]
    Serialize(#[from] serde_json::Error),
    /// The temporary file could not be renamed over the target
    #[error("failed to replace profile file {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: tempfile::PersistError,
    },
}

/// Invalid or missing process configuration
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("TELEGRAM_BOT_TOKEN is not set")]
    MissingToken,
    #[error("TELEGRAM_BOT_TOKEN still holds the placeholder value")]
    PlaceholderToken,
    #[error("invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },
}
