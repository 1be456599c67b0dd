//! Error types for constructing resources and loading configuration.
//!
//! Stream operations do not use these: a stream that cannot read, write or
//! seek answers with `None`/`false`/an empty buffer instead.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MessageError {
    #[error("invalid stream mode: {0:?}")]
    InvalidMode(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to deserialize config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("config already set")]
    AlreadySet,
}
