//! Error types for poolwatch

use thiserror::Error;

/// Result type alias using poolwatch's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for poolwatch operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// No formatter is registered for a channel type
    #[error("Unsupported channel type: {channel_type}")]
    UnsupportedChannel {
        /// The channel type tag that had no registered formatter
        channel_type: String,
    },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an unsupported channel error
    pub fn unsupported_channel(channel_type: impl Into<String>) -> Self {
        Self::UnsupportedChannel {
            channel_type: channel_type.into(),
        }
    }
}
