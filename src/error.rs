//! Error handling types

use thiserror::Error;

/// Result type alias for operations that can fail
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for appstash
#[derive(Error, Debug)]
pub enum Error {
    /// Failure reported by the underlying key-value store
    #[error("store error: {message}")]
    Store {
        /// Description of the store failure
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// JSON serialization or deserialization error
    #[error("serialization error: {source}")]
    Serialization {
        /// The underlying JSON error
        #[from]
        source: serde_json::Error,
    },

    /// Configuration-related error
    #[error("configuration error: {message}")]
    Config {
        /// Description of the configuration error
        message: String,
    },
}

impl Error {
    /// Create a store error from a message alone
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
            source: None,
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

/// Convert Redis client errors into store errors at the crate boundary
impl From<redis::RedisError> for Error {
    fn from(err: redis::RedisError) -> Self {
        Self::Store {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}
