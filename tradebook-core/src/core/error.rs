//! Error types for the Tradebook core library.

use thiserror::Error;

/// All errors that can occur within the Tradebook core library.
#[derive(Debug, Error)]
pub enum TradebookError {
    /// The remote API could not be reached or answered with a non-success status.
    #[error("Remote unavailable: {0}")]
    RemoteUnavailable(String),

    /// The remote API answered, but the body was not the expected shape.
    #[error("Malformed remote payload: {0}")]
    MalformedRemotePayload(String),

    /// The local fallback cache could not be read or written.
    #[error("Local cache unavailable: {0}")]
    LocalCacheUnavailable(String),

    /// A file in an image upload batch could not be read.
    #[error("Could not read image '{name}': {reason}")]
    ImageRead { name: String, reason: String },

    /// An edit named an unknown field or carried an unknown enum value.
    #[error("Invalid field: {0}")]
    InvalidField(String),

    /// A SQLite operation failed while opening the cache database.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// An I/O operation on the filesystem failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Data could not be serialized to or deserialized from JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias that pins the error type to [`TradebookError`].
pub type Result<T> = std::result::Result<T, TradebookError>;

impl TradebookError {
    /// Returns `true` for failures of the remote tier, which the entry store
    /// absorbs by falling back to the local cache.
    #[must_use]
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::RemoteUnavailable(_) | Self::MalformedRemotePayload(_)
        )
    }

    /// Returns a short, human-readable message suitable for display to the end user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::RemoteUnavailable(_) | Self::MalformedRemotePayload(_) => {
                "Server not reachable, working from the local copy".to_string()
            }
            Self::LocalCacheUnavailable(e) => format!("Could not save locally: {e}"),
            Self::ImageRead { name, .. } => format!("Could not read screenshot {name}"),
            Self::InvalidField(msg) => msg.clone(),
            Self::Database(e) => format!("Failed to open local cache: {e}"),
            Self::Io(e) => format!("File error: {e}"),
            Self::Json(e) => format!("Data format error: {e}"),
        }
    }
}
