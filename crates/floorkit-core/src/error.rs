//! Error handling for Floorkit
//!
//! Geometry and history operations are total and never fail. Errors only
//! arise at the I/O edges (layout storage, position records, analysis
//! collaborator) and in configuration handling.
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Storage error type
///
/// Represents failures of the layout backend or the relational position store.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Reading from the backing store failed
    #[error("Failed to read {target}: {reason}")]
    ReadFailed {
        /// What was being read (file path, table name).
        target: String,
        /// The reason the read failed.
        reason: String,
    },

    /// Writing to the backing store failed
    #[error("Failed to write {target}: {reason}")]
    WriteFailed {
        /// What was being written (file path, table name).
        target: String,
        /// The reason the write failed.
        reason: String,
    },

    /// Persisted data could not be decoded
    #[error("Corrupt data in {target}: {reason}")]
    Corrupt {
        /// Where the corrupt data came from.
        target: String,
        /// The decoder message.
        reason: String,
    },

    /// Remote collaborator rejected or failed the request
    #[error("Backend unavailable: {reason}")]
    Unavailable {
        /// The reason the backend is unavailable.
        reason: String,
    },

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Analysis error type
///
/// Raised by the floor-plan analysis collaborator.
#[derive(Error, Debug, Clone)]
pub enum AnalysisError {
    /// The collaborator could not process the image
    #[error("Analysis failed: {reason}")]
    Failed {
        /// The reason the analysis failed.
        reason: String,
    },

    /// The result did not contain usable candidates
    #[error("Analysis returned no candidates above {min_confidence}% confidence")]
    NoCandidates {
        /// Confidence threshold that was applied.
        min_confidence: f64,
    },
}

/// Main error type for Floorkit
///
/// A unified error type that can represent any error from all layers.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Storage error
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Analysis error
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Check if this is a storage error
    pub fn is_storage_error(&self) -> bool {
        matches!(self, Error::Storage(_))
    }

    /// Check if this error came from corrupt persisted data
    pub fn is_corrupt_data(&self) -> bool {
        matches!(
            self,
            Error::Storage(StorageError::Corrupt { .. })
                | Error::Storage(StorageError::Serialization(_))
        )
    }

    /// Short, user-facing text for a toast notification
    pub fn user_message(&self) -> String {
        match self {
            Error::Storage(StorageError::WriteFailed { .. }) => {
                "Saving failed. Your changes are still here and can be saved again.".to_string()
            }
            Error::Storage(_) => "The layout store could not be reached.".to_string(),
            Error::Analysis(e) => e.to_string(),
            Error::Config(msg) | Error::Other(msg) => msg.clone(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Storage(StorageError::Io(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Storage(StorageError::Serialization(err))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_display() {
        let err = StorageError::WriteFailed {
            target: "layouts.json".to_string(),
            reason: "disk full".to_string(),
        };
        assert_eq!(err.to_string(), "Failed to write layouts.json: disk full");
    }

    #[test]
    fn test_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io_err.into();
        assert!(err.is_storage_error());
        assert!(!err.is_corrupt_data());

        let json_err = serde_json::from_str::<Vec<u8>>("{oops").unwrap_err();
        let err: Error = json_err.into();
        assert!(err.is_corrupt_data());
    }

    #[test]
    fn test_user_message_for_failed_save() {
        let err = Error::Storage(StorageError::WriteFailed {
            target: "remote".to_string(),
            reason: "timeout".to_string(),
        });
        assert!(err.user_message().contains("can be saved again"));
    }
}
