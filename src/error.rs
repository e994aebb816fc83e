//! Error handling for Regionbake
//!
//! Degenerate edits (fade longer than a segment, a cut covering the whole
//! selection, a mute collapsing under a cut) are not errors. They produce
//! valid, possibly empty, output.

use thiserror::Error;

/// Result type alias for Regionbake operations
pub type Result<T> = std::result::Result<T, BakeError>;

/// Main error type for Regionbake operations
#[derive(Error, Debug)]
pub enum BakeError {
    // Argument Errors
    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    #[error("Selection is empty after clamping: in={in_time:.6}s out={out_time:.6}s")]
    EmptySelection { in_time: f64, out_time: f64 },

    // File Errors
    #[error("File not found: {path}")]
    FileNotFound {
        path: String,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Invalid audio file: {reason}")]
    InvalidAudio {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Unsupported audio format: {format}")]
    UnsupportedFormat { format: String },

    // I/O Errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl BakeError {
    /// Shorthand for an `InvalidArgument` error
    pub fn invalid(reason: impl Into<String>) -> Self {
        BakeError::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            BakeError::InvalidArgument { .. } => "INVALID_ARGUMENT",
            BakeError::EmptySelection { .. } => "EMPTY_SELECTION",
            BakeError::FileNotFound { .. } => "FILE_NOT_FOUND",
            BakeError::InvalidAudio { .. } => "INVALID_AUDIO",
            BakeError::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            BakeError::Io(_) => "IO_ERROR",
            BakeError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Check if the caller can fix this error by changing its input
    ///
    /// Nothing here is worth retrying unchanged: every operation is a pure
    /// function of its inputs.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            BakeError::EmptySelection { .. }
                | BakeError::FileNotFound { .. }
                | BakeError::UnsupportedFormat { .. }
        )
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            BakeError::EmptySelection { .. } => vec![
                "Move the out point after the in point",
                "Check that the selection lies inside the audio duration",
            ],
            BakeError::FileNotFound { .. } => vec![
                "Check the file path is correct",
                "Verify the file hasn't been moved or deleted",
            ],
            BakeError::InvalidAudio { .. } => vec![
                "Check if the file plays in another application",
                "The file may be corrupted - try re-exporting from source",
            ],
            BakeError::UnsupportedFormat { .. } => vec![
                "Convert to 16-bit, 24-bit or 32-bit float WAV",
            ],
            _ => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = BakeError::EmptySelection {
            in_time: 1.0,
            out_time: 1.0,
        };
        assert_eq!(err.error_code(), "EMPTY_SELECTION");
        assert_eq!(BakeError::invalid("width").error_code(), "INVALID_ARGUMENT");
    }

    #[test]
    fn test_recovery_suggestions() {
        let err = BakeError::FileNotFound {
            path: "take.wav".to_string(),
            source: None,
        };
        assert!(!err.recovery_suggestions().is_empty());
        assert!(err.is_recoverable());
        assert!(!BakeError::invalid("zero width").is_recoverable());
    }

    #[test]
    fn test_display_includes_reason() {
        let err = BakeError::invalid("envelope width must be non-zero");
        assert_eq!(
            err.to_string(),
            "Invalid argument: envelope width must be non-zero"
        );
    }
}
