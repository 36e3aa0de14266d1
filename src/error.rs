//! Error handling for Deepfry
//!
//! Every failure unwinds to the degrader's top level, which runs cleanup
//! before reporting. Errors carry recovery suggestions for the CLI.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for Deepfry operations
pub type Result<T> = std::result::Result<T, DeepFryError>;

/// Broad failure category, used for reporting and exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad or missing input file
    Input,
    /// Lossy or container codec failure
    Codec,
    /// Read/write/delete failure
    Filesystem,
    /// Rejected pipeline configuration
    Config,
}

/// Main error type for Deepfry operations
#[derive(Error, Debug)]
pub enum DeepFryError {
    // Input Errors
    #[error("Unsupported file type: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("File not found: {path}")]
    FileNotFound {
        path: String,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Invalid audio: {reason}")]
    InvalidAudio {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // Codec Errors
    #[error("Codec {stage} failed: {reason}")]
    Codec { stage: &'static str, reason: String },

    #[error("Codec unavailable: could not run '{program}'")]
    CodecUnavailable {
        program: String,
        #[source]
        source: std::io::Error,
    },

    // Configuration Errors
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    // Filesystem Errors
    #[error("Failed to remove temporary file {}", path.display())]
    Cleanup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DeepFryError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            DeepFryError::UnsupportedFormat { .. } => "UNSUPPORTED_FORMAT",
            DeepFryError::FileNotFound { .. } => "FILE_NOT_FOUND",
            DeepFryError::InvalidAudio { .. } => "INVALID_AUDIO",
            DeepFryError::Codec { .. } => "CODEC_ERROR",
            DeepFryError::CodecUnavailable { .. } => "CODEC_UNAVAILABLE",
            DeepFryError::InvalidConfig { .. } => "INVALID_CONFIG",
            DeepFryError::Cleanup { .. } => "CLEANUP_FAILED",
            DeepFryError::Io(_) => "IO_ERROR",
            DeepFryError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Classify the error into the pipeline's failure taxonomy
    pub fn kind(&self) -> ErrorKind {
        match self {
            DeepFryError::UnsupportedFormat { .. } | DeepFryError::FileNotFound { .. } => {
                ErrorKind::Input
            }
            DeepFryError::InvalidAudio { .. }
            | DeepFryError::Codec { .. }
            | DeepFryError::CodecUnavailable { .. } => ErrorKind::Codec,
            DeepFryError::InvalidConfig { .. } | DeepFryError::Serialization(_) => {
                ErrorKind::Config
            }
            DeepFryError::Cleanup { .. } | DeepFryError::Io(_) => ErrorKind::Filesystem,
        }
    }

    /// Process exit status for this error
    ///
    /// `1` for usage problems the user can fix on the command line,
    /// `2` for everything that failed while running.
    pub fn exit_code(&self) -> i32 {
        match self {
            DeepFryError::UnsupportedFormat { .. } => 1,
            _ if self.kind() == ErrorKind::Config => 1,
            _ => 2,
        }
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            DeepFryError::UnsupportedFormat { .. } => vec![
                "Supported input formats: .wav, .mp3",
                "Convert the file to WAV first",
            ],
            DeepFryError::FileNotFound { .. } => vec![
                "Check the file path is correct",
                "Verify the file hasn't been moved or deleted",
            ],
            DeepFryError::InvalidAudio { .. } => vec![
                "Check if the file plays in another application",
                "The file may be corrupted - try re-exporting from source",
            ],
            DeepFryError::CodecUnavailable { .. } => vec![
                "Install LAME and make sure `lame` is on your PATH",
                "Or point --lame at the encoder binary",
            ],
            DeepFryError::Codec { .. } => vec![
                "Run with --verbose to see the encoder output",
                "Try a different bitrate pool",
            ],
            DeepFryError::InvalidConfig { .. } | DeepFryError::Serialization(_) => {
                vec!["Check the configuration values and the --config file"]
            }
            DeepFryError::Cleanup { .. } => vec![
                "Remove the temporary file by hand",
                "Check permissions on the temporary directory",
            ],
            DeepFryError::Io(_) => vec!["Check free disk space and write permissions"],
        }
    }

    pub(crate) fn codec(stage: &'static str, reason: impl Into<String>) -> Self {
        DeepFryError::Codec {
            stage,
            reason: reason.into(),
        }
    }

    pub(crate) fn config(reason: impl Into<String>) -> Self {
        DeepFryError::InvalidConfig {
            reason: reason.into(),
        }
    }
}
