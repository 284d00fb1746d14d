//! Error types for PCM extraction

use std::fmt;

/// Errors that can occur while extracting PCM samples
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// Invalid configuration parameters
    InvalidInput(String),

    /// Reading from the byte source failed
    Io(String),

    /// The external decoder could not be started or exited with a failure
    DecoderProcess(String),
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            ExtractError::Io(msg) => write!(f, "I/O error: {}", msg),
            ExtractError::DecoderProcess(msg) => write!(f, "Decoder process error: {}", msg),
        }
    }
}

impl std::error::Error for ExtractError {}

impl From<std::io::Error> for ExtractError {
    fn from(err: std::io::Error) -> Self {
        ExtractError::Io(err.to_string())
    }
}
