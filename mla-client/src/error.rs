//! Error types for mla-client
//!
//! Every variant is recoverable: the page returns to a re-interactable state.
//! Hydration failures are not represented here (they surface as "no results"),
//! and artifact cleanup failures are logged and dropped.

use thiserror::Error;

/// Fixed message for a rejected file type
pub const INVALID_FILE_MESSAGE: &str = "Please select a valid MIDI file (.mid or .midi)";
/// Fixed message for submitting without a file
pub const NO_FILE_MESSAGE: &str = "Please select a MIDI file";
/// Fallback when the service declines without a message
pub const GENERIC_SERVICE_MESSAGE: &str = "An error occurred during analysis";
/// Fixed message for network or decode failures
pub const TRANSPORT_MESSAGE: &str = "Failed to analyze file. Please try again.";

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// Wrong file type or no file selected
    #[error("{0}")]
    Validation(String),

    /// Analysis Service answered with `success: false`
    #[error("{0}")]
    Service(String),

    /// Network failure or undecodable response
    #[error("Transport error: {0}")]
    Transport(String),

    /// Session storage read/write failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// mla-common error
    #[error("Common error: {0}")]
    Common(#[from] mla_common::Error),
}

impl ClientError {
    /// Message shown inline on the upload page
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Validation(msg) | ClientError::Service(msg) => msg.clone(),
            ClientError::Transport(_) | ClientError::Storage(_) => TRANSPORT_MESSAGE.to_string(),
            ClientError::Config(msg) => msg.clone(),
            ClientError::Common(err) => err.to_string(),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::Transport(err.to_string())
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
