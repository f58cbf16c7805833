//! Error types for the Classifier

use notetype_llm::LlmError;
use thiserror::Error;

/// Errors that can end a classification
///
/// Every variant is recoverable: the host renders it and keeps running.
/// `Auth` and `Unexpected` are kept apart so the host can tell the user
/// whether new credentials are needed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClassifyError {
    /// Credentials were rejected by the completion service
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Any other failure talking to the completion service
    #[error("Unexpected error: {0}")]
    Unexpected(String),

    /// The document could not be read or updated
    #[error("Document error: {0}")]
    Document(String),

    /// Settings are unusable
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClassifyError {
    /// Whether the user needs to refresh credentials
    pub fn is_auth(&self) -> bool {
        matches!(self, ClassifyError::Auth(_))
    }
}

impl From<LlmError> for ClassifyError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::Unauthenticated { .. } => ClassifyError::Auth(e.to_string()),
            LlmError::Config(message) => ClassifyError::Config(message),
            other => ClassifyError::Unexpected(other.to_string()),
        }
    }
}
