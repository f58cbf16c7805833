//! Notetype LLM Provider Layer
//!
//! Completion providers the classifier sends notes to.
//!
//! # Architecture
//!
//! This crate defines the `CompletionProvider` trait and its implementations.
//! A provider takes a two-turn [`Prompt`] (system instruction plus user text)
//! and returns the model's answer as plain text.
//!
//! # Providers
//!
//! - `MockProvider`: Deterministic mock for testing
//! - `YandexGptProvider`: Yandex Foundation Models completion API
//!
//! # Examples
//!
//! ```
//! use notetype_llm::{CompletionProvider, MockProvider, Prompt};
//!
//! # async fn example() {
//! let provider = MockProvider::new("Fleeting note");
//! let answer = provider.complete(&Prompt::new("classify", "buy milk")).await.unwrap();
//! assert_eq!(answer, "Fleeting note");
//! # }
//! ```

#![warn(missing_docs)]

pub mod yandex;

use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;

pub use yandex::{YandexGptConfig, YandexGptProvider};

/// gRPC status code the completion API reports for unauthenticated requests
pub const GRPC_UNAUTHENTICATED: i64 = 16;

/// Errors that can occur during completion requests
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LlmError {
    /// Credentials were rejected (HTTP 401 or gRPC code 16)
    #[error("Authentication failed (HTTP {status})")]
    Unauthenticated {
        /// HTTP status of the response
        status: u16,
    },

    /// The API answered with a non-success status
    #[error("API error: HTTP {status}{}: {message}", grpc_suffix(.grpc_code))]
    Api {
        /// HTTP status of the response
        status: u16,
        /// Provider error code, if the body carried one
        grpc_code: Option<i64>,
        /// Provider error message or raw body
        message: String,
    },

    /// Network or transport failure
    #[error("Communication error: {0}")]
    Communication(String),

    /// Success status with a body that is not a usable completion
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Provider could not be constructed
    #[error("Configuration error: {0}")]
    Config(String),
}

impl LlmError {
    /// Classify a non-success response by HTTP status and provider error code
    pub fn from_response(status: u16, grpc_code: Option<i64>, message: impl Into<String>) -> Self {
        match (status, grpc_code) {
            (401, _) | (_, Some(GRPC_UNAUTHENTICATED)) => LlmError::Unauthenticated { status },
            _ => LlmError::Api {
                status,
                grpc_code,
                message: message.into(),
            },
        }
    }

    /// Whether the caller needs to refresh credentials
    pub fn is_auth_error(&self) -> bool {
        matches!(self, LlmError::Unauthenticated { .. })
    }
}

/// A two-turn completion prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    /// Instruction sent with the `system` role
    pub system: String,
    /// Content sent with the `user` role
    pub user: String,
}

impl Prompt {
    /// Create a prompt from a system instruction and user text
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
        }
    }
}

/// A text completion backend
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Send the prompt and return the first alternative's text
    async fn complete(&self, prompt: &Prompt) -> Result<String, LlmError>;
}

/// Mock completion provider for deterministic testing
///
/// Returns a pre-configured answer (or error) without making any network calls,
/// and records every prompt it receives.
///
/// # Examples
///
/// ```
/// use notetype_llm::{CompletionProvider, LlmError, MockProvider, Prompt};
///
/// # async fn example() {
/// let provider = MockProvider::failing(LlmError::Unauthenticated { status: 401 });
/// let result = provider.complete(&Prompt::new("system", "user")).await;
/// assert!(result.unwrap_err().is_auth_error());
/// assert_eq!(provider.call_count(), 1);
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    response: Arc<Mutex<Result<String, LlmError>>>,
    prompts: Arc<Mutex<Vec<Prompt>>>,
}

impl MockProvider {
    /// Create a MockProvider answering every prompt with `response`
    pub fn new(response: impl Into<String>) -> Self {
        Self::with_result(Ok(response.into()))
    }

    /// Create a MockProvider failing every prompt with `error`
    pub fn failing(error: LlmError) -> Self {
        Self::with_result(Err(error))
    }

    fn with_result(result: Result<String, LlmError>) -> Self {
        Self {
            response: Arc::new(Mutex::new(result)),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Replace the answer returned from now on
    pub fn set_response(&self, response: impl Into<String>) {
        *lock(&self.response) = Ok(response.into());
    }

    /// Replace the answer with an error from now on
    pub fn set_error(&self, error: LlmError) {
        *lock(&self.response) = Err(error);
    }

    /// Get the number of times complete was called
    pub fn call_count(&self) -> usize {
        lock(&self.prompts).len()
    }

    /// Get every prompt received so far
    pub fn prompts(&self) -> Vec<Prompt> {
        lock(&self.prompts).clone()
    }

    /// Get the most recent prompt
    pub fn last_prompt(&self) -> Option<Prompt> {
        lock(&self.prompts).last().cloned()
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

#[async_trait]
impl CompletionProvider for MockProvider {
    async fn complete(&self, prompt: &Prompt) -> Result<String, LlmError> {
        lock(&self.prompts).push(prompt.clone());
        lock(&self.response).clone()
    }
}

fn grpc_suffix(grpc_code: &Option<i64>) -> String {
    grpc_code
        .map(|code| format!(", grpc code {}", code))
        .unwrap_or_default()
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_provider_default() {
        let provider = MockProvider::new("Test response");
        let result = provider.complete(&Prompt::new("s", "u")).await;
        assert_eq!(result.unwrap(), "Test response");
    }

    #[tokio::test]
    async fn test_mock_provider_records_prompts() {
        let provider = MockProvider::default();
        assert_eq!(provider.call_count(), 0);

        provider.complete(&Prompt::new("s1", "u1")).await.unwrap();
        provider.complete(&Prompt::new("s2", "u2")).await.unwrap();

        assert_eq!(provider.call_count(), 2);
        assert_eq!(provider.last_prompt(), Some(Prompt::new("s2", "u2")));
        assert_eq!(provider.prompts()[0].user, "u1");
    }

    #[tokio::test]
    async fn test_mock_provider_error() {
        let provider = MockProvider::new("ok");
        provider.set_error(LlmError::Communication("down".to_string()));

        let result = provider.complete(&Prompt::new("s", "u")).await;
        assert!(matches!(result, Err(LlmError::Communication(_))));

        provider.set_response("back");
        assert_eq!(provider.complete(&Prompt::new("s", "u")).await.unwrap(), "back");
    }

    #[tokio::test]
    async fn test_mock_provider_clone_shares_state() {
        let provider1 = MockProvider::new("test");
        let provider2 = provider1.clone();

        provider1.complete(&Prompt::new("s", "u")).await.unwrap();

        // Both share the same prompt log due to Arc
        assert_eq!(provider1.call_count(), 1);
        assert_eq!(provider2.call_count(), 1);
    }

    #[test]
    fn test_error_from_401() {
        let err = LlmError::from_response(401, None, "Unauthorized");
        assert_eq!(err, LlmError::Unauthenticated { status: 401 });
        assert!(err.is_auth_error());
    }

    #[test]
    fn test_error_from_grpc_unauthenticated() {
        let err = LlmError::from_response(403, Some(16), "Unknown api key");
        assert!(err.is_auth_error());
    }

    #[test]
    fn test_error_from_other_status() {
        let err = LlmError::from_response(500, Some(13), "internal");
        assert!(!err.is_auth_error());
        assert_eq!(err.to_string(), "API error: HTTP 500, grpc code 13: internal");

        let err = LlmError::from_response(429, None, "slow down");
        assert_eq!(err.to_string(), "API error: HTTP 429: slow down");
    }
}
