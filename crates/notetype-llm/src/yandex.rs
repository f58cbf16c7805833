//! YandexGPT Provider Implementation
//!
//! Provides integration with the Yandex Foundation Models completion API.
//!
//! # Features
//!
//! - Async HTTP communication with the completion endpoint
//! - Bearer-token authentication
//! - Explicit status handling: HTTP 401 or gRPC code 16 is reported as
//!   [`LlmError::Unauthenticated`], anything else non-200 as [`LlmError::Api`]
//! - Optional request timeout
//!
//! No retries are made on any failure path.
//!
//! # Examples
//!
//! ```no_run
//! use notetype_domain::Settings;
//! use notetype_llm::{CompletionProvider, Prompt, YandexGptConfig, YandexGptProvider};
//!
//! # async fn example() -> Result<(), notetype_llm::LlmError> {
//! let settings = Settings::new("my-iam-token", "b1gexamplefolder");
//! let provider = YandexGptProvider::new(YandexGptConfig::from_settings(&settings))?;
//! let answer = provider.complete(&Prompt::new("Answer briefly", "Hello")).await?;
//! # Ok(())
//! # }
//! ```

use crate::{CompletionProvider, LlmError, Prompt};
use async_trait::async_trait;
use notetype_domain::Settings;
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Completion API endpoint
pub const COMPLETION_ENDPOINT: &str =
    "https://llm.api.cloud.yandex.net/foundationModels/v1/completion";

/// Model used for classification
pub const DEFAULT_MODEL: &str = "yandexgpt-lite";

/// Sampling temperature, kept low for stable labels
pub const DEFAULT_TEMPERATURE: f64 = 0.1;

/// Maximum tokens the model may generate
pub const DEFAULT_MAX_TOKENS: u32 = 1000;

/// Default timeout for completion requests (60 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Build the model URI for a folder, e.g. `gpt://<folder>/yandexgpt-lite`
pub fn model_uri(folder_id: &str, model: &str) -> String {
    format!("gpt://{}/{}", folder_id, model)
}

/// Configuration for [`YandexGptProvider`]
#[derive(Debug, Clone)]
pub struct YandexGptConfig {
    /// Completion endpoint URL
    pub endpoint: String,
    /// IAM or API token
    pub bearer_token: String,
    /// Cloud folder id, templated into the model URI
    pub folder_id: String,
    /// Model name within the folder
    pub model: String,
    /// Sampling temperature
    pub temperature: f64,
    /// Generation token budget
    pub max_tokens: u32,
    /// Request timeout; `None` waits indefinitely
    pub timeout: Option<Duration>,
}

impl YandexGptConfig {
    /// Build a config for the public endpoint from user settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            endpoint: COMPLETION_ENDPOINT.to_string(),
            bearer_token: settings.bearer_token.clone(),
            folder_id: settings.folder_id.clone(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
        }
    }

    /// Point the provider at a different endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the request timeout (`None` disables it)
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Request body for the completion API
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionRequest {
    /// `gpt://<folder>/<model>`
    pub model_uri: String,
    /// Sampling options
    pub completion_options: CompletionOptions,
    /// Conversation turns
    pub messages: Vec<Message>,
}

/// Sampling options of a completion request
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionOptions {
    /// Always false; the whole answer is returned at once
    pub stream: bool,
    /// Sampling temperature
    pub temperature: f64,
    /// Token budget, sent as a decimal string
    pub max_tokens: String,
}

/// One conversation turn
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    /// `system`, `user` or `assistant`
    #[serde(default)]
    pub role: String,
    /// Turn content
    pub text: String,
}

impl CompletionRequest {
    /// Build the request for a prompt under the given config
    pub fn new(config: &YandexGptConfig, prompt: &Prompt) -> Self {
        Self {
            model_uri: model_uri(&config.folder_id, &config.model),
            completion_options: CompletionOptions {
                stream: false,
                temperature: config.temperature,
                max_tokens: config.max_tokens.to_string(),
            },
            messages: vec![
                Message {
                    role: "system".to_string(),
                    text: prompt.system.clone(),
                },
                Message {
                    role: "user".to_string(),
                    text: prompt.user.clone(),
                },
            ],
        }
    }
}

/// Successful response from the completion API
#[derive(Debug, Deserialize)]
struct CompletionResponse {
    result: CompletionResult,
}

#[derive(Debug, Deserialize)]
struct CompletionResult {
    #[serde(default)]
    alternatives: Vec<Alternative>,
}

#[derive(Debug, Deserialize)]
struct Alternative {
    message: Message,
}

/// Error response from the completion API
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiErrorBody {
    grpc_code: Option<i64>,
    #[serde(default)]
    message: String,
}

/// Completion provider backed by the Yandex Foundation Models API
pub struct YandexGptProvider {
    config: YandexGptConfig,
    client: reqwest::Client,
}

impl YandexGptProvider {
    /// Create a new provider
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Config`] if the HTTP client cannot be built.
    pub fn new(config: YandexGptConfig) -> Result<Self, LlmError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| LlmError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Get the provider configuration
    pub fn config(&self) -> &YandexGptConfig {
        &self.config
    }

    /// Send one completion request
    ///
    /// # Returns
    ///
    /// The text of the first alternative
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The request cannot be sent or the body cannot be read
    /// - The API rejects the credentials (`Unauthenticated`)
    /// - The API answers with any other non-200 status (`Api`)
    /// - A 200 body is malformed or has no alternatives (`InvalidResponse`)
    pub async fn generate(&self, prompt: &Prompt) -> Result<String, LlmError> {
        let request_body = CompletionRequest::new(&self.config, prompt);

        debug!(
            endpoint = %self.config.endpoint,
            model_uri = %request_body.model_uri,
            user_chars = prompt.user.chars().count(),
            "Sending completion request"
        );

        let response = self
            .client
            .post(&self.config.endpoint)
            .header(ACCEPT, "application/json")
            .bearer_auth(&self.config.bearer_token)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| LlmError::Communication(format!("Request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| LlmError::Communication(format!("Failed to read response: {}", e)))?;

        if status != StatusCode::OK {
            return Err(parse_error(status, &body));
        }

        parse_completion(&body)
    }
}

#[async_trait]
impl CompletionProvider for YandexGptProvider {
    async fn complete(&self, prompt: &Prompt) -> Result<String, LlmError> {
        self.generate(prompt).await
    }
}

/// Extract `result.alternatives[0].message.text` from a 200 body
fn parse_completion(body: &str) -> Result<String, LlmError> {
    let parsed: CompletionResponse = serde_json::from_str(body)
        .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

    parsed
        .result
        .alternatives
        .into_iter()
        .next()
        .map(|alternative| alternative.message.text)
        .ok_or_else(|| LlmError::InvalidResponse("Response has no alternatives".to_string()))
}

/// Map a non-200 response to an error, reading `error.grpcCode` when present
fn parse_error(status: StatusCode, body: &str) -> LlmError {
    let (grpc_code, message) = match serde_json::from_str::<ErrorResponse>(body) {
        Ok(parsed) => (parsed.error.grpc_code, parsed.error.message),
        Err(_) => (None, body.trim().to_string()),
    };

    let error = LlmError::from_response(status.as_u16(), grpc_code, message);
    warn!(status = status.as_u16(), ?grpc_code, "Completion request rejected");
    error
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn test_config() -> YandexGptConfig {
        YandexGptConfig::from_settings(&Settings::new("token", "folder-1"))
    }

    #[test]
    fn test_config_from_settings() {
        let config = test_config();
        assert_eq!(config.endpoint, COMPLETION_ENDPOINT);
        assert_eq!(config.bearer_token, "token");
        assert_eq!(config.folder_id, "folder-1");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.timeout, Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)));
    }

    #[test]
    fn test_request_shape() {
        let request = CompletionRequest::new(&test_config(), &Prompt::new("classify", "my note"));
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(
            value,
            json!({
                "modelUri": "gpt://folder-1/yandexgpt-lite",
                "completionOptions": {
                    "stream": false,
                    "temperature": 0.1,
                    "maxTokens": "1000"
                },
                "messages": [
                    { "role": "system", "text": "classify" },
                    { "role": "user", "text": "my note" }
                ]
            })
        );
    }

    #[test]
    fn test_parse_completion() {
        let body = r#"{"result":{"alternatives":[{"message":{"role":"assistant","text":"Permanent note"},"status":"ALTERNATIVE_STATUS_FINAL"}],"usage":{},"modelVersion":"x"}}"#;
        assert_eq!(parse_completion(body).unwrap(), "Permanent note");
    }

    #[test]
    fn test_parse_completion_no_alternatives() {
        let body = r#"{"result":{"alternatives":[]}}"#;
        assert!(matches!(
            parse_completion(body),
            Err(LlmError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_parse_completion_malformed() {
        assert!(matches!(
            parse_completion("<html>oops</html>"),
            Err(LlmError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_parse_error_grpc_code() {
        let body = r#"{"error":{"grpcCode":16,"httpCode":401,"message":"Unknown api key","httpStatus":"Unauthorized","details":[]}}"#;
        assert!(parse_error(StatusCode::UNAUTHORIZED, body).is_auth_error());

        let body = r#"{"error":{"grpcCode":3,"message":"bad folder"}}"#;
        assert_eq!(
            parse_error(StatusCode::BAD_REQUEST, body),
            LlmError::Api {
                status: 400,
                grpc_code: Some(3),
                message: "bad folder".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_error_plain_body() {
        let err = parse_error(StatusCode::BAD_GATEWAY, "upstream down\n");
        assert_eq!(
            err,
            LlmError::Api {
                status: 502,
                grpc_code: None,
                message: "upstream down".to_string(),
            }
        );
    }
}
