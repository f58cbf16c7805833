//! Settings module - credentials for the completion service

use serde::{Deserialize, Serialize};

/// Default bearer token, a placeholder until the user sets a real one
pub const DEFAULT_BEARER_TOKEN: &str = "default";

/// Default folder id, a placeholder until the user sets a real one
pub const DEFAULT_FOLDER_ID: &str = "some folder id";

/// User-supplied credentials for the completion service
///
/// Loaded once at startup by the host and passed to the classifier. The only
/// requirement for a successful call is that neither field is empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// IAM or API token sent as `Authorization: Bearer <token>`
    #[serde(default = "default_bearer_token", alias = "bearerToken")]
    pub bearer_token: String,

    /// Cloud folder the model is billed to
    #[serde(default = "default_folder_id", alias = "folderId")]
    pub folder_id: String,
}

impl Settings {
    /// Create settings from a token and a folder id
    pub fn new(bearer_token: impl Into<String>, folder_id: impl Into<String>) -> Self {
        Self {
            bearer_token: bearer_token.into(),
            folder_id: folder_id.into(),
        }
    }

    /// Check that both fields are filled in
    pub fn validate(&self) -> Result<(), String> {
        if self.bearer_token.trim().is_empty() {
            return Err("bearer_token must not be empty".to_string());
        }
        if self.folder_id.trim().is_empty() {
            return Err("folder_id must not be empty".to_string());
        }
        Ok(())
    }

    /// Bearer token with all but the last four characters hidden
    pub fn masked_token(&self) -> String {
        let chars: Vec<char> = self.bearer_token.chars().collect();
        if chars.len() <= 4 {
            return "*".repeat(chars.len());
        }
        let visible: String = chars[chars.len() - 4..].iter().collect();
        format!("{}{}", "*".repeat(chars.len() - 4), visible)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new(DEFAULT_BEARER_TOKEN, DEFAULT_FOLDER_ID)
    }
}

fn default_bearer_token() -> String {
    DEFAULT_BEARER_TOKEN.to_string()
}

fn default_folder_id() -> String {
    DEFAULT_FOLDER_ID.to_string()
}
