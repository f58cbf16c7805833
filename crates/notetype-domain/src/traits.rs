//! Trait definitions for host collaborators
//!
//! The classifier never touches files or settings storage directly. Whatever
//! hosts it (a CLI, an editor integration) implements these traits.

use crate::Settings;
use async_trait::async_trait;

/// Metadata key the classification result is written to
pub const NOTE_TYPE_KEY: &str = "noteType";

/// A note the classifier can read and annotate
///
/// Implemented by the application layer (notetype-classifier) and by hosts
#[async_trait]
pub trait Document: Send + Sync {
    /// Error type for document operations
    type Error: std::error::Error + Send + Sync + 'static;

    /// Read the full text of the document, front matter included
    async fn read_text(&self) -> Result<String, Self::Error>;

    /// Set one metadata (front matter) field, overwriting any prior value
    ///
    /// All other fields and the body must be left untouched.
    async fn set_metadata(&mut self, key: &str, value: &str) -> Result<(), Self::Error>;
}

/// Persistence for [`Settings`]
///
/// Implemented by the host (notetype-cli stores them as TOML)
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Error type for store operations
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load settings, falling back to defaults for anything not stored
    async fn load(&self) -> Result<Settings, Self::Error>;

    /// Persist settings
    async fn save(&self, settings: &Settings) -> Result<(), Self::Error>;
}
