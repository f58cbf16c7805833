//! Document implementations: Markdown files on disk and in-memory notes

use crate::frontmatter::{self, FrontMatterError};
use async_trait::async_trait;
use notetype_domain::Document;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while reading or updating a document
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The file could not be read or written
    #[error("{}: {source}", .path.display())]
    Io {
        /// File the operation was on
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The front matter could not be parsed or rendered
    #[error(transparent)]
    FrontMatter(#[from] FrontMatterError),
}

/// A Markdown note stored as a file
#[derive(Debug, Clone)]
pub struct FileDocument {
    path: PathBuf,
}

impl FileDocument {
    /// Create a document for the file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> DocumentError {
        DocumentError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[async_trait]
impl Document for FileDocument {
    type Error = DocumentError;

    async fn read_text(&self) -> Result<String, Self::Error> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| self.io_error(e))
    }

    async fn set_metadata(&mut self, key: &str, value: &str) -> Result<(), Self::Error> {
        let text = self.read_text().await?;
        let updated = frontmatter::set_field(&text, key, value)?;
        tokio::fs::write(&self.path, updated)
            .await
            .map_err(|e| self.io_error(e))?;

        debug!(path = %self.path.display(), key, value, "Front matter updated");
        Ok(())
    }
}

/// A note held in memory
///
/// For hosts that own the text themselves, and for tests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryDocument {
    text: String,
}

impl MemoryDocument {
    /// Create a document with the given text
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Get the current text
    pub fn text(&self) -> &str {
        &self.text
    }
}

#[async_trait]
impl Document for MemoryDocument {
    type Error = DocumentError;

    async fn read_text(&self) -> Result<String, Self::Error> {
        Ok(self.text.clone())
    }

    async fn set_metadata(&mut self, key: &str, value: &str) -> Result<(), Self::Error> {
        self.text = frontmatter::set_field(&self.text, key, value)?;
        Ok(())
    }
}
