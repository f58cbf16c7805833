//! Notetype Classifier
//!
//! Sorts zettelkasten notes into Fleeting, Permanent and Literature notes
//! using a completion model, and records the result in the note's front matter.
//!
//! # Architecture
//!
//! ```text
//! Document → read text → CompletionProvider → match label → noteType front matter
//! ```
//!
//! # Key Features
//!
//! - **Label Matching**: First of Fleeting / Permanent / Literature found in the answer wins
//! - **Front Matter Editing**: Only `noteType` changes; other fields and the body are kept
//! - **Recoverable Errors**: Authentication failures are reported apart from other errors
//! - **Silent Unknown**: An unrecognized answer leaves the note untouched
//!
//! # Example Usage
//!
//! ```
//! use notetype_classifier::{Classifier, ClassifyOutcome, MemoryDocument};
//! use notetype_domain::NoteType;
//! use notetype_llm::MockProvider;
//!
//! # async fn example() -> Result<(), notetype_classifier::ClassifyError> {
//! let classifier = Classifier::new(MockProvider::new("Literature note"));
//! let mut note = MemoryDocument::new("Notes on *Thinking, Fast and Slow*, ch. 3\n");
//!
//! let outcome = classifier.classify(Some(&mut note)).await?;
//!
//! assert_eq!(outcome.note_type(), NoteType::LiteratureNote);
//! assert!(note.text().starts_with("---\nnoteType: LiteratureNote\n---\n"));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod error;
mod prompt;
mod classifier;
pub mod document;
pub mod frontmatter;

#[cfg(test)]
mod tests;

pub use error::ClassifyError;
pub use prompt::{build_classify_prompt, CLASSIFY_PROMPT};
pub use classifier::{Classifier, ClassifyOutcome, EMPTY_DOCUMENT_TEXT};
pub use document::{DocumentError, FileDocument, MemoryDocument};
pub use frontmatter::{FrontMatter, FrontMatterError};
