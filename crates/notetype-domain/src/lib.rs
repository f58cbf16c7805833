//! Notetype Domain Layer
//!
//! Core vocabulary shared by every other crate: the note categories, the user's
//! credentials, and the traits a host implements so the classifier can read
//! and annotate notes without knowing where they live.
//!
//! ## Key Concepts
//!
//! - **NoteType**: Fleeting, Permanent or Literature note (or Unknown)
//! - **Settings**: Bearer token and folder id for the completion service
//! - **Document**: A note with front matter, owned by the host
//! - **SettingsStore**: Host-side persistence for settings

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod note_type;
pub mod settings;
pub mod traits;

// Re-exports for convenience
pub use note_type::NoteType;
pub use settings::Settings;
pub use traits::{Document, SettingsStore, NOTE_TYPE_KEY};
