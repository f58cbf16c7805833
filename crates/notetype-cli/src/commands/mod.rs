//! Command implementations.

pub mod classify;
pub mod settings;

pub use self::classify::{classify_notes, execute_classify, resolve_settings};
pub use self::settings::{execute_settings, update_settings};
