//! Main Classifier implementation

use crate::error::ClassifyError;
use crate::prompt::build_classify_prompt;
use notetype_domain::{Document, NoteType, Settings, NOTE_TYPE_KEY};
use notetype_llm::{CompletionProvider, YandexGptConfig, YandexGptProvider};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Text sent in place of a note when there is no document
pub const EMPTY_DOCUMENT_TEXT: &str = "empty file";

/// Result of a classification that reached the model
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifyOutcome {
    /// The answer named a known note type
    Classified {
        /// The recognized type
        note_type: NoteType,
        /// Whether `noteType` was written to the document
        written: bool,
    },

    /// The answer matched no label; the document was left alone
    Unclassified {
        /// The model's raw answer
        answer: String,
    },
}

impl ClassifyOutcome {
    /// The note type, `Unknown` when unclassified
    pub fn note_type(&self) -> NoteType {
        match self {
            ClassifyOutcome::Classified { note_type, .. } => *note_type,
            ClassifyOutcome::Unclassified { .. } => NoteType::Unknown,
        }
    }
}

/// Sorts notes into zettelkasten types with a completion model
///
/// One classification is one sequential chain: read the note, ask the model,
/// match the answer, write `noteType` back. Nothing is retried.
pub struct Classifier<P> {
    provider: P,
}

impl Classifier<YandexGptProvider> {
    /// Create a classifier talking to YandexGPT with the given credentials
    ///
    /// `timeout` of `None` lets a request wait indefinitely.
    pub fn from_settings(settings: &Settings, timeout: Option<Duration>) -> Result<Self, ClassifyError> {
        settings.validate().map_err(ClassifyError::Config)?;

        let config = YandexGptConfig::from_settings(settings).with_timeout(timeout);
        let provider = YandexGptProvider::new(config)?;
        Ok(Self::new(provider))
    }
}

impl<P: CompletionProvider> Classifier<P> {
    /// Create a classifier over any completion provider
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Get the completion provider
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Classify a note's text without touching any document
    pub async fn classify_text(&self, text: &str) -> Result<NoteType, ClassifyError> {
        let (note_type, _) = self.ask(text).await?;
        Ok(note_type)
    }

    async fn ask(&self, text: &str) -> Result<(NoteType, String), ClassifyError> {
        let prompt = build_classify_prompt(text);

        let answer = self.provider.complete(&prompt).await.map_err(|e| {
            warn!(error = %e, "Completion failed");
            ClassifyError::from(e)
        })?;

        let note_type = NoteType::from_completion(&answer);
        debug!(answer = %answer.trim(), %note_type, "Completion matched");
        Ok((note_type, answer))
    }

    /// Classify a document and record the result in its front matter
    ///
    /// With no document, the placeholder [`EMPTY_DOCUMENT_TEXT`] is classified
    /// and nothing is written. A known type overwrites the `noteType` field;
    /// an unrecognized answer leaves the document unchanged.
    pub async fn classify<D: Document>(
        &self,
        document: Option<&mut D>,
    ) -> Result<ClassifyOutcome, ClassifyError> {
        let text = match &document {
            Some(doc) => doc
                .read_text()
                .await
                .map_err(|e| ClassifyError::Document(e.to_string()))?,
            None => {
                debug!("No active document, classifying placeholder text");
                EMPTY_DOCUMENT_TEXT.to_string()
            }
        };

        let (note_type, answer) = self.ask(&text).await?;
        if !note_type.is_known() {
            info!(answer = %answer.trim(), "Answer matched no note type");
            return Ok(ClassifyOutcome::Unclassified { answer });
        }

        let written = match document {
            Some(doc) => {
                doc.set_metadata(NOTE_TYPE_KEY, note_type.as_str())
                    .await
                    .map_err(|e| ClassifyError::Document(e.to_string()))?;
                true
            }
            None => false,
        };

        info!(%note_type, written, "Note classified");
        Ok(ClassifyOutcome::Classified { note_type, written })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_note_type() {
        let outcome = ClassifyOutcome::Classified {
            note_type: NoteType::PermanentNote,
            written: true,
        };
        assert_eq!(outcome.note_type(), NoteType::PermanentNote);

        let outcome = ClassifyOutcome::Unclassified {
            answer: "no idea".to_string(),
        };
        assert_eq!(outcome.note_type(), NoteType::Unknown);
    }

    #[test]
    fn test_from_settings_rejects_empty_token() {
        let result = Classifier::from_settings(&Settings::new("", "folder"), None);
        assert!(matches!(result, Err(ClassifyError::Config(_))));
    }

    #[test]
    fn test_from_settings() {
        let settings = Settings::new("token", "folder");
        let classifier = Classifier::from_settings(&settings, Some(Duration::from_secs(5))).unwrap();
        let config = classifier.provider().config();
        assert_eq!(config.folder_id, "folder");
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
    }
}
