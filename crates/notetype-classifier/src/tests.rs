//! Integration tests for the Classifier

#[cfg(test)]
mod tests {
    use crate::{
        Classifier, ClassifyError, ClassifyOutcome, FrontMatter, MemoryDocument, CLASSIFY_PROMPT,
        EMPTY_DOCUMENT_TEXT,
    };
    use notetype_domain::{Document, NoteType};
    use notetype_llm::{LlmError, MockProvider};

    const NOTE: &str = "---\ntitle: Zettel 42\nnoteType: X\ntags:\n- ideas\n---\nA claim in my own words.\n";

    #[tokio::test]
    async fn test_full_classification_flow() {
        let llm = MockProvider::new("Permanent note");
        let classifier = Classifier::new(llm.clone());
        let mut doc = MemoryDocument::new(NOTE);

        let outcome = classifier.classify(Some(&mut doc)).await.unwrap();

        assert_eq!(
            outcome,
            ClassifyOutcome::Classified {
                note_type: NoteType::PermanentNote,
                written: true,
            }
        );

        let fm = FrontMatter::parse(doc.text()).unwrap();
        assert_eq!(fm.get("noteType"), Some("PermanentNote"));
        assert_eq!(fm.get("title"), Some("Zettel 42"));
        assert_eq!(fm.metadata().len(), 3);
        assert_eq!(fm.body(), "A claim in my own words.\n");

        // The whole note, front matter included, is the user turn
        let prompt = llm.last_prompt().unwrap();
        assert_eq!(prompt.system, CLASSIFY_PROMPT);
        assert_eq!(prompt.user, NOTE);
    }

    #[tokio::test]
    async fn test_ambiguous_answer_uses_priority() {
        let classifier = Classifier::new(MockProvider::new(
            "Could be a Literature note, but it reads like a Fleeting note.",
        ));
        let mut doc = MemoryDocument::new("quick idea");

        let outcome = classifier.classify(Some(&mut doc)).await.unwrap();

        assert_eq!(outcome.note_type(), NoteType::FleetingNote);
        assert!(doc.text().contains("noteType: FleetingNote"));
    }

    #[tokio::test]
    async fn test_unknown_answer_leaves_document_alone() {
        let classifier = Classifier::new(MockProvider::new("Это дневниковая запись"));
        let mut doc = MemoryDocument::new(NOTE);

        let outcome = classifier.classify(Some(&mut doc)).await.unwrap();

        assert_eq!(
            outcome,
            ClassifyOutcome::Unclassified {
                answer: "Это дневниковая запись".to_string()
            }
        );
        assert_eq!(doc.text(), NOTE);
    }

    #[tokio::test]
    async fn test_auth_error_reported_once_without_mutation() {
        let llm = MockProvider::failing(LlmError::Unauthenticated { status: 401 });
        let classifier = Classifier::new(llm.clone());
        let mut doc = MemoryDocument::new(NOTE);

        let result = classifier.classify(Some(&mut doc)).await;

        assert!(matches!(result, Err(ClassifyError::Auth(_))));
        assert_eq!(llm.call_count(), 1);
        assert_eq!(doc.text(), NOTE);
    }

    #[tokio::test]
    async fn test_empty_alternatives_is_unexpected() {
        let classifier = Classifier::new(MockProvider::failing(LlmError::InvalidResponse(
            "Response has no alternatives".to_string(),
        )));
        let mut doc = MemoryDocument::new(NOTE);

        let result = classifier.classify(Some(&mut doc)).await;

        assert!(matches!(result, Err(ClassifyError::Unexpected(_))));
        assert_eq!(doc.text(), NOTE);
    }

    #[tokio::test]
    async fn test_server_error_is_unexpected() {
        let classifier = Classifier::new(MockProvider::failing(LlmError::from_response(
            500,
            Some(13),
            "Internal error",
        )));
        let mut doc = MemoryDocument::new(NOTE);

        let err = classifier.classify(Some(&mut doc)).await.unwrap_err();

        assert!(!err.is_auth());
        assert!(err.to_string().contains("HTTP 500"));
    }

    #[tokio::test]
    async fn test_no_document_uses_placeholder() {
        let llm = MockProvider::new("Fleeting note");
        let classifier = Classifier::new(llm.clone());

        let outcome = classifier
            .classify::<MemoryDocument>(None)
            .await
            .unwrap();

        assert_eq!(
            outcome,
            ClassifyOutcome::Classified {
                note_type: NoteType::FleetingNote,
                written: false,
            }
        );
        assert_eq!(llm.last_prompt().unwrap().user, EMPTY_DOCUMENT_TEXT);
    }

    #[tokio::test]
    async fn test_repeat_classification_is_stable() {
        let classifier = Classifier::new(MockProvider::new("Literature note"));
        let mut doc = MemoryDocument::new(NOTE);

        classifier.classify(Some(&mut doc)).await.unwrap();
        let after_first = doc.read_text().await.unwrap();
        classifier.classify(Some(&mut doc)).await.unwrap();

        assert_eq!(doc.text(), after_first);
        let fm = FrontMatter::parse(doc.text()).unwrap();
        assert_eq!(fm.get("noteType"), Some("LiteratureNote"));
    }

    #[tokio::test]
    async fn test_classify_text() {
        let classifier = Classifier::new(MockProvider::new("  Permanent note\n"));
        let note_type = classifier.classify_text("Some idea").await.unwrap();
        assert_eq!(note_type, NoteType::PermanentNote);
    }

    #[tokio::test]
    async fn test_broken_front_matter_is_document_error() {
        let classifier = Classifier::new(MockProvider::new("Fleeting note"));
        let mut doc = MemoryDocument::new("---\n- not\n- a map\n---\nBody");

        let result = classifier.classify(Some(&mut doc)).await;

        assert!(matches!(result, Err(ClassifyError::Document(_))));
        assert_eq!(doc.text(), "---\n- not\n- a map\n---\nBody");
    }
}
