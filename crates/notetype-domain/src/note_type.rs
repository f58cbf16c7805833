//! Note type module - the zettelkasten categories a note can be sorted into

/// Category of a note in a zettelkasten
///
/// Produced by matching a model's free-text answer against the known labels:
/// - Fleeting: quick captures, to be processed later
/// - Permanent: refined ideas in the author's own words
/// - Literature: notes about a source (book, article, talk)
/// - Unknown: the answer matched none of the labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoteType {
    /// The model's answer did not name a known category
    Unknown,

    /// Quick capture awaiting processing
    FleetingNote,

    /// Refined, standalone idea
    PermanentNote,

    /// Notes taken on a source
    LiteratureNote,
}

impl NoteType {
    /// Recognized categories, in matching priority order
    pub const MATCH_ORDER: [NoteType; 3] = [
        NoteType::FleetingNote,
        NoteType::PermanentNote,
        NoteType::LiteratureNote,
    ];

    /// Get the variant name, as written into note metadata
    pub fn as_str(&self) -> &'static str {
        match self {
            NoteType::Unknown => "Unknown",
            NoteType::FleetingNote => "FleetingNote",
            NoteType::PermanentNote => "PermanentNote",
            NoteType::LiteratureNote => "LiteratureNote",
        }
    }

    /// Get the human-readable label the model is asked to answer with
    pub fn label(&self) -> &'static str {
        match self {
            NoteType::Unknown => "Unknown",
            NoteType::FleetingNote => "Fleeting note",
            NoteType::PermanentNote => "Permanent note",
            NoteType::LiteratureNote => "Literature note",
        }
    }

    /// Map a completion's text to a note type
    ///
    /// Each label is searched for as a substring, in [`NoteType::MATCH_ORDER`].
    /// The first label found wins; text containing none of them is `Unknown`.
    pub fn from_completion(text: &str) -> Self {
        Self::MATCH_ORDER
            .into_iter()
            .find(|note_type| text.contains(note_type.label()))
            .unwrap_or(NoteType::Unknown)
    }

    /// Whether this is one of the recognized categories
    pub fn is_known(&self) -> bool {
        !matches!(self, NoteType::Unknown)
    }
}

impl std::fmt::Display for NoteType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
