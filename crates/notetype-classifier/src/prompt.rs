//! Prompt for note classification

use notetype_llm::Prompt;

/// System instruction sent with every classification
///
/// Asks, in Russian, which zettelkasten type the user's note is (Fleeting note,
/// Permanent note or Literature note) and to answer with the type only. The
/// labels stay in English so the answer can be matched against
/// [`NoteType::label`](notetype_domain::NoteType::label).
pub const CLASSIFY_PROMPT: &str = "Пользователь ведет заметки в стиле zettelkasten. \
Определи, к какому типу относится заметка, которую пришлет пользователь. \
Fleeting note, Permanent note, Literature note. ответь только типом заметки";

/// Build the classification prompt for a note's text
pub fn build_classify_prompt(note_text: &str) -> Prompt {
    Prompt::new(CLASSIFY_PROMPT, note_text)
}
