//! Prompt construction for the three generation requests.
//!
//! [`PromptBuilder`] renders the natural-language instructions sent alongside
//! the page image (or extracted text), parameterised by [`Language`].  Three
//! prompts exist:
//!
//! * **quiz** — derive question/answer pairs strictly from the visible text.
//! * **extraction** — transcribe all visible text verbatim, no formatting.
//! * **speech** — read the extracted text aloud in the target language
//!   (kept short and direct; the TTS model is more reliable that way).

use crate::locale::Language;
use crate::quiz::MIN_QUIZ_ITEMS;

// ---------------------------------------------------------------------------
// PromptBuilder
// ---------------------------------------------------------------------------

/// Builds the per-language service instructions.
///
/// # Example
/// ```
/// use textbook_aide::gemini::PromptBuilder;
/// use textbook_aide::locale::Language;
///
/// let prompts = PromptBuilder::new(Language::Ml);
/// assert!(prompts.quiz_instruction().contains("Malayalam"));
/// ```
pub struct PromptBuilder {
    language: Language,
}

impl PromptBuilder {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    /// Instruction for the schema-constrained quiz request.
    pub fn quiz_instruction(&self) -> String {
        let lang = self.language.english_name();
        format!(
            "Analyze the provided image of a textbook page. The content may be in {lang}. \
             Your task is to create a quiz with questions and answers based *only* on the \
             text visible in the image. Generate at least {MIN_QUIZ_ITEMS} questions. \
             The questions and answers must be in {lang}."
        )
    }

    /// Instruction for the verbatim text-extraction request (speech stage 1).
    pub fn extraction_instruction(&self) -> String {
        let lang = self.language.english_name();
        format!(
            "Extract all text content from this image. The language could be {lang}. \
             Return only the raw text, with no formatting, labels, or explanations."
        )
    }

    /// Prompt for the audio-modality request (speech stage 2), embedding the
    /// text extracted in stage 1.
    pub fn speech_prompt(&self, text: &str) -> String {
        format!("Read the following text in {}: {text}", self.language.english_name())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiz_instruction_names_the_language() {
        let en = PromptBuilder::new(Language::En).quiz_instruction();
        assert!(en.contains("English"));
        assert!(!en.contains("Malayalam"));

        let ml = PromptBuilder::new(Language::Ml).quiz_instruction();
        assert!(ml.contains("Malayalam"));
    }

    #[test]
    fn quiz_instruction_asks_for_the_minimum_item_count() {
        let prompt = PromptBuilder::new(Language::En).quiz_instruction();
        assert!(prompt.contains("at least 5 questions"));
    }

    #[test]
    fn quiz_instruction_restricts_to_visible_text() {
        let prompt = PromptBuilder::new(Language::En).quiz_instruction();
        assert!(prompt.contains("*only*"));
        assert!(prompt.contains("visible in the image"));
    }

    #[test]
    fn extraction_instruction_asks_for_raw_text() {
        let prompt = PromptBuilder::new(Language::Ml).extraction_instruction();
        assert!(prompt.contains("Extract all text content"));
        assert!(prompt.contains("raw text"));
        assert!(prompt.contains("Malayalam"));
    }

    #[test]
    fn speech_prompt_embeds_the_extracted_text() {
        let prompt = PromptBuilder::new(Language::En).speech_prompt("The water cycle has stages.");
        assert_eq!(
            prompt,
            "Read the following text in English: The water cycle has stages."
        );
    }

    #[test]
    fn speech_prompt_uses_the_selected_language() {
        let prompt = PromptBuilder::new(Language::Ml).speech_prompt("ജലചക്രം");
        assert!(prompt.starts_with("Read the following text in Malayalam:"));
        assert!(prompt.contains("ജലചക്രം"));
    }
}
