//! Quiz data model and parsing of the service's structured response.
//!
//! The quiz endpoint is constrained by a response schema to return a JSON
//! array of `{question, answer}` objects; [`parse_quiz`] turns that JSON
//! text into `Vec<QuizItem>` and is the only place the shape is validated
//! locally.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Minimum number of question/answer pairs the quiz prompt asks the service
/// to produce.
pub const MIN_QUIZ_ITEMS: usize = 5;

// ---------------------------------------------------------------------------
// QuizItem
// ---------------------------------------------------------------------------

/// One generated question/answer pair.
///
/// Produced only by the remote service; immutable once created and replaced
/// wholesale by the next generation cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizItem {
    pub question: String,
    pub answer: String,
}

// ---------------------------------------------------------------------------
// Response schema
// ---------------------------------------------------------------------------

/// The structured-output schema sent with every quiz request.
///
/// Constrains the service to an array of objects with required `question`
/// and `answer` string fields (validated service-side; [`parse_quiz`] is the
/// local backstop).
pub fn response_schema() -> Value {
    serde_json::json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "question": { "type": "STRING" },
                "answer": { "type": "STRING" },
            },
            "required": ["question", "answer"],
        },
    })
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// The response text was not a JSON array of question/answer objects.
#[derive(Debug, Error)]
#[error("quiz payload was not a question/answer array: {0}")]
pub struct QuizParseError(#[from] serde_json::Error);

/// Parse the service's JSON text into quiz items.
///
/// Surrounding whitespace is tolerated (models occasionally pad the
/// payload); anything structurally off fails with [`QuizParseError`].
pub fn parse_quiz(json_text: &str) -> Result<Vec<QuizItem>, QuizParseError> {
    Ok(serde_json::from_str(json_text.trim())?)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_question_answer_array() {
        let json = r#"[
            {"question": "What is water made of?", "answer": "Hydrogen and oxygen."},
            {"question": "Name the process plants use to make food.", "answer": "Photosynthesis."}
        ]"#;
        let quiz = parse_quiz(json).unwrap();
        assert_eq!(quiz.len(), 2);
        assert_eq!(quiz[0].question, "What is water made of?");
        assert_eq!(quiz[1].answer, "Photosynthesis.");
    }

    #[test]
    fn tolerates_surrounding_whitespace() {
        let json = "\n  [{\"question\": \"q\", \"answer\": \"a\"}]  \n";
        assert_eq!(parse_quiz(json).unwrap().len(), 1);
    }

    #[test]
    fn parses_malayalam_content() {
        let json = r#"[{"question": "ചോദ്യം?", "answer": "ഉത്തരം"}]"#;
        let quiz = parse_quiz(json).unwrap();
        assert_eq!(quiz[0].question, "ചോദ്യം?");
    }

    #[test]
    fn rejects_non_array_payloads() {
        assert!(parse_quiz(r#"{"question": "q", "answer": "a"}"#).is_err());
        assert!(parse_quiz("plain prose, not JSON").is_err());
    }

    #[test]
    fn rejects_items_missing_required_fields() {
        assert!(parse_quiz(r#"[{"question": "q"}]"#).is_err());
    }

    #[test]
    fn empty_array_parses_to_empty_quiz() {
        assert!(parse_quiz("[]").unwrap().is_empty());
    }

    #[test]
    fn schema_requires_both_fields() {
        let schema = response_schema();
        assert_eq!(schema["type"], "ARRAY");
        let required = schema["items"]["required"].as_array().unwrap();
        assert!(required.iter().any(|v| v == "question"));
        assert!(required.iter().any(|v| v == "answer"));
    }
}
