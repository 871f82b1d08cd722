//! Textbook Aide — quizzes and spoken audio from a photo of a textbook page.
//!
//! # Architecture
//!
//! ```text
//! PageImage (input)
//!     │
//!     ▼
//! StateController (app) ── owns ControllerState, gates one generation at a time
//!     │
//!     ▼
//! GenerationOrchestrator (pipeline)
//!     ├─ produce_quiz    → GeminiClient::generate_structured → Vec<QuizItem>
//!     └─ produce_speech  → generate_text → generate_audio → WAV AudioArtifact
//!
//! QuizExporter (export) ← quiz + "Quiz" + language, writes Quiz_quiz.pdf
//! ```
//!
//! Everything is bilingual (English / Malayalam): prompts, progress and
//! error messages, and the PDF table come from the [`locale`] string tables.

pub mod app;
pub mod audio;
pub mod config;
pub mod export;
pub mod gemini;
pub mod input;
pub mod locale;
pub mod pipeline;
pub mod quiz;
