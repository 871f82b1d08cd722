//! Generation pipeline for the textbook aide.
//!
//! This module wires the image → service → quiz / audio pipelines behind
//! [`GenerationOrchestrator`].
//!
//! # Architecture
//!
//! ```text
//! StateController::request_quiz / request_audio
//!        │
//!        ▼
//! GenerationOrchestrator
//!        │
//!        ├─ produce_quiz    → generate_structured → parse → Vec<QuizItem>
//!        │
//!        └─ produce_speech
//!              ├─ stage 1: extract_text   → ExtractedText
//!              ├─ stage 2: synthesize     → SynthesizedAudio
//!              └─ stage 3: encode_artifact → AudioArtifact
//! ```

pub mod orchestrator;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use orchestrator::{
    ExtractedText, GenerationError, GenerationOrchestrator, SpeechError, SynthesizedAudio,
};
