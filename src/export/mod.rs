//! Quiz export — PDF rendering and supplementary font loading.
//!
//! This module provides:
//! * [`QuizExporter`] — async trait the state controller hands quizzes to.
//! * [`PdfExporter`] — `printpdf` implementation writing `<title>_quiz.pdf`.
//! * [`FontSource`] — loads the Noto Sans Malayalam face (file or HTTP).
//! * [`ExportError`] / [`FontLoadError`] — error variants (font errors are
//!   swallowed by the exporter, never surfaced).

pub mod font;
pub mod pdf;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use font::{FontLoadError, FontSource};
pub use pdf::{ExportError, PdfExporter, QuizExporter};
