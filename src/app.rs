//! Application state controller.
//!
//! # Architecture
//!
//! [`StateController`] is the single owner of [`ControllerState`] — the
//! current image, quiz, audio artifact, error, language, and loading flag.
//! Every mutation goes through a named transition, and each transition
//! enforces the output invariant: at most one of {quiz, audio, error}
//! reflects the most recent request, and starting a new request clears the
//! previous outputs.
//!
//! # Transitions
//!
//! | Transition        | image | quiz/audio/error | loading gate |
//! |-------------------|-------|------------------|--------------|
//! | `upload_image`    | set   | cleared          | —            |
//! | `clear_image`     | unset | cleared          | —            |
//! | `change_language` | kept  | cleared          | —            |
//! | `request_quiz`    | kept  | cleared, then quiz or error | no-op while loading / without image |
//! | `request_audio`   | kept  | cleared, then audio or error | no-op while loading / without image |
//! | `request_pdf_export` | kept | untouched     | no-op on empty quiz |
//!
//! # Staleness guard
//!
//! Only one generation is supposed to be in flight (the loading gate), but
//! the gate is advisory for programmatic callers.  Every invalidating
//! transition bumps a generation counter and every request carries a
//! [`GenerationTicket`]; a completion whose ticket no longer matches is
//! discarded instead of overwriting newer state.

use std::path::PathBuf;

use crate::audio::AudioArtifact;
use crate::export::{ExportError, QuizExporter};
use crate::input::PageImage;
use crate::locale::Language;
use crate::pipeline::{GenerationError, GenerationOrchestrator, SpeechError};
use crate::quiz::QuizItem;

/// Title handed to the PDF export collaborator (file becomes `Quiz_quiz.pdf`).
pub const PDF_EXPORT_TITLE: &str = "Quiz";

// ---------------------------------------------------------------------------
// GenerationKind / GenerationTicket
// ---------------------------------------------------------------------------

/// Which generation operation a ticket belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationKind {
    Quiz,
    Speech,
}

/// Identifies one in-flight generation.
///
/// Obtained from [`StateController::begin_generation`]; a commit presenting
/// a ticket from a superseded generation is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationTicket {
    generation: u64,
    kind: GenerationKind,
}

// ---------------------------------------------------------------------------
// ControllerState
// ---------------------------------------------------------------------------

/// Everything the rendering surface needs, owned by [`StateController`].
#[derive(Debug)]
pub struct ControllerState {
    /// Content language; changing it invalidates generated outputs.
    pub language: Language,
    /// The uploaded page image, if any.
    pub image: Option<PageImage>,
    /// The most recent generated quiz (empty when none).
    pub quiz: Vec<QuizItem>,
    /// The most recent generated audio clip.
    pub audio: Option<AudioArtifact>,
    /// User-facing error message from the most recent failed request.
    pub error: Option<String>,
    /// Whether a generation request is outstanding.
    pub is_loading: bool,
    /// Localized progress message shown while loading.
    pub loading_message: Option<&'static str>,
}

impl ControllerState {
    fn new(language: Language) -> Self {
        Self {
            language,
            image: None,
            quiz: Vec::new(),
            audio: None,
            error: None,
            is_loading: false,
            loading_message: None,
        }
    }
}

// ---------------------------------------------------------------------------
// StateController
// ---------------------------------------------------------------------------

/// Single owner of the application state; mediates between the generation
/// orchestrator, the export collaborator, and whatever renders the state.
pub struct StateController {
    state: ControllerState,
    /// Bumped by every transition that invalidates in-flight work.
    generation: u64,
}

impl StateController {
    pub fn new(language: Language) -> Self {
        Self {
            state: ControllerState::new(language),
            generation: 0,
        }
    }

    /// Read access for renderers.
    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    /// Hand the current audio artifact to the caller (it owns the resource
    /// from then on; the controller's slot is emptied).
    pub fn take_audio(&mut self) -> Option<AudioArtifact> {
        self.state.audio.take()
    }

    // -----------------------------------------------------------------------
    // Invalidating transitions
    // -----------------------------------------------------------------------

    /// Replace the current image; previous outputs no longer apply.
    pub fn upload_image(&mut self, image: PageImage) {
        self.state.image = Some(image);
        self.invalidate_outputs();
    }

    /// Drop the image and everything generated from it.
    pub fn clear_image(&mut self) {
        self.state.image = None;
        self.invalidate_outputs();
    }

    /// Switch the content language.  Keeps the image — outputs in the old
    /// language are cleared.
    pub fn change_language(&mut self, language: Language) {
        self.state.language = language;
        self.invalidate_outputs();
    }

    /// Clear quiz, audio (releasing its resource), and error; supersede any
    /// in-flight generation.
    fn invalidate_outputs(&mut self) {
        self.state.quiz.clear();
        // Dropping a persisted artifact releases its file synchronously.
        self.state.audio = None;
        self.state.error = None;
        self.generation = self.generation.wrapping_add(1);
    }

    // -----------------------------------------------------------------------
    // Generation begin / commit
    // -----------------------------------------------------------------------

    /// Enter the loading state for a new generation.
    ///
    /// Returns `None` — leaving the state untouched — when there is no image
    /// or another generation is already in flight.
    pub fn begin_generation(&mut self, kind: GenerationKind) -> Option<GenerationTicket> {
        if self.state.image.is_none() || self.state.is_loading {
            return None;
        }

        self.invalidate_outputs();
        let strings = self.state.language.strings();
        self.state.is_loading = true;
        self.state.loading_message = Some(match kind {
            GenerationKind::Quiz => strings.loading_quiz,
            GenerationKind::Speech => strings.loading_audio,
        });

        Some(GenerationTicket {
            generation: self.generation,
            kind,
        })
    }

    /// Commit a quiz result, unless the ticket has been superseded.
    pub fn commit_quiz(
        &mut self,
        ticket: GenerationTicket,
        result: Result<Vec<QuizItem>, GenerationError>,
    ) {
        if !self.finish(ticket) {
            return;
        }
        match result {
            Ok(items) => self.state.quiz = items,
            Err(e) => {
                log::error!("quiz generation failed: {e}");
                self.state.error = Some(self.state.language.strings().error_quiz.to_string());
            }
        }
    }

    /// Commit a speech result, unless the ticket has been superseded.
    pub fn commit_speech(
        &mut self,
        ticket: GenerationTicket,
        result: Result<AudioArtifact, SpeechError>,
    ) {
        if !self.finish(ticket) {
            return;
        }
        match result {
            Ok(artifact) => self.state.audio = Some(artifact),
            Err(e) => {
                log::error!("speech generation failed: {e}");
                self.state.error = Some(self.state.language.strings().error_audio.to_string());
            }
        }
    }

    /// Leave the loading state.  Returns whether the result may be
    /// committed; a stale ticket still closes the gate (its request was the
    /// one that opened it) but must not touch the outputs.
    fn finish(&mut self, ticket: GenerationTicket) -> bool {
        self.state.is_loading = false;
        self.state.loading_message = None;

        if ticket.generation != self.generation {
            log::warn!(
                "discarding stale {:?} result (generation {} superseded by {})",
                ticket.kind,
                ticket.generation,
                self.generation
            );
            return false;
        }
        true
    }

    // -----------------------------------------------------------------------
    // High-level requests
    // -----------------------------------------------------------------------

    /// Generate a quiz for the current image.  No-op without an image or
    /// while another generation is loading.
    pub async fn request_quiz(&mut self, orchestrator: &GenerationOrchestrator) {
        let Some(ticket) = self.begin_generation(GenerationKind::Quiz) else {
            return;
        };
        // begin_generation only succeeds with an image present
        let Some(image) = self.state.image.clone() else {
            return;
        };
        let language = self.state.language;

        let result = orchestrator.produce_quiz(&image, language).await;
        self.commit_quiz(ticket, result);
    }

    /// Generate spoken audio for the current image.  No-op without an image
    /// or while another generation is loading.
    pub async fn request_audio(&mut self, orchestrator: &GenerationOrchestrator) {
        let Some(ticket) = self.begin_generation(GenerationKind::Speech) else {
            return;
        };
        let Some(image) = self.state.image.clone() else {
            return;
        };
        let language = self.state.language;

        let result = orchestrator.produce_speech(&image, language).await;
        self.commit_speech(ticket, result);
    }

    /// Hand the current quiz to the export collaborator.
    ///
    /// No-op (returns `None`) when the quiz is empty.  The controller's own
    /// state is never modified by an export.
    pub async fn request_pdf_export(
        &self,
        exporter: &dyn QuizExporter,
    ) -> Option<Result<PathBuf, ExportError>> {
        if self.state.quiz.is_empty() {
            return None;
        }
        Some(
            exporter
                .export(&self.state.quiz, PDF_EXPORT_TITLE, self.state.language)
                .await,
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
