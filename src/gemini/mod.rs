//! Generative-service client for the Gemini API.
//!
//! This module provides:
//! * [`GenerativeClient`] — async trait implemented by all service backends.
//! * [`GeminiClient`] — Gemini `generateContent` REST implementation.
//! * [`PromptBuilder`] — per-language quiz / extraction / speech prompts.
//! * [`ClientError`] — error variants for service calls.
//!
//! The client is an explicitly constructed object with an injected
//! credential; nothing in this module reads ambient process state.

pub mod client;
pub mod prompt;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use client::{ClientError, GeminiClient, GenerativeClient};
pub use prompt::PromptBuilder;
