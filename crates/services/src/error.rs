//! Shared error types for the services crate.

use thiserror::Error;

use imagier_core::QuestionError;

/// Errors emitted by `TutorService`. Every failure is surfaced to the user
/// as a static message and leaves the UI retryable; no status-specific
/// handling exists beyond "not 2xx".
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TutorError {
    #[error("tutor request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Question(#[from] QuestionError),
}
