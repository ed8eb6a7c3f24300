use thiserror::Error;

/// Validation failures for quiz questions arriving from the tutor endpoint.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question needs at least two options, got {len}")]
    TooFewOptions { len: usize },

    #[error("no option matches the correct answer")]
    MissingCorrectOption,
}
