//! Error types for quiz generation.

use std::fmt;

use quizgen_embeddings::EmbeddingError;
use quizgen_retrieval::RetrievalError;
use thiserror::Error;

/// Result type alias for quiz operations.
pub type Result<T> = std::result::Result<T, QuizError>;

/// Failures of the language-model collaborator.
#[derive(Error, Debug)]
pub enum LlmError {
    /// No API key or endpoint configured.
    #[error("language model not configured: {0}")]
    NotConfigured(String),

    /// The model did not answer in time.
    #[error("language model request timed out")]
    Timeout,

    /// Credentials were rejected.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Rate limit exceeded.
    #[error("rate limit exceeded{}", retry_hint(.retry_after_secs))]
    RateLimited { retry_after_secs: Option<u64> },

    /// Any other non-success response.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The model answered with no usable text.
    #[error("language model returned an empty response")]
    EmptyResponse,

    /// HTTP error.
    #[error("http error: {0}")]
    Http(reqwest::Error),
}

fn retry_hint(retry_after_secs: &Option<u64>) -> String {
    retry_after_secs
        .map(|secs| format!(", retry after {secs}s"))
        .unwrap_or_default()
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Http(err)
        }
    }
}

/// Errors surfaced by the generation pipeline.
#[derive(Error, Debug)]
pub enum QuizError {
    /// Invalid request or component parameters.
    #[error("configuration error: {0}")]
    Config(String),

    /// Document ingestion or context selection failed.
    #[error(transparent)]
    Retrieval(#[from] RetrievalError),

    /// Index build or query failed.
    #[error("embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    /// The language model call failed.
    #[error("generation error: {0}")]
    Generation(#[from] LlmError),
}

/// The distinguishable failure categories shown to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Embedding,
    Extraction,
    Generation,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Config => "ConfigError",
            ErrorKind::Embedding => "EmbeddingError",
            ErrorKind::Extraction => "ExtractionError",
            ErrorKind::Generation => "GenerationError",
        };
        f.write_str(name)
    }
}

impl QuizError {
    /// Category of this failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            QuizError::Config(_) => ErrorKind::Config,
            QuizError::Retrieval(RetrievalError::Config(_)) => ErrorKind::Config,
            QuizError::Retrieval(RetrievalError::Embedding(_)) => ErrorKind::Embedding,
            QuizError::Retrieval(RetrievalError::Extraction(_) | RetrievalError::Io(_)) => {
                ErrorKind::Extraction
            }
            QuizError::Embedding(_) => ErrorKind::Embedding,
            QuizError::Generation(_) => ErrorKind::Generation,
        }
    }
}

/// Misuse of a [`QuizSession`](crate::session::QuizSession).
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SessionError {
    /// No quiz has been selected yet.
    #[error("no quiz selected")]
    NoQuizSelected,

    /// Saved-quiz index out of range.
    #[error("quiz {index} does not exist ({len} saved)")]
    QuizOutOfRange { index: usize, len: usize },

    /// Question index out of range.
    #[error("question {index} does not exist ({len} questions)")]
    QuestionOutOfRange { index: usize, len: usize },
}

/// Failures while rendering an export.
#[derive(Error, Debug)]
pub enum ExportError {
    /// `user_answers` does not line up with the questions.
    #[error("expected {expected} user answers, got {actual}")]
    AnswerCountMismatch { expected: usize, actual: usize },

    /// Renderer-specific failure.
    #[error("render error: {0}")]
    Render(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
