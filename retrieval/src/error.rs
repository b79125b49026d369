//! Error types for document retrieval.

use thiserror::Error;

/// Result type alias for retrieval operations.
pub type Result<T> = std::result::Result<T, RetrievalError>;

/// Errors that can occur while ingesting documents or selecting context.
#[derive(Error, Debug)]
pub enum RetrievalError {
    /// Invalid chunking or selection parameters.
    #[error("configuration error: {0}")]
    Config(String),

    /// Embedding or index failure.
    #[error("embedding error: {0}")]
    Embedding(#[from] quizgen_embeddings::EmbeddingError),

    /// The source document could not be turned into text.
    #[error("extraction error: {0}")]
    Extraction(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
