//! # Embeddings
//!
//! Semantic embedding generation and nearest-neighbor passage search used to
//! ground quiz generation in an uploaded document.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Embeddings System                            │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  Passage ──► EmbeddingProvider ──► SemanticIndex ──► SearchHit  │
//! │                   │                      │                      │
//! │                   ▼                      ▼                      │
//! │        OpenAI / Hashing          cosine similarity              │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod index;
pub mod provider;
pub mod similarity;

pub use error::{EmbeddingError, Result};
pub use index::{Passage, SearchHit, SemanticIndex};
pub use provider::{EmbeddingProvider, HashingProvider, OpenAIProvider};
pub use similarity::cosine_similarity;

/// A dense vector embedding.
pub type Embedding = Vec<f32>;
