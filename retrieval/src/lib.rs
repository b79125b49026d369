//! # Document Retrieval
//!
//! Grounds quiz generation in a source document:
//!
//! ```text
//! document bytes
//!       │  TextExtractor (plain text, PDF)
//!       ▼
//! plain text ──► TextChunker ──► Passages ──► SemanticIndex
//!                                                  │
//!                          topic ──► ContextSelector
//!                                                  │
//!                                                  ▼
//!                                          context string
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use quizgen_retrieval::{ContextSelector, DocumentIndexer, TextChunker};
//!
//! let indexer = DocumentIndexer::new(TextChunker::default(), provider);
//! let index = indexer.index_file(Path::new("lecture.pdf")).await?;
//! let context = ContextSelector::default().select(&index, "cell biology").await?;
//! ```

pub mod chunker;
pub mod config;
pub mod error;
pub mod extraction;
pub mod indexer;
pub mod selector;

pub use chunker::{Chunks, TextChunk, TextChunker};
pub use config::{ChunkerConfig, RetrievalConfig, SelectorConfig};
pub use error::{Result, RetrievalError};
pub use extraction::{PdfExtractor, PlainTextExtractor, TextExtractor, extractor_for_path};
pub use indexer::DocumentIndexer;
pub use selector::{ContextSelector, RetrievalQuery};
