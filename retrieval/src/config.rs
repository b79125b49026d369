//! Configuration for document chunking and context selection.

use serde::{Deserialize, Serialize};

use crate::error::{Result, RetrievalError};

/// Configuration for the whole retrieval stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// How documents are split into passages.
    pub chunker: ChunkerConfig,

    /// How passages are selected for a topic.
    pub selector: SelectorConfig,
}

impl RetrievalConfig {
    /// Set the chunker configuration.
    pub fn with_chunker(mut self, config: ChunkerConfig) -> Self {
        self.chunker = config;
        self
    }

    /// Set the selector configuration.
    pub fn with_selector(mut self, config: SelectorConfig) -> Self {
        self.selector = config;
        self
    }

    /// Check every section.
    pub fn validate(&self) -> Result<()> {
        self.chunker.validate()?;
        self.selector.validate()
    }
}

/// Configuration for the text chunker. Sizes are counted in characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkerConfig {
    /// Maximum characters per chunk.
    pub chunk_size: usize,

    /// Characters shared between consecutive chunks.
    pub chunk_overlap: usize,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
        }
    }
}

impl ChunkerConfig {
    /// Create a chunker configuration.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
        }
    }

    /// Reject sizes that cannot make progress.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(RetrievalError::Config(
                "chunk size must be greater than zero".to_string(),
            ));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(RetrievalError::Config(format!(
                "chunk overlap ({}) must be smaller than chunk size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }
        Ok(())
    }
}

/// Configuration for topic-driven passage selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Number of passages to retrieve.
    pub top_k: usize,

    /// Prepended to the topic to form the retrieval query.
    pub query_prefix: String,

    /// Placed between retrieved passages.
    pub separator: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            top_k: 5,
            query_prefix: "information about ".to_string(),
            separator: "\n\n".to_string(),
        }
    }
}

impl SelectorConfig {
    /// Set the number of passages to retrieve.
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Reject a selector that would never retrieve anything.
    pub fn validate(&self) -> Result<()> {
        if self.top_k == 0 {
            return Err(RetrievalError::Config(
                "top_k must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = RetrievalConfig::default();
        assert_eq!(config.chunker, ChunkerConfig::new(1000, 200));
        assert_eq!(config.selector.top_k, 5);
        assert_eq!(config.selector.query_prefix, "information about ");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overlap_must_be_smaller_than_size() {
        assert!(ChunkerConfig::new(100, 100).validate().is_err());
        assert!(ChunkerConfig::new(100, 150).validate().is_err());
        assert!(ChunkerConfig::new(0, 0).validate().is_err());
        assert!(ChunkerConfig::new(100, 99).validate().is_ok());
    }

    #[test]
    fn test_zero_top_k_is_rejected() {
        let config = RetrievalConfig::default().with_selector(SelectorConfig::default().with_top_k(0));
        assert!(matches!(config.validate(), Err(RetrievalError::Config(_))));
    }
}
