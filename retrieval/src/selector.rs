//! Topic-driven context selection.

use quizgen_embeddings::SemanticIndex;
use tracing::{debug, info};

use crate::config::SelectorConfig;
use crate::error::{Result, RetrievalError};

/// A single nearest-neighbor lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievalQuery {
    /// Query text sent to the embedder.
    pub text: String,

    /// Number of passages requested. Always greater than zero.
    pub k: usize,
}

impl RetrievalQuery {
    /// Create a query, rejecting `k == 0`.
    pub fn new(text: impl Into<String>, k: usize) -> Result<Self> {
        if k == 0 {
            return Err(RetrievalError::Config(
                "retrieval query must request at least one passage".to_string(),
            ));
        }
        Ok(Self {
            text: text.into(),
            k,
        })
    }
}

/// Selects the passages of an index most relevant to a quiz topic.
#[derive(Debug, Clone, Default)]
pub struct ContextSelector {
    config: SelectorConfig,
}

impl ContextSelector {
    /// Create a selector, rejecting `top_k == 0`.
    pub fn new(config: SelectorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The active configuration.
    pub fn config(&self) -> &SelectorConfig {
        &self.config
    }

    /// The retrieval query used for `topic`.
    pub fn query_for(&self, topic: &str) -> Result<RetrievalQuery> {
        RetrievalQuery::new(
            format!("{}{topic}", self.config.query_prefix),
            self.config.top_k,
        )
    }

    /// Retrieve the passages for `topic` and join them, most similar first.
    ///
    /// Passages are not deduplicated. Returns an empty string when nothing
    /// is retrieved.
    pub async fn select(&self, index: &SemanticIndex, topic: &str) -> Result<String> {
        let query = self.query_for(topic)?;
        let hits = index.search(&query.text, query.k).await?;

        for hit in &hits {
            debug!("Selected passage {} (score {:.3})", hit.passage_id, hit.score);
        }
        info!("Selected {} passages for topic '{topic}'", hits.len());

        let texts: Vec<&str> = hits.iter().map(|hit| hit.text.as_str()).collect();
        Ok(texts.join(&self.config.separator))
    }
}
