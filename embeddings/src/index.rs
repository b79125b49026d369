//! Semantic index over document passages.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::Embedding;
use crate::error::{EmbeddingError, Result};
use crate::provider::EmbeddingProvider;
use crate::similarity::{dot_product, normalize, top_k};

/// Number of passages sent to the provider per embedding request.
pub const BATCH_SIZE: usize = 32;

/// A contiguous slice of source text stored in the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passage {
    /// Position of the passage in the index.
    pub id: usize,

    /// The passage text.
    pub text: String,

    /// Character offset of the passage in the source document.
    pub source_offset: usize,
}

impl Passage {
    /// Create a new passage.
    pub fn new(id: usize, text: impl Into<String>, source_offset: usize) -> Self {
        Self {
            id,
            text: text.into(),
            source_offset,
        }
    }
}

/// A single search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// ID of the matched passage.
    pub passage_id: usize,

    /// Text of the matched passage.
    pub text: String,

    /// Cosine similarity between the query and the passage.
    pub score: f32,
}

/// An immutable, embedded collection of passages supporting nearest-neighbor search.
///
/// Every passage has exactly one unit-length vector. Scores are cosine
/// similarities, computed the same way at build and at query time. The
/// index has no mutating methods, so a shared reference can be queried from
/// any number of tasks at once.
pub struct SemanticIndex {
    passages: Vec<Passage>,
    embeddings: Vec<Embedding>,
    dimension: usize,
    provider: Arc<dyn EmbeddingProvider>,
}

impl SemanticIndex {
    /// Embed `passages` with `provider` and build an index.
    ///
    /// Fails with [`EmbeddingError::EmptyInput`] when there is nothing to
    /// index and propagates any provider failure unchanged.
    pub async fn build(
        provider: Arc<dyn EmbeddingProvider>,
        passages: Vec<Passage>,
    ) -> Result<Self> {
        if passages.is_empty() {
            return Err(EmbeddingError::EmptyInput);
        }

        info!(
            "Embedding {} passages with provider {} ({})",
            passages.len(),
            provider.name(),
            provider.default_model()
        );

        let mut embeddings = Vec::with_capacity(passages.len());
        for batch in passages.chunks(BATCH_SIZE) {
            let texts: Vec<String> = batch.iter().map(|p| p.text.clone()).collect();
            let vectors = provider.embed_batch(&texts).await?;
            if vectors.len() != texts.len() {
                return Err(EmbeddingError::InvalidResponse(format!(
                    "expected {} embeddings, got {}",
                    texts.len(),
                    vectors.len()
                )));
            }
            embeddings.extend(vectors);
            debug!("Embedded {}/{} passages", embeddings.len(), passages.len());
        }

        let dimension = embeddings.first().map_or(0, Vec::len);
        for embedding in &mut embeddings {
            if embedding.len() != dimension {
                return Err(EmbeddingError::DimensionMismatch {
                    expected: dimension,
                    actual: embedding.len(),
                });
            }
            normalize(embedding);
        }

        info!("Built semantic index with {} passages", passages.len());
        Ok(Self {
            passages,
            embeddings,
            dimension,
            provider,
        })
    }

    /// Build an index from plain chunk texts.
    ///
    /// Passage ids follow input order; source offsets are the running
    /// character count of the preceding chunks.
    pub async fn from_chunks<I, S>(provider: Arc<dyn EmbeddingProvider>, chunks: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut offset = 0;
        let passages = chunks
            .into_iter()
            .enumerate()
            .map(|(id, text)| {
                let text: String = text.into();
                let passage = Passage::new(id, text, offset);
                offset += passage.text.chars().count();
                passage
            })
            .collect();
        Self::build(provider, passages).await
    }

    /// Find the `k` passages most similar to `query`, best first.
    ///
    /// `k` is clamped to the number of passages.
    pub async fn search(&self, query: &str, k: usize) -> Result<Vec<SearchHit>> {
        if k == 0 {
            return Ok(Vec::new());
        }
        debug!("Searching index for: {query}");
        let query_embedding = self.provider.embed(query).await?;
        self.search_embedding(&query_embedding, k)
    }

    /// Find the `k` passages most similar to an already-computed query vector.
    pub fn search_embedding(&self, query: &[f32], k: usize) -> Result<Vec<SearchHit>> {
        if query.len() != self.dimension {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }

        let mut query = query.to_vec();
        normalize(&mut query);

        let scores = self
            .embeddings
            .iter()
            .enumerate()
            .map(|(position, embedding)| Ok((position, dot_product(&query, embedding)?)))
            .collect::<Result<Vec<_>>>()?;

        let k = k.min(self.passages.len());
        let hits = top_k(scores, k)
            .into_iter()
            .map(|(position, score)| {
                let passage = &self.passages[position];
                SearchHit {
                    passage_id: passage.id,
                    text: passage.text.clone(),
                    score,
                }
            })
            .collect();

        Ok(hits)
    }

    /// All indexed passages, in insertion order.
    pub fn passages(&self) -> &[Passage] {
        &self.passages
    }

    /// Get the number of passages in the index.
    pub fn len(&self) -> usize {
        self.passages.len()
    }

    /// Check if the index is empty. Always false for a successfully built index.
    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }

    /// Dimension of the stored vectors.
    pub fn dimension(&self) -> usize {
        self.dimension
    }
}

impl std::fmt::Debug for SemanticIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SemanticIndex")
            .field("passages", &self.passages.len())
            .field("dimension", &self.dimension)
            .field("provider", &self.provider.name())
            .finish()
    }
}
