//! Document ingestion: bytes to text to passages to a semantic index.

use std::path::Path;
use std::sync::Arc;

use quizgen_embeddings::{EmbeddingError, EmbeddingProvider, Passage, SemanticIndex};
use tracing::info;

use crate::chunker::TextChunker;
use crate::error::{Result, RetrievalError};
use crate::extraction::{TextExtractor, extractor_for_path};

/// Builds a [`SemanticIndex`] from a source document.
pub struct DocumentIndexer {
    chunker: TextChunker,
    provider: Arc<dyn EmbeddingProvider>,
}

impl DocumentIndexer {
    /// Create an indexer from a chunker and an embedding provider.
    pub fn new(chunker: TextChunker, provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self { chunker, provider }
    }

    /// Split `text` into passages carrying their real source offsets.
    pub fn passages(&self, text: &str) -> Vec<Passage> {
        self.chunker
            .chunk(text)
            .enumerate()
            .map(|(id, chunk)| Passage::new(id, chunk.text, chunk.start))
            .collect()
    }

    /// Chunk and embed plain text.
    pub async fn index_text(&self, text: &str) -> Result<SemanticIndex> {
        let passages = self.passages(text);
        if passages.is_empty() {
            return Err(EmbeddingError::EmptyInput.into());
        }
        info!(
            "Split {} characters into {} passages",
            text.chars().count(),
            passages.len()
        );
        Ok(SemanticIndex::build(Arc::clone(&self.provider), passages).await?)
    }

    /// Extract text from `bytes` with `extractor`, then index it.
    ///
    /// Extraction is CPU-bound and runs on the blocking thread pool.
    pub async fn index_bytes(
        &self,
        extractor: Arc<dyn TextExtractor>,
        bytes: Vec<u8>,
    ) -> Result<SemanticIndex> {
        let name = extractor.name().to_string();
        let text = tokio::task::spawn_blocking(move || extractor.extract_text(&bytes))
            .await
            .map_err(|e| RetrievalError::Extraction(format!("extraction task failed: {e}")))??;
        info!("Extracted document text with {name} extractor");
        self.index_text(&text).await
    }

    /// Read a document from disk and index it, choosing the extractor by extension.
    pub async fn index_file(&self, path: &Path) -> Result<SemanticIndex> {
        let bytes = tokio::fs::read(path).await?;
        self.index_bytes(extractor_for_path(path), bytes).await
    }
}

impl std::fmt::Debug for DocumentIndexer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentIndexer")
            .field("chunker", &self.chunker)
            .field("provider", &self.provider.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RetrievalError;
    use crate::extraction::PlainTextExtractor;
    use pretty_assertions::assert_eq;
    use quizgen_embeddings::HashingProvider;
    use tempfile::TempDir;

    fn indexer(size: usize, overlap: usize) -> DocumentIndexer {
        DocumentIndexer::new(
            TextChunker::new(size, overlap).unwrap(),
            Arc::new(HashingProvider::new()),
        )
    }

    #[test]
    fn test_passages_carry_source_offsets() {
        let passages = indexer(10, 3).passages("abcdefghijklmnopqrstuvwxyz");
        let offsets: Vec<usize> = passages.iter().map(|p| p.source_offset).collect();
        let ids: Vec<usize> = passages.iter().map(|p| p.id).collect();

        assert_eq!(offsets, vec![0, 7, 14, 21]);
        assert_eq!(ids, vec![0, 1, 2, 3]);
    }

    #[tokio::test]
    async fn test_empty_document_is_embedding_error() {
        let result = indexer(100, 10).index_text("").await;
        assert!(matches!(
            result,
            Err(RetrievalError::Embedding(EmbeddingError::EmptyInput))
        ));
    }

    #[tokio::test]
    async fn test_index_bytes_builds_searchable_index() {
        let text = "Mitochondria produce energy for the cell.\n\n\
                    The French Revolution began in 1789.\n\n\
                    Photosynthesis converts light into chemical energy in plants.";
        let index = indexer(70, 5)
            .index_bytes(Arc::new(PlainTextExtractor), text.as_bytes().to_vec())
            .await
            .unwrap();

        assert_eq!(index.len(), 3);
        let hits = index.search("photosynthesis plants light", 1).await.unwrap();
        assert!(hits[0].text.contains("Photosynthesis"));
    }

    #[tokio::test]
    async fn test_index_bytes_propagates_extraction_error() {
        let result = indexer(100, 10)
            .index_bytes(Arc::new(PlainTextExtractor), vec![0xff, 0xfe, 0xfd])
            .await;
        assert!(matches!(result, Err(RetrievalError::Extraction(_))));
    }

    /// Records the thread extraction ran on.
    struct ThreadRecordingExtractor {
        thread: std::sync::Mutex<Option<std::thread::ThreadId>>,
    }

    impl TextExtractor for ThreadRecordingExtractor {
        fn name(&self) -> &str {
            "recording"
        }

        fn extract_text(&self, bytes: &[u8]) -> Result<String> {
            *self.thread.lock().unwrap() = Some(std::thread::current().id());
            Ok(String::from_utf8_lossy(bytes).into_owned())
        }
    }

    #[tokio::test]
    async fn test_extraction_runs_off_the_runtime_thread() {
        let extractor = Arc::new(ThreadRecordingExtractor {
            thread: std::sync::Mutex::new(None),
        });
        let index = indexer(100, 10)
            .index_bytes(extractor.clone(), b"Glaciers carve valleys.".to_vec())
            .await
            .unwrap();

        assert_eq!(index.len(), 1);
        let extracted_on = extractor.thread.lock().unwrap().unwrap();
        assert_ne!(extracted_on, std::thread::current().id());
    }

    #[tokio::test]
    async fn test_index_file_reads_text_documents() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("notes.txt");
        tokio::fs::write(&path, "Plate tectonics shapes continents.")
            .await
            .unwrap();

        let index = indexer(100, 10).index_file(&path).await.unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.passages()[0].text, "Plate tectonics shapes continents.");
    }

    #[tokio::test]
    async fn test_index_file_missing_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let result = indexer(100, 10)
            .index_file(&temp_dir.path().join("missing.txt"))
            .await;
        assert!(matches!(result, Err(RetrievalError::Io(_))));
    }
}
