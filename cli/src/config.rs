//! `config.toml` loading.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use quizgen_core::LlmConfig;
use quizgen_core::llm::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use quizgen_embeddings::{EmbeddingProvider, HashingProvider, OpenAIProvider};
use quizgen_retrieval::{ChunkerConfig, RetrievalConfig, SelectorConfig};
use serde::Deserialize;
use tracing::{debug, info};

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub llm: LlmSection,
    pub embeddings: EmbeddingsSection,
    pub retrieval: RetrievalSection,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LlmSection {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
    pub timeout_secs: u64,
    /// Environment variable holding the API key.
    pub api_key_env: String,
}

impl Default for LlmSection {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            max_tokens: None,
            timeout_secs: 120,
            api_key_env: "GROQ_API_KEY".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Offline feature hashing.
    #[default]
    Hashing,
    /// OpenAI-compatible `/embeddings` API.
    OpenAI,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EmbeddingsSection {
    pub provider: ProviderKind,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub dimension: Option<usize>,
    pub timeout_secs: u64,
    pub api_key_env: String,
}

impl Default for EmbeddingsSection {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            model: None,
            base_url: None,
            dimension: None,
            timeout_secs: 30,
            api_key_env: "OPENAI_API_KEY".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RetrievalSection {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub top_k: usize,
}

impl Default for RetrievalSection {
    fn default() -> Self {
        let defaults = RetrievalConfig::default();
        Self {
            chunk_size: defaults.chunker.chunk_size,
            chunk_overlap: defaults.chunker.chunk_overlap,
            top_k: defaults.selector.top_k,
        }
    }
}

impl Config {
    /// `<config_dir>/quizgen/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("quizgen").join("config.toml"))
    }

    /// Load from `path`, or from the default location when `None`.
    ///
    /// An explicit path must exist; a missing default file means defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::read(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::read(&path),
                _ => {
                    debug!("No config file found, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    fn read(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config = Self::from_toml(&text)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse a TOML document.
    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Language-model settings.
    pub fn llm_config(&self) -> LlmConfig {
        let mut config = LlmConfig::default()
            .with_base_url(&self.llm.base_url)
            .with_model(&self.llm.model)
            .with_temperature(self.llm.temperature)
            .with_timeout(Duration::from_secs(self.llm.timeout_secs));
        if let Some(max_tokens) = self.llm.max_tokens {
            config = config.with_max_tokens(max_tokens);
        }
        config
    }

    /// Chunking and selection settings, with an optional `top_k` override.
    pub fn retrieval_config(&self, top_k: Option<usize>) -> RetrievalConfig {
        RetrievalConfig::default()
            .with_chunker(ChunkerConfig::new(
                self.retrieval.chunk_size,
                self.retrieval.chunk_overlap,
            ))
            .with_selector(
                SelectorConfig::default().with_top_k(top_k.unwrap_or(self.retrieval.top_k)),
            )
    }

    /// The configured embedding backend.
    pub fn embedding_provider(&self) -> Arc<dyn EmbeddingProvider> {
        let section = &self.embeddings;
        match section.provider {
            ProviderKind::Hashing => match section.dimension {
                Some(dimension) => Arc::new(HashingProvider::with_dimension(dimension)),
                None => Arc::new(HashingProvider::new()),
            },
            ProviderKind::OpenAI => {
                let mut provider =
                    OpenAIProvider::new().with_timeout(Duration::from_secs(section.timeout_secs));
                if let Ok(key) = std::env::var(&section.api_key_env) {
                    provider = provider.with_api_key(key);
                }
                if let Some(model) = &section.model {
                    provider = provider.with_model(model);
                }
                if let Some(base_url) = &section.base_url {
                    provider = provider.with_base_url(base_url);
                }
                if let Some(dimension) = section.dimension {
                    provider = provider.with_dimensions(dimension);
                }
                Arc::new(provider)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_empty_file_is_defaults() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
    }

    #[test]
    fn test_partial_sections_keep_defaults() {
        let config = Config::from_toml(
            r#"
            [llm]
            model = "llama-3.3-70b-versatile"
            max_tokens = 4096

            [embeddings]
            provider = "openai"
            dimension = 256

            [retrieval]
            top_k = 8
            "#,
        )
        .unwrap();

        assert_eq!(config.llm.model, "llama-3.3-70b-versatile");
        assert_eq!(config.llm.api_key_env, "GROQ_API_KEY");
        assert_eq!(config.embeddings.provider, ProviderKind::OpenAI);
        assert_eq!(config.retrieval.top_k, 8);
        assert_eq!(config.retrieval.chunk_size, 1000);

        let llm = config.llm_config();
        assert_eq!(llm.max_tokens, Some(4096));
        assert_eq!(llm.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_top_k_override() {
        let config = Config::default();
        assert_eq!(config.retrieval_config(None).selector.top_k, 5);
        assert_eq!(config.retrieval_config(Some(2)).selector.top_k, 2);
    }

    #[test]
    fn test_default_provider_is_offline() {
        let provider = Config::default().embedding_provider();
        assert_eq!(provider.name(), "hashing");
        assert!(provider.is_available());
    }

    #[test]
    fn test_load_explicit_path() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[retrieval]\nchunk_size = 500\nchunk_overlap = 50\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.retrieval.chunk_size, 500);
        assert_eq!(config.retrieval_config(None).chunker, ChunkerConfig::new(500, 50));
    }

    #[test]
    fn test_missing_explicit_path_is_error() {
        let temp_dir = TempDir::new().unwrap();
        assert!(Config::load(Some(&temp_dir.path().join("missing.toml"))).is_err());
    }

    #[test]
    fn test_unknown_provider_is_error() {
        assert!(Config::from_toml("[embeddings]\nprovider = \"word2vec\"\n").is_err());
    }
}
