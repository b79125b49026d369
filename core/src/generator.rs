//! Quiz generation orchestration.
//!
//! One request runs strictly in sequence: optional context selection,
//! prompt construction, a single model call, and (for [`QuizGenerator::generate_quiz`])
//! parsing.

use std::sync::Arc;

use quizgen_embeddings::SemanticIndex;
use quizgen_retrieval::ContextSelector;
use tracing::{debug, info};

use crate::error::{LlmError, Result};
use crate::llm::LlmClient;
use crate::model::{Quiz, QuizSpec};
use crate::parser::QuizParser;
use crate::prompt::PromptBuilder;

/// Produces raw model responses and parsed quizzes for a [`QuizSpec`].
pub struct QuizGenerator {
    llm: Arc<dyn LlmClient>,
    selector: ContextSelector,
    prompts: PromptBuilder,
    parser: QuizParser,
}

impl QuizGenerator {
    /// Create a generator around a model client, with default context selection.
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self {
            llm,
            selector: ContextSelector::default(),
            prompts: PromptBuilder::new(),
            parser: QuizParser::new(),
        }
    }

    /// Use a custom context selector.
    pub fn with_selector(mut self, selector: ContextSelector) -> Self {
        self.selector = selector;
        self
    }

    /// The prompt that would be sent for `spec`, grounded in `index` when given.
    pub async fn prompt(&self, spec: &QuizSpec, index: Option<&SemanticIndex>) -> Result<String> {
        spec.validate()?;
        let context = match index {
            Some(index) => Some(self.selector.select(index, &spec.topic).await?),
            None => None,
        };
        if context.as_deref().is_some_and(str::is_empty) {
            info!("No passages retrieved; the model will rely on general knowledge");
        }
        Ok(self.prompts.build(spec, context.as_deref()))
    }

    /// Generate the raw model response for `spec`. The model is called exactly once.
    pub async fn generate(&self, spec: &QuizSpec, index: Option<&SemanticIndex>) -> Result<String> {
        let prompt = self.prompt(spec, index).await?;
        debug!("Prompt:\n{prompt}");

        let raw = self.llm.complete(&prompt).await?;
        if raw.trim().is_empty() {
            return Err(LlmError::EmptyResponse.into());
        }
        Ok(raw)
    }

    /// Generate and parse a quiz. The quiz may hold fewer questions than requested,
    /// or none at all when the response had no question headers.
    pub async fn generate_quiz(&self, spec: &QuizSpec, index: Option<&SemanticIndex>) -> Result<Quiz> {
        let raw = self.generate(spec, index).await?;
        let questions = self.parser.parse(&raw, spec.question_type);
        if questions.len() != spec.question_count {
            info!(
                "Requested {} questions, model produced {}",
                spec.question_count,
                questions.len()
            );
        }
        Ok(Quiz::new(spec.clone(), questions))
    }
}

impl std::fmt::Debug for QuizGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuizGenerator")
            .field("selector", &self.selector)
            .finish_non_exhaustive()
    }
}
