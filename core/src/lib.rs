//! # Quiz Generation Core
//!
//! Turns a [`QuizSpec`] into a structured [`Quiz`]:
//!
//! ```text
//! QuizSpec ──┬──────────────────────────────► PromptBuilder ──► LlmClient
//!            │                                     ▲                 │
//!            └─► ContextSelector (SemanticIndex) ──┘                 ▼
//!                                                           raw response
//!                                                                    │
//!                               Quiz ◄── QuizParser (per-type Grammar)
//! ```
//!
//! Failures of configuration, embedding, extraction and the model call are
//! surfaced as [`QuizError`] with a distinguishable [`ErrorKind`]. A response
//! that is only partly well-formed is never an error: affected fields fall
//! back to placeholder text and are reported by
//! [`QuestionRecord::degradations`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use quizgen_core::{ChatCompletionsClient, LlmConfig, QuizGenerator, QuizSpec};
//!
//! let llm = ChatCompletionsClient::from_env(LlmConfig::default(), "GROQ_API_KEY");
//! let generator = QuizGenerator::new(Arc::new(llm));
//! let quiz = generator.generate_quiz(&QuizSpec::new("Volcanoes"), None).await?;
//! ```

pub mod error;
pub mod export;
pub mod generator;
pub mod grammar;
pub mod llm;
pub mod model;
pub mod parser;
pub mod prompt;
pub mod session;

pub use error::{ErrorKind, ExportError, LlmError, QuizError, Result, SessionError};
pub use export::{ExportRequest, PlainTextExporter, QuizExporter, export_file_name};
pub use generator::QuizGenerator;
pub use grammar::{Grammar, OptionSet};
pub use llm::{ChatCompletionsClient, LlmClient, LlmConfig};
pub use model::{
    Degradation, Difficulty, MAX_QUESTIONS, MIN_QUESTIONS, NO_EXPLANATION, NO_HINT,
    QUESTION_PARSE_ERROR, QuestionRecord, QuestionType, Quiz, QuizSpec,
};
pub use parser::QuizParser;
pub use prompt::PromptBuilder;
pub use session::{QuestionResult, QuizSession, ScoreReport};
