//! End-to-end tests of the grounded generation pipeline.
//!
//! A fixture document is indexed with the offline hashing embedder, a
//! scripted model client replays a recorded response, and the parsed quiz is
//! played and exported.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use quizgen_core::{
    Degradation, ErrorKind, ExportRequest, LlmClient, LlmError, NO_HINT, PlainTextExporter,
    QuestionType, QuizError, QuizExporter, QuizGenerator, QuizSession, QuizSpec,
};
use quizgen_embeddings::HashingProvider;
use quizgen_retrieval::{ContextSelector, DocumentIndexer, SelectorConfig, TextChunker};
use tempfile::TempDir;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

struct RecordedLlm {
    response: String,
    prompts: Mutex<Vec<String>>,
}

impl RecordedLlm {
    fn from_fixture(name: &str) -> Arc<Self> {
        let response = std::fs::read_to_string(fixtures_dir().join(name)).unwrap();
        Arc::new(Self {
            response,
            prompts: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl LlmClient for RecordedLlm {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.response.clone())
    }
}

fn indexer() -> DocumentIndexer {
    DocumentIndexer::new(
        TextChunker::new(300, 60).unwrap(),
        Arc::new(HashingProvider::new()),
    )
}

fn spec() -> QuizSpec {
    QuizSpec::new("photosynthesis chloroplasts chlorophyll")
        .with_question_type(QuestionType::MultipleChoice)
        .with_question_count(3)
}

#[tokio::test]
async fn test_document_grounded_quiz() {
    let index = indexer()
        .index_file(&fixtures_dir().join("photosynthesis.md"))
        .await
        .unwrap();
    assert!(index.len() > 1);

    let llm = RecordedLlm::from_fixture("response_mcq.txt");
    let generator = QuizGenerator::new(llm.clone())
        .with_selector(ContextSelector::new(SelectorConfig::default().with_top_k(2)).unwrap());

    let quiz = generator.generate_quiz(&spec(), Some(&index)).await.unwrap();

    let prompts = llm.prompts.lock().unwrap().clone();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("Context from document:\n"));
    assert!(prompts[0].contains("organelles called chloroplasts"));
    assert!(!prompts[0].contains("Westphalia"));

    assert_eq!(quiz.len(), 3);
    let answers: Vec<_> = quiz
        .questions
        .iter()
        .map(|q| q.correct_answer.as_deref())
        .collect();
    assert_eq!(answers, vec![Some("B"), Some("A"), None]);
    assert_eq!(quiz.questions[1].hint, NO_HINT);
    assert_eq!(
        quiz.questions[2].degradations(QuestionType::MultipleChoice),
        vec![Degradation::MissingAnswer]
    );
}

#[tokio::test]
async fn test_play_and_export_generated_quiz() {
    let llm = RecordedLlm::from_fixture("response_mcq.txt");
    let quiz = QuizGenerator::new(llm)
        .generate_quiz(&spec(), None)
        .await
        .unwrap();

    let mut session = QuizSession::new();
    let index = session.save(quiz);
    session.select(index).unwrap();
    session.answer(0, "B").unwrap();
    session.answer(1, "C").unwrap();
    session.answer(2, "C").unwrap();

    let report = session.submit().unwrap();
    assert_eq!((report.score, report.total), (1, 3));
    assert!(!report.results[2].is_correct);

    let quiz = session.current().unwrap();
    let bytes = PlainTextExporter
        .export(
            &ExportRequest::new(&quiz.spec, &quiz.questions)
                .with_answers()
                .with_user_answers(session.answers()),
        )
        .unwrap();
    let text = String::from_utf8(bytes).unwrap();

    assert!(text.starts_with("photosynthesis chloroplasts chlorophyll Quiz\n"));
    assert!(text.contains("Q3: Which enzyme catalyses the first step of carbon fixation?"));
    assert!(text.contains("   Your answer: C\n   Correct answer: (unknown)\n"));
}

#[tokio::test]
async fn test_empty_document_is_embedding_error() {
    let err = indexer().index_text("").await.unwrap_err();
    let err = QuizError::from(err);
    assert_eq!(err.kind(), ErrorKind::Embedding);
}

#[tokio::test]
async fn test_corrupt_pdf_is_extraction_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.pdf");
    std::fs::write(&path, b"%PDF-1.4 truncated").unwrap();

    let err = indexer().index_file(&path).await.unwrap_err();
    assert_eq!(QuizError::from(err).kind(), ErrorKind::Extraction);
}
