//! Quiz export.
//!
//! Renderers implement [`QuizExporter`]. The crate ships a plain-text
//! renderer; document formats such as PDF plug in behind the same trait.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::ExportError;
use crate::model::{QuestionRecord, QuizSpec};

/// Everything a renderer needs.
#[derive(Debug, Clone, Copy)]
pub struct ExportRequest<'a> {
    pub spec: &'a QuizSpec,

    pub questions: &'a [QuestionRecord],

    /// Include correct answers, hints and explanations.
    pub include_answers: bool,

    /// The player's answers, parallel to `questions`.
    pub user_answers: Option<&'a [Option<String>]>,
}

impl<'a> ExportRequest<'a> {
    /// A question sheet without answers.
    pub fn new(spec: &'a QuizSpec, questions: &'a [QuestionRecord]) -> Self {
        Self {
            spec,
            questions,
            include_answers: false,
            user_answers: None,
        }
    }

    /// Include the answer key.
    pub fn with_answers(mut self) -> Self {
        self.include_answers = true;
        self
    }

    /// Include the player's answers.
    pub fn with_user_answers(mut self, answers: &'a [Option<String>]) -> Self {
        self.user_answers = Some(answers);
        self
    }

    fn validate(&self) -> Result<(), ExportError> {
        match self.user_answers {
            Some(answers) if answers.len() != self.questions.len() => {
                Err(ExportError::AnswerCountMismatch {
                    expected: self.questions.len(),
                    actual: answers.len(),
                })
            }
            _ => Ok(()),
        }
    }
}

/// Renders a quiz into a document byte stream.
pub trait QuizExporter {
    /// File extension of the produced document, without the dot.
    fn extension(&self) -> &str;

    fn export(&self, request: &ExportRequest<'_>) -> Result<Vec<u8>, ExportError>;

    /// Render `request` and write it to `target`, returning the written path.
    ///
    /// A directory target gets a file name from [`export_file_name`]; exports
    /// carrying the player's answers are named as results.
    fn write_to(&self, request: &ExportRequest<'_>, target: &Path) -> Result<PathBuf, ExportError> {
        let bytes = self.export(request)?;
        let path = if target.is_dir() {
            target.join(export_file_name(
                &request.spec.topic,
                request.user_answers.is_some(),
                self.extension(),
            ))
        } else {
            target.to_path_buf()
        };
        std::fs::write(&path, bytes)?;
        info!("Exported quiz to {}", path.display());
        Ok(path)
    }
}

/// File name for an exported quiz: spaces in the topic become underscores,
/// and results exports get a `_results` suffix.
pub fn export_file_name(topic: &str, results: bool, extension: &str) -> String {
    let stem = topic.trim().replace(' ', "_");
    let suffix = if results { "_results" } else { "" };
    format!("{stem}_quiz{suffix}.{extension}")
}

/// UTF-8 plain-text renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExporter;

impl PlainTextExporter {
    fn render(&self, request: &ExportRequest<'_>) -> Result<String, std::fmt::Error> {
        let spec = request.spec;
        let mut out = String::new();

        writeln!(out, "{} Quiz", spec.topic)?;
        writeln!(
            out,
            "Difficulty: {} | Type: {} | Language: {}",
            spec.difficulty, spec.question_type, spec.language
        )?;

        for (i, question) in request.questions.iter().enumerate() {
            writeln!(out)?;
            writeln!(out, "Q{}: {}", i + 1, question.question_text)?;
            for (letter, text) in &question.options {
                writeln!(out, "   {letter}) {text}")?;
            }

            if let Some(answers) = request.user_answers {
                let given = answers
                    .get(i)
                    .and_then(Option::as_deref)
                    .unwrap_or("(no answer)");
                writeln!(out, "   Your answer: {given}")?;
            }

            if request.include_answers {
                let correct = question.correct_answer.as_deref().unwrap_or("(unknown)");
                writeln!(out, "   Correct answer: {correct}")?;
                writeln!(out, "   Hint: {}", question.hint)?;
                writeln!(out, "   Explanation: {}", question.explanation)?;
            }
        }

        Ok(out)
    }
}

impl QuizExporter for PlainTextExporter {
    fn extension(&self) -> &str {
        "txt"
    }

    fn export(&self, request: &ExportRequest<'_>) -> Result<Vec<u8>, ExportError> {
        request.validate()?;
        let text = self
            .render(request)
            .map_err(|e| ExportError::Render(e.to_string()))?;
        Ok(text.into_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Difficulty, QuestionType};
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    fn questions() -> Vec<QuestionRecord> {
        vec![
            QuestionRecord {
                question_text: "What is 2+2?".to_string(),
                options: BTreeMap::from([('A', "3".to_string()), ('B', "4".to_string())]),
                correct_answer: Some("B".to_string()),
                hint: "Basic math".to_string(),
                explanation: "2+2=4".to_string(),
            },
            QuestionRecord::placeholder(),
        ]
    }

    fn spec() -> QuizSpec {
        QuizSpec::new("Arithmetic")
            .with_difficulty(Difficulty::Easy)
            .with_question_type(QuestionType::MultipleChoice)
    }

    fn render(request: &ExportRequest<'_>) -> String {
        String::from_utf8(PlainTextExporter.export(request).unwrap()).unwrap()
    }

    #[test]
    fn test_question_sheet_hides_answers() {
        let spec = spec();
        let questions = questions();
        let text = render(&ExportRequest::new(&spec, &questions));

        assert_eq!(
            text,
            "Arithmetic Quiz\n\
             Difficulty: Easy | Type: MCQ | Language: English\n\
             \n\
             Q1: What is 2+2?\n   A) 3\n   B) 4\n\
             \n\
             Q2: Question parsing error\n"
        );
    }

    #[test]
    fn test_answer_key_and_user_answers() {
        let spec = spec();
        let questions = questions();
        let answers = vec![Some("A".to_string()), None];
        let text = render(
            &ExportRequest::new(&spec, &questions)
                .with_answers()
                .with_user_answers(&answers),
        );

        assert!(text.contains("   B) 4\n   Your answer: A\n   Correct answer: B\n   Hint: Basic math\n   Explanation: 2+2=4\n"));
        assert!(text.contains("Q2: Question parsing error\n   Your answer: (no answer)\n   Correct answer: (unknown)\n"));
    }

    #[test]
    fn test_mismatched_user_answers_are_rejected() {
        let spec = spec();
        let questions = questions();
        let answers = vec![Some("A".to_string())];
        let result = PlainTextExporter
            .export(&ExportRequest::new(&spec, &questions).with_user_answers(&answers));

        assert!(matches!(
            result,
            Err(ExportError::AnswerCountMismatch {
                expected: 2,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_write_to_directory_names_the_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let spec = spec();
        let questions = questions();
        let answers = vec![Some("B".to_string()), None];

        let path = PlainTextExporter
            .write_to(
                &ExportRequest::new(&spec, &questions).with_user_answers(&answers),
                temp_dir.path(),
            )
            .unwrap();

        assert_eq!(path, temp_dir.path().join("Arithmetic_quiz_results.txt"));
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("Arithmetic Quiz\n"));
    }

    #[test]
    fn test_write_to_file_path() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let target = temp_dir.path().join("sheet.txt");
        let spec = spec();
        let questions = questions();

        let path = PlainTextExporter
            .write_to(&ExportRequest::new(&spec, &questions), &target)
            .unwrap();
        assert_eq!(path, target);
        assert!(target.exists());
    }

    #[test]
    fn test_write_to_unwritable_path_is_io_error() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let spec = spec();
        let questions = questions();

        let result = PlainTextExporter.write_to(
            &ExportRequest::new(&spec, &questions),
            &temp_dir.path().join("missing").join("sheet.txt"),
        );
        assert!(matches!(result, Err(ExportError::Io(_))));
    }

    #[test]
    fn test_export_file_name() {
        assert_eq!(export_file_name("Ancient Egypt", false, "pdf"), "Ancient_Egypt_quiz.pdf");
        assert_eq!(
            export_file_name("Ancient Egypt", true, "txt"),
            "Ancient_Egypt_quiz_results.txt"
        );
    }
}
