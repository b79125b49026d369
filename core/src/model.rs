//! Quiz request and result types.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::error::{QuizError, Result};

/// Placeholder question text for a block with no recoverable question.
pub const QUESTION_PARSE_ERROR: &str = "Question parsing error";

/// Placeholder for a missing hint.
pub const NO_HINT: &str = "No hint provided";

/// Placeholder for a missing explanation.
pub const NO_EXPLANATION: &str = "No explanation provided";

/// Fewest questions a quiz may request.
pub const MIN_QUESTIONS: usize = 3;

/// Most questions a quiz may request.
pub const MAX_QUESTIONS: usize = 15;

/// How hard the questions should be.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    /// All difficulties, easiest first.
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for Difficulty {
    type Err = QuizError;

    fn from_str(s: &str) -> Result<Self> {
        Difficulty::ALL
            .into_iter()
            .find(|d| d.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| QuizError::Config(format!("unknown difficulty: {s}")))
    }
}

/// The kind of question to generate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestionType {
    #[default]
    MultipleChoice,
    TrueFalse,
    ShortAnswer,
}

impl QuestionType {
    /// All question types.
    pub const ALL: [QuestionType; 3] = [
        QuestionType::MultipleChoice,
        QuestionType::TrueFalse,
        QuestionType::ShortAnswer,
    ];

    /// Display label, as written into prompts.
    pub fn label(self) -> &'static str {
        match self {
            QuestionType::MultipleChoice => "MCQ",
            QuestionType::TrueFalse => "True/False",
            QuestionType::ShortAnswer => "Short Answer",
        }
    }

    fn variant_name(self) -> &'static str {
        match self {
            QuestionType::MultipleChoice => "MultipleChoice",
            QuestionType::TrueFalse => "TrueFalse",
            QuestionType::ShortAnswer => "ShortAnswer",
        }
    }

    /// Resolve a user-facing label or variant name, case-insensitively.
    ///
    /// Unrecognized labels resolve to [`QuestionType::MultipleChoice`].
    pub fn from_label(label: &str) -> Self {
        let wanted = label.trim();
        QuestionType::ALL
            .into_iter()
            .find(|t| {
                t.label().eq_ignore_ascii_case(wanted) || t.variant_name().eq_ignore_ascii_case(wanted)
            })
            .unwrap_or_else(|| {
                warn!("Unknown question type '{label}', defaulting to MCQ");
                QuestionType::MultipleChoice
            })
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What the caller asked for. Validated before any generation work starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizSpec {
    /// Subject of the quiz.
    pub topic: String,

    pub difficulty: Difficulty,

    pub question_type: QuestionType,

    /// Display name of the output language. Passed through unvalidated.
    pub language: String,

    /// Number of questions to request, within `MIN_QUESTIONS..=MAX_QUESTIONS`.
    pub question_count: usize,
}

impl QuizSpec {
    /// Create a spec for `topic` with default settings (Medium, MCQ, English, 5 questions).
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            difficulty: Difficulty::default(),
            question_type: QuestionType::default(),
            language: "English".to_string(),
            question_count: 5,
        }
    }

    /// Set the difficulty.
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Set the question type.
    pub fn with_question_type(mut self, question_type: QuestionType) -> Self {
        self.question_type = question_type;
        self
    }

    /// Set the output language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Set the number of questions.
    pub fn with_question_count(mut self, count: usize) -> Self {
        self.question_count = count;
        self
    }

    /// Check the topic is present and the question count is in range.
    pub fn validate(&self) -> Result<()> {
        if self.topic.trim().is_empty() {
            return Err(QuizError::Config("topic must not be empty".to_string()));
        }
        if !(MIN_QUESTIONS..=MAX_QUESTIONS).contains(&self.question_count) {
            return Err(QuizError::Config(format!(
                "question count must be between {MIN_QUESTIONS} and {MAX_QUESTIONS}, got {}",
                self.question_count
            )));
        }
        Ok(())
    }
}

/// A partially or fully extracted field problem in a [`QuestionRecord`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Degradation {
    /// Question text replaced by [`QUESTION_PARSE_ERROR`].
    MissingQuestion,

    /// A choice question with no option lines.
    MissingOptions,

    /// No correct answer found.
    MissingAnswer,

    /// The answer letter is not one of the parsed options.
    AnswerNotAnOption(String),

    /// Hint replaced by [`NO_HINT`].
    MissingHint,

    /// Explanation replaced by [`NO_EXPLANATION`].
    MissingExplanation,
}

impl fmt::Display for Degradation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Degradation::MissingQuestion => f.write_str("question text missing"),
            Degradation::MissingOptions => f.write_str("no options"),
            Degradation::MissingAnswer => f.write_str("answer missing"),
            Degradation::AnswerNotAnOption(letter) => {
                write!(f, "answer '{letter}' is not one of the options")
            }
            Degradation::MissingHint => f.write_str("hint missing"),
            Degradation::MissingExplanation => f.write_str("explanation missing"),
        }
    }
}

/// One parsed question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    /// Never empty; [`QUESTION_PARSE_ERROR`] when unrecoverable.
    pub question_text: String,

    /// Option letter to option text. Empty for short-answer questions.
    pub options: BTreeMap<char, String>,

    /// A letter for choice questions, free text for short answers.
    pub correct_answer: Option<String>,

    pub hint: String,

    pub explanation: String,
}

impl QuestionRecord {
    /// A record with every field at its placeholder.
    pub fn placeholder() -> Self {
        Self {
            question_text: QUESTION_PARSE_ERROR.to_string(),
            options: BTreeMap::new(),
            correct_answer: None,
            hint: NO_HINT.to_string(),
            explanation: NO_EXPLANATION.to_string(),
        }
    }

    /// Every field that fell back to a placeholder or failed validation.
    pub fn degradations(&self, question_type: QuestionType) -> Vec<Degradation> {
        let mut found = Vec::new();
        let choice = question_type != QuestionType::ShortAnswer;

        if self.question_text == QUESTION_PARSE_ERROR {
            found.push(Degradation::MissingQuestion);
        }
        if choice && self.options.is_empty() {
            found.push(Degradation::MissingOptions);
        }
        match &self.correct_answer {
            None => found.push(Degradation::MissingAnswer),
            Some(answer) if choice => {
                let known = answer
                    .chars()
                    .next()
                    .is_some_and(|letter| self.options.contains_key(&letter));
                if !known {
                    found.push(Degradation::AnswerNotAnOption(answer.clone()));
                }
            }
            Some(_) => {}
        }
        if self.hint == NO_HINT {
            found.push(Degradation::MissingHint);
        }
        if self.explanation == NO_EXPLANATION {
            found.push(Degradation::MissingExplanation);
        }
        found
    }
}

/// A generated quiz. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
    pub id: Uuid,

    pub spec: QuizSpec,

    pub questions: Vec<QuestionRecord>,

    pub created_at: DateTime<Utc>,
}

impl Quiz {
    /// Stamp a new quiz.
    pub fn new(spec: QuizSpec, questions: Vec<QuestionRecord>) -> Self {
        Self {
            id: Uuid::new_v4(),
            spec,
            questions,
            created_at: Utc::now(),
        }
    }

    /// Listing label: `"{topic} ({difficulty}, {language})"`.
    pub fn label(&self) -> String {
        format!(
            "{} ({}, {})",
            self.spec.topic, self.spec.difficulty, self.spec.language
        )
    }

    /// Number of questions.
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Check if the quiz has no questions.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_question_type_from_label() {
        assert_eq!(QuestionType::from_label("MCQ"), QuestionType::MultipleChoice);
        assert_eq!(QuestionType::from_label("true/false"), QuestionType::TrueFalse);
        assert_eq!(QuestionType::from_label("Short Answer"), QuestionType::ShortAnswer);
        assert_eq!(QuestionType::from_label("shortanswer"), QuestionType::ShortAnswer);
        assert_eq!(QuestionType::from_label("Essay"), QuestionType::MultipleChoice);
    }

    #[test]
    fn test_difficulty_from_str() {
        assert_eq!("hard".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert!("extreme".parse::<Difficulty>().is_err());
    }

    #[test]
    fn test_spec_validation() {
        assert!(QuizSpec::new("Rust").validate().is_ok());
        assert!(QuizSpec::new("   ").validate().is_err());
        assert!(QuizSpec::new("Rust").with_question_count(2).validate().is_err());
        assert!(QuizSpec::new("Rust").with_question_count(16).validate().is_err());
        assert!(QuizSpec::new("Rust").with_question_count(15).validate().is_ok());
    }

    #[test]
    fn test_placeholder_reports_every_degradation() {
        let record = QuestionRecord::placeholder();
        assert_eq!(
            record.degradations(QuestionType::MultipleChoice),
            vec![
                Degradation::MissingQuestion,
                Degradation::MissingOptions,
                Degradation::MissingAnswer,
                Degradation::MissingHint,
                Degradation::MissingExplanation,
            ]
        );
    }

    #[test]
    fn test_answer_outside_options_is_reported() {
        let record = QuestionRecord {
            question_text: "Pick one".to_string(),
            options: BTreeMap::from([('A', "x".to_string()), ('B', "y".to_string())]),
            correct_answer: Some("D".to_string()),
            hint: "h".to_string(),
            explanation: "e".to_string(),
        };
        assert_eq!(
            record.degradations(QuestionType::MultipleChoice),
            vec![Degradation::AnswerNotAnOption("D".to_string())]
        );
    }

    #[test]
    fn test_short_answer_needs_no_options() {
        let record = QuestionRecord {
            question_text: "Capital of France?".to_string(),
            options: BTreeMap::new(),
            correct_answer: Some("Paris".to_string()),
            hint: "h".to_string(),
            explanation: "e".to_string(),
        };
        assert!(record.degradations(QuestionType::ShortAnswer).is_empty());
    }

    #[test]
    fn test_quiz_label() {
        let spec = QuizSpec::new("Ancient Egypt")
            .with_difficulty(Difficulty::Hard)
            .with_language("French");
        let quiz = Quiz::new(spec, Vec::new());
        assert_eq!(quiz.label(), "Ancient Egypt (Hard, French)");
        assert!(quiz.is_empty());
    }
}
