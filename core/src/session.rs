//! Interactive play state, owned by the caller.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SessionError;
use crate::grammar::Grammar;
use crate::model::{QuestionRecord, QuestionType, Quiz};

/// Outcome for one question after submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionResult {
    /// Zero-based question index.
    pub index: usize,

    pub given: Option<String>,

    pub correct: Option<String>,

    pub is_correct: bool,
}

/// Score for a submitted quiz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub score: usize,

    pub total: usize,

    /// `score / total * 100`, or 0 for an empty quiz.
    pub percentage: f64,

    pub results: Vec<QuestionResult>,
}

/// Saved quizzes plus the answers for the one being played.
#[derive(Debug, Clone, Default)]
pub struct QuizSession {
    saved: Vec<Quiz>,
    selected: Option<usize>,
    answers: Vec<Option<String>>,
    submitted: bool,
}

impl QuizSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a quiz to the saved list, returning its index.
    pub fn save(&mut self, quiz: Quiz) -> usize {
        self.saved.push(quiz);
        self.saved.len() - 1
    }

    /// All saved quizzes, oldest first.
    pub fn saved(&self) -> &[Quiz] {
        &self.saved
    }

    /// Listing labels for the saved quizzes.
    pub fn labels(&self) -> Vec<String> {
        self.saved.iter().map(Quiz::label).collect()
    }

    /// Make a saved quiz the one being played.
    ///
    /// Answers are cleared when the new quiz has a different question count.
    pub fn select(&mut self, index: usize) -> Result<&Quiz, SessionError> {
        let quiz = self.saved.get(index).ok_or(SessionError::QuizOutOfRange {
            index,
            len: self.saved.len(),
        })?;

        if self.answers.len() != quiz.len() {
            self.answers = vec![None; quiz.len()];
            self.submitted = false;
        }
        self.selected = Some(index);
        debug!("Selected quiz {index}: {}", quiz.label());
        Ok(quiz)
    }

    /// The quiz being played.
    pub fn current(&self) -> Option<&Quiz> {
        self.selected.and_then(|index| self.saved.get(index))
    }

    /// Answers recorded so far, one slot per question.
    pub fn answers(&self) -> &[Option<String>] {
        &self.answers
    }

    /// Whether the current quiz has been submitted.
    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// Record the answer to question `question_index` of the current quiz.
    pub fn answer(
        &mut self,
        question_index: usize,
        answer: impl Into<String>,
    ) -> Result<(), SessionError> {
        let len = self.current().ok_or(SessionError::NoQuizSelected)?.len();
        let slot = self
            .answers
            .get_mut(question_index)
            .ok_or(SessionError::QuestionOutOfRange {
                index: question_index,
                len,
            })?;
        *slot = Some(answer.into());
        Ok(())
    }

    /// Score the current quiz.
    pub fn submit(&mut self) -> Result<ScoreReport, SessionError> {
        let quiz = self.current().ok_or(SessionError::NoQuizSelected)?;
        let question_type = quiz.spec.question_type;

        let results: Vec<QuestionResult> = quiz
            .questions
            .iter()
            .enumerate()
            .map(|(index, question)| {
                let given = self.answers.get(index).cloned().flatten();
                let is_correct = given
                    .as_deref()
                    .is_some_and(|given| answer_matches(question, question_type, given));
                QuestionResult {
                    index,
                    given,
                    correct: question.correct_answer.clone(),
                    is_correct,
                }
            })
            .collect();

        let score = results.iter().filter(|r| r.is_correct).count();
        let total = results.len();
        let percentage = if total == 0 {
            0.0
        } else {
            score as f64 / total as f64 * 100.0
        };

        self.submitted = true;
        Ok(ScoreReport {
            score,
            total,
            percentage,
            results,
        })
    }

    /// Clear answers and the submitted flag, keeping the selection.
    pub fn reset(&mut self) {
        let len = self.current().map_or(0, Quiz::len);
        self.answers = vec![None; len];
        self.submitted = false;
    }
}

/// Letter answers compare exactly; free-text answers compare trimmed and
/// case-insensitively. A question with no known answer is never correct.
fn answer_matches(question: &QuestionRecord, question_type: QuestionType, given: &str) -> bool {
    let Some(correct) = question.correct_answer.as_deref() else {
        return false;
    };
    if Grammar::for_type(question_type).letter_answer() {
        given.trim() == correct
    } else {
        given.trim().to_lowercase() == correct.trim().to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuizSpec;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    fn question(answer: Option<&str>) -> QuestionRecord {
        QuestionRecord {
            question_text: "Q".to_string(),
            options: BTreeMap::from([('A', "x".to_string()), ('B', "y".to_string())]),
            correct_answer: answer.map(String::from),
            ..QuestionRecord::placeholder()
        }
    }

    fn quiz(question_type: QuestionType, answers: &[Option<&str>]) -> Quiz {
        let spec = QuizSpec::new("Topic").with_question_type(question_type);
        Quiz::new(spec, answers.iter().map(|a| question(*a)).collect())
    }

    #[test]
    fn test_save_and_select() {
        let mut session = QuizSession::new();
        assert_eq!(session.save(quiz(QuestionType::MultipleChoice, &[Some("A")])), 0);
        assert_eq!(session.save(quiz(QuestionType::TrueFalse, &[Some("B")])), 1);

        assert_eq!(session.labels(), vec!["Topic (Medium, English)"; 2]);
        assert!(session.select(1).is_ok());
        assert_eq!(session.current().map(|q| q.spec.question_type), Some(QuestionType::TrueFalse));
        assert_eq!(
            session.select(2).unwrap_err(),
            SessionError::QuizOutOfRange { index: 2, len: 2 }
        );
    }

    #[test]
    fn test_answer_requires_selection_and_valid_index() {
        let mut session = QuizSession::new();
        assert_eq!(session.answer(0, "A"), Err(SessionError::NoQuizSelected));

        session.save(quiz(QuestionType::MultipleChoice, &[Some("A")]));
        session.select(0).unwrap();
        assert_eq!(
            session.answer(3, "A"),
            Err(SessionError::QuestionOutOfRange { index: 3, len: 1 })
        );
        assert!(session.answer(0, "A").is_ok());
    }

    #[test]
    fn test_submit_scores_letters_exactly() {
        let mut session = QuizSession::new();
        session.save(quiz(
            QuestionType::MultipleChoice,
            &[Some("A"), Some("B"), None, Some("A")],
        ));
        session.select(0).unwrap();
        session.answer(0, "A").unwrap();
        session.answer(1, "A").unwrap();
        session.answer(2, "A").unwrap();

        let report = session.submit().unwrap();
        assert_eq!(report.score, 1);
        assert_eq!(report.total, 4);
        assert_eq!(report.percentage, 25.0);
        assert_eq!(
            report.results[2],
            QuestionResult {
                index: 2,
                given: Some("A".to_string()),
                correct: None,
                is_correct: false,
            }
        );
        assert_eq!(report.results[3].given, None);
        assert!(session.is_submitted());
    }

    #[test]
    fn test_short_answer_is_case_insensitive() {
        let mut session = QuizSession::new();
        session.save(quiz(QuestionType::ShortAnswer, &[Some("Paris")]));
        session.select(0).unwrap();
        session.answer(0, "  paris ").unwrap();

        assert_eq!(session.submit().unwrap().score, 1);
    }

    #[test]
    fn test_select_resets_answers_when_count_differs() {
        let mut session = QuizSession::new();
        session.save(quiz(QuestionType::MultipleChoice, &[Some("A"), Some("B")]));
        session.save(quiz(QuestionType::MultipleChoice, &[Some("B"), Some("A")]));
        session.save(quiz(QuestionType::MultipleChoice, &[Some("A")]));

        session.select(0).unwrap();
        session.answer(0, "A").unwrap();

        session.select(1).unwrap();
        assert_eq!(session.answers(), &[Some("A".to_string()), None]);

        session.select(2).unwrap();
        assert_eq!(session.answers(), &[None::<String>]);
    }

    #[test]
    fn test_reset_clears_answers() {
        let mut session = QuizSession::new();
        session.save(quiz(QuestionType::MultipleChoice, &[Some("A")]));
        session.select(0).unwrap();
        session.answer(0, "A").unwrap();
        session.submit().unwrap();

        session.reset();
        assert_eq!(session.answers(), &[None::<String>]);
        assert!(!session.is_submitted());
    }

    #[test]
    fn test_empty_quiz_scores_zero_percent() {
        let mut session = QuizSession::new();
        session.save(quiz(QuestionType::MultipleChoice, &[]));
        session.select(0).unwrap();

        let report = session.submit().unwrap();
        assert_eq!((report.score, report.total, report.percentage), (0, 0, 0.0));
    }
}
