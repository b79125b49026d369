//! Per-question-type output grammar.
//!
//! One descriptor per [`QuestionType`] drives both the prompt template and
//! the response parser, so the two cannot drift apart.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex_lite::Regex;

use crate::model::QuestionType;

#[allow(clippy::expect_used)]
static ANSWER_LETTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[(\[]?([A-Da-d])(?:$|[^A-Za-z0-9])").expect("answer letter regex")
});

/// Which option lines a question type carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionSet {
    /// No options (free-text answers).
    None,

    /// Model-written options under these letters.
    Free(&'static [char]),

    /// A fixed vocabulary that overrides whatever the model wrote.
    Fixed(&'static [(char, &'static str)]),
}

/// Output grammar for one question type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grammar {
    pub question_type: QuestionType,

    pub options: OptionSet,

    /// Placeholder written after the answer marker in the prompt.
    pub answer_placeholder: &'static str,
}

const MULTIPLE_CHOICE: Grammar = Grammar {
    question_type: QuestionType::MultipleChoice,
    options: OptionSet::Free(&['A', 'B', 'C', 'D']),
    answer_placeholder: "[Correct letter]",
};

const TRUE_FALSE: Grammar = Grammar {
    question_type: QuestionType::TrueFalse,
    options: OptionSet::Fixed(&[('A', "True"), ('B', "False")]),
    answer_placeholder: "[Correct letter: A or B]",
};

const SHORT_ANSWER: Grammar = Grammar {
    question_type: QuestionType::ShortAnswer,
    options: OptionSet::None,
    answer_placeholder: "[Short answer text in {language}]",
};

impl Grammar {
    /// The grammar for `question_type`.
    pub fn for_type(question_type: QuestionType) -> &'static Grammar {
        match question_type {
            QuestionType::MultipleChoice => &MULTIPLE_CHOICE,
            QuestionType::TrueFalse => &TRUE_FALSE,
            QuestionType::ShortAnswer => &SHORT_ANSWER,
        }
    }

    /// Whether an `Options:` block is part of the format.
    pub fn has_options(&self) -> bool {
        !matches!(self.options, OptionSet::None)
    }

    /// Whether the answer is a single option letter.
    pub fn letter_answer(&self) -> bool {
        self.has_options()
    }

    /// Option letters the model may use, in order.
    pub fn letters(&self) -> Vec<char> {
        match self.options {
            OptionSet::None => Vec::new(),
            OptionSet::Free(letters) => letters.to_vec(),
            OptionSet::Fixed(pairs) => pairs.iter().map(|&(letter, _)| letter).collect(),
        }
    }

    /// The fixed options, if this type has a fixed vocabulary.
    pub fn fixed_options(&self) -> Option<BTreeMap<char, String>> {
        match self.options {
            OptionSet::Fixed(pairs) => Some(
                pairs
                    .iter()
                    .map(|&(letter, text)| (letter, text.to_string()))
                    .collect(),
            ),
            _ => None,
        }
    }

    /// Map an answer written as an option's text (e.g. "True") to its letter.
    pub fn letter_for_text(&self, answer: &str) -> Option<char> {
        match self.options {
            OptionSet::Fixed(pairs) => pairs
                .iter()
                .find(|(_, text)| text.eq_ignore_ascii_case(answer))
                .map(|&(letter, _)| letter),
            _ => None,
        }
    }

    /// Read a choice answer such as `B`, `(b)`, `b) no` or `True` as an
    /// upper-case option letter. `None` for free-text grammars or when no
    /// letter can be recognized.
    pub fn answer_letter(&self, answer: &str) -> Option<String> {
        if !self.letter_answer() {
            return None;
        }
        let answer = answer.trim();
        if let Some(letter) = ANSWER_LETTER.captures(answer).and_then(|caps| caps.get(1)) {
            return Some(letter.as_str().to_ascii_uppercase());
        }

        let word = answer
            .split_whitespace()
            .next()?
            .trim_matches(|c: char| !c.is_alphanumeric());
        self.letter_for_text(word).map(String::from)
    }

    /// The prompt lines for the option block, without the `Options:` heading.
    pub fn option_template_lines(&self, language: &str) -> Vec<String> {
        match self.options {
            OptionSet::None => Vec::new(),
            OptionSet::Free(letters) => letters
                .iter()
                .map(|letter| format!("{letter}) [Option {letter} in {language}]"))
                .collect(),
            OptionSet::Fixed(pairs) => pairs
                .iter()
                .map(|(letter, text)| format!("{letter}) {text}"))
                .collect(),
        }
    }
}
