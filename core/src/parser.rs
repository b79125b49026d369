//! Turning a model's free-text answer into question records.
//!
//! Matching is deliberately permissive and line-oriented. Each field of a
//! question block is extracted independently, so one malformed line never
//! costs the rest of the block, and every `### Question <n>` header yields
//! exactly one record.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex_lite::Regex;
use tracing::{debug, info, warn};

use crate::grammar::{Grammar, OptionSet};
use crate::model::{
    Degradation, NO_EXPLANATION, NO_HINT, QUESTION_PARSE_ERROR, QuestionRecord, QuestionType,
};

#[allow(clippy::expect_used)]
static THINK_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<think>.*?</think>").expect("think block regex"));

#[allow(clippy::expect_used)]
static QUESTION_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mi)^[ \t]*#{2,4}[ \t]*Question[ \t]*\d+").expect("question header regex")
});

/// `**Field:** value`, `**Field**: value` or `**Field: value**`, optionally
/// behind a list bullet, a numbered-list prefix or a quote marker.
#[allow(clippy::expect_used)]
static FIELD_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(?:[-*+>]\s+|\d+[.)]\s+)?\*\*\s*(question|answer|hint|explanation)\s*(:\s*\*\*|\*\*\s*:|:)(.*)$",
    )
    .expect("field marker regex")
});

#[allow(clippy::expect_used)]
static OPTION_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:[-*+]\s+)?([A-D])\)\s*(.*\S)\s*$").expect("option line regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Field {
    Question,
    Answer,
    Hint,
    Explanation,
}

impl Field {
    fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "question" => Some(Field::Question),
            "answer" => Some(Field::Answer),
            "hint" => Some(Field::Hint),
            "explanation" => Some(Field::Explanation),
            _ => None,
        }
    }
}

/// Parses raw model output into [`QuestionRecord`]s. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuizParser;

impl QuizParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse `raw` using the grammar of `question_type`.
    ///
    /// Returns an empty vector when `raw` has no question headers; callers
    /// treat that as "no valid questions produced".
    pub fn parse(&self, raw: &str, question_type: QuestionType) -> Vec<QuestionRecord> {
        let grammar = Grammar::for_type(question_type);
        let text = normalize(raw);
        let blocks = split_blocks(&text);

        if blocks.is_empty() {
            warn!("Model response contains no question headers");
            return Vec::new();
        }

        let records: Vec<QuestionRecord> = blocks
            .iter()
            .map(|block| parse_block(block, grammar))
            .collect();

        let mut degraded = 0;
        for (i, record) in records.iter().enumerate() {
            let problems = record.degradations(question_type);
            if problems.is_empty() {
                continue;
            }
            degraded += 1;
            let summary: Vec<String> = problems.iter().map(ToString::to_string).collect();
            if problems.contains(&Degradation::MissingQuestion) {
                warn!("Question {}: {}", i + 1, summary.join(", "));
            } else {
                debug!("Question {}: {}", i + 1, summary.join(", "));
            }
        }

        info!(
            "Parsed {} {} questions ({degraded} degraded)",
            records.len(),
            question_type.label()
        );
        records
    }
}

fn normalize(raw: &str) -> String {
    let text = raw.replace("\r\n", "\n").replace('\r', "\n");
    THINK_BLOCK.replace_all(&text, "").into_owned()
}

/// Text between consecutive question headers. Preamble before the first header is dropped.
fn split_blocks(text: &str) -> Vec<&str> {
    let headers: Vec<_> = QUESTION_HEADER.find_iter(text).collect();
    headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            let end = headers.get(i + 1).map_or(text.len(), |next| next.start());
            &text[header.end()..end]
        })
        .collect()
}

fn parse_block(block: &str, grammar: &Grammar) -> QuestionRecord {
    let lines: Vec<&str> = block.lines().collect();
    let fields = extract_fields(&lines);

    let options = match grammar.options {
        OptionSet::None => BTreeMap::new(),
        OptionSet::Fixed(_) => grammar.fixed_options().unwrap_or_default(),
        OptionSet::Free(letters) => extract_options(&lines, letters),
    };

    let correct_answer = fields.get(&Field::Answer).and_then(|value| {
        if grammar.letter_answer() {
            grammar.answer_letter(value)
        } else {
            Some(value.clone())
        }
    });

    let field_or = |field: Field, sentinel: &str| {
        fields
            .get(&field)
            .cloned()
            .unwrap_or_else(|| sentinel.to_string())
    };

    QuestionRecord {
        question_text: field_or(Field::Question, QUESTION_PARSE_ERROR),
        options,
        correct_answer,
        hint: field_or(Field::Hint, NO_HINT),
        explanation: field_or(Field::Explanation, NO_EXPLANATION),
    }
}

/// First non-empty value of each field marker in the block.
fn extract_fields(lines: &[&str]) -> BTreeMap<Field, String> {
    let mut fields = BTreeMap::new();
    for (i, line) in lines.iter().enumerate() {
        let Some(caps) = FIELD_MARKER.captures(line) else {
            continue;
        };
        let Some(field) = caps.get(1).and_then(|m| Field::from_name(m.as_str())) else {
            continue;
        };
        if fields.contains_key(&field) {
            continue;
        }

        let mut inline = caps.get(3).map_or("", |m| m.as_str());
        // `**Answer: B**` closes the bold after the value.
        if caps.get(2).is_some_and(|m| m.as_str() == ":") {
            let trimmed = inline.trim_end();
            inline = trimmed.strip_suffix("**").unwrap_or(trimmed);
        }
        let value = clean_value(inline).or_else(|| continuation(&lines[i + 1..]));
        if let Some(value) = value {
            fields.insert(field, value);
        }
    }
    fields
}

/// Value for a marker whose own line is empty: the next non-blank line,
/// unless a marker or the options heading comes first.
fn continuation(rest: &[&str]) -> Option<String> {
    for line in rest {
        if line.trim().is_empty() {
            continue;
        }
        if FIELD_MARKER.is_match(line) || is_options_heading(line) {
            return None;
        }
        return clean_value(line);
    }
    None
}

/// Trim, and drop one balanced `**...**` wrapper. Other asterisks are content.
fn clean_value(value: &str) -> Option<String> {
    let value = value.trim();
    let value = if value.chars().all(|c| c == '*') {
        ""
    } else {
        value
            .strip_prefix("**")
            .and_then(|inner| inner.strip_suffix("**"))
            .unwrap_or(value)
            .trim()
    };
    (!value.is_empty()).then(|| value.to_string())
}

fn is_options_heading(line: &str) -> bool {
    line.trim()
        .trim_matches('*')
        .trim_end_matches(':')
        .trim_matches('*')
        .eq_ignore_ascii_case("options")
}

fn extract_options(lines: &[&str], letters: &[char]) -> BTreeMap<char, String> {
    let mut options = BTreeMap::new();
    for line in lines {
        let Some(caps) = OPTION_LINE.captures(line) else {
            continue;
        };
        let (Some(letter), Some(text)) = (
            caps.get(1).and_then(|m| m.as_str().chars().next()),
            caps.get(2),
        ) else {
            continue;
        };
        if letters.contains(&letter) {
            options
                .entry(letter)
                .or_insert_with(|| text.as_str().to_string());
        }
    }
    options
}
