//! Prompt construction.

use crate::grammar::Grammar;
use crate::model::QuizSpec;

/// Builds the instruction text sent to the language model.
///
/// Pure string construction: the same spec and context always produce the
/// same prompt.
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build the prompt for `spec`, grounded in `context` when it is non-empty.
    pub fn build(&self, spec: &QuizSpec, context: Option<&str>) -> String {
        let grammar = Grammar::for_type(spec.question_type);
        let context = context.map(str::trim).filter(|c| !c.is_empty());
        let language = spec.language.as_str();
        let count = spec.question_count;

        let mut lines = Vec::new();
        let source = if context.is_some() {
            "Using the provided context, create"
        } else {
            "Create"
        };
        lines.push(format!(
            "You are a quiz generation expert. {source} {count} {} {} quiz questions on the topic: {} in {language} language.",
            spec.difficulty,
            grammar.question_type.label(),
            spec.topic
        ));
        lines.push(String::new());

        if let Some(context) = context {
            lines.push("Context from document:".to_string());
            lines.push(context.to_string());
            lines.push(String::new());
        }

        lines.push("Format each question as follows:".to_string());
        lines.push("### Question X".to_string());
        lines.push(format!("**Question:** [Question text here in {language}]"));
        lines.push(String::new());
        if grammar.has_options() {
            lines.push("Options:".to_string());
            lines.extend(grammar.option_template_lines(language));
            lines.push(String::new());
        }
        lines.push(format!(
            "**Answer:** {}",
            grammar.answer_placeholder.replace("{language}", language)
        ));
        lines.push(String::new());
        lines.push("**Hint:** [Hint text here]".to_string());
        lines.push(String::new());
        lines.push("**Explanation:** [Explanation text here]".to_string());
        lines.push(String::new());

        if context.is_some() {
            lines.push(format!(
                "Use ONLY information from the context to create accurate questions. If the context doesn't contain enough information about {}, use your general knowledge of the topic instead.",
                spec.topic
            ));
        }
        lines.push(format!(
            "Write exactly {count} questions at {} difficulty, replacing X with the question number starting from 1.",
            spec.difficulty.to_string().to_lowercase()
        ));
        lines.push(format!(
            "The entire quiz should be in {language}, including all questions, options, hints, and explanations. Keep the markers (### Question, **Question:**, Options:, **Answer:**, **Hint:**, **Explanation:**) exactly as shown."
        ));

        let mut prompt = lines.join("\n");
        prompt.push('\n');
        prompt
    }
}
