use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use quizgen_core::{Difficulty, QuestionType, QuizSpec};

#[derive(Debug, Parser)]
#[command(name = "quizgen")]
#[command(about = "Generate quizzes on a topic, optionally grounded in a document", version)]
pub struct Cli {
    /// Path to config.toml (defaults to the user config directory).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a quiz and print it.
    Generate(GenerateArgs),
}

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Quiz topic.
    #[arg(long)]
    pub topic: String,

    /// Easy, Medium or Hard.
    #[arg(long, default_value = "Medium")]
    pub difficulty: Difficulty,

    /// MCQ, True/False or Short Answer.
    #[arg(long = "type", default_value = "MCQ", value_name = "TYPE")]
    pub question_type: String,

    /// Language the quiz is written in.
    #[arg(long, default_value = "English")]
    pub language: String,

    /// Number of questions to request.
    #[arg(long, default_value_t = 5)]
    pub count: usize,

    /// PDF or plain-text document to ground the questions in.
    #[arg(long, value_name = "PATH")]
    pub document: Option<PathBuf>,

    /// Passages retrieved from the document.
    #[arg(long)]
    pub top_k: Option<usize>,

    /// Write the quiz as text to this file or directory.
    #[arg(long, value_name = "PATH")]
    pub export: Option<PathBuf>,

    /// Include answers, hints and explanations in the preview and export.
    #[arg(long)]
    pub with_answers: bool,

    /// Answer the questions on stdin and print the score.
    #[arg(long)]
    pub play: bool,
}

impl GenerateArgs {
    pub fn spec(&self) -> QuizSpec {
        QuizSpec::new(self.topic.trim())
            .with_difficulty(self.difficulty)
            .with_question_type(QuestionType::from_label(&self.question_type))
            .with_language(self.language.trim())
            .with_question_count(self.count)
    }
}
