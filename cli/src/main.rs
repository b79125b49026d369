mod cli;
mod config;
mod play;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use quizgen_core::{
    ChatCompletionsClient, ExportRequest, PlainTextExporter, QuizError, QuizExporter,
    QuizGenerator, QuizSession,
};
use quizgen_retrieval::{ContextSelector, DocumentIndexer, TextChunker};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command, GenerateArgs};
use crate::config::Config;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            match err.chain().find_map(|cause| cause.downcast_ref::<QuizError>()) {
                Some(quiz_err) => eprintln!("{}: {quiz_err}", quiz_err.kind()),
                None => eprintln!("error: {err:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr. Call after `.env` is loaded so it can set `RUST_LOG`.
fn init_tracing(verbose: u8) {
    let filter = log_filter(verbose, std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// `-v` flags take precedence over the `RUST_LOG` directive; an absent or
/// invalid directive means `info`.
fn log_filter(verbose: u8, directive: Option<&str>) -> EnvFilter {
    match (verbose, directive) {
        (0, Some(directive)) => {
            EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new("info"))
        }
        (0, None) => EnvFilter::new("info"),
        (1, _) => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = Config::load(cli.config.as_deref())?;
    match cli.command {
        Command::Generate(args) => generate(&config, &args).await,
    }
}

async fn generate(config: &Config, args: &GenerateArgs) -> anyhow::Result<ExitCode> {
    let spec = args.spec();
    spec.validate()?;

    let retrieval = config.retrieval_config(args.top_k);
    retrieval.validate().map_err(QuizError::from)?;

    let index = match &args.document {
        Some(path) => {
            let chunker =
                TextChunker::with_config(retrieval.chunker).map_err(QuizError::from)?;
            let indexer = DocumentIndexer::new(chunker, config.embedding_provider());
            let index = indexer.index_file(path).await.map_err(QuizError::from)?;
            info!("Indexed {} passages from {}", index.len(), path.display());
            Some(index)
        }
        None => None,
    };

    let llm = ChatCompletionsClient::from_env(config.llm_config(), &config.llm.api_key_env);
    if !llm.is_configured() {
        warn!("{} is not set", config.llm.api_key_env);
    }
    let selector = ContextSelector::new(retrieval.selector).map_err(QuizError::from)?;
    let generator = QuizGenerator::new(Arc::new(llm)).with_selector(selector);

    let quiz = generator.generate_quiz(&spec, index.as_ref()).await?;
    if quiz.is_empty() {
        eprintln!("no valid questions produced");
        return Ok(ExitCode::FAILURE);
    }

    let mut stdout = std::io::stdout().lock();
    play::write_preview(&mut stdout, &quiz, args.with_answers && !args.play)?;

    let mut session = QuizSession::new();
    let saved = session.save(quiz);
    session.select(saved)?;

    if args.play {
        let report = play::play(&mut session, std::io::stdin().lock(), &mut stdout)?;
        play::write_score(&mut stdout, &report)?;
    }

    if let Some(target) = &args.export {
        let Some(quiz) = session.current() else {
            anyhow::bail!("no quiz selected");
        };
        let exporter = PlainTextExporter;
        let mut request = ExportRequest::new(&quiz.spec, &quiz.questions);
        if args.with_answers || args.play {
            request = request.with_answers();
        }
        if args.play {
            request = request.with_user_answers(session.answers());
        }
        exporter
            .write_to(&request, target)
            .with_context(|| format!("failed to export to {}", target.display()))?;
    }

    Ok(ExitCode::SUCCESS)
}
