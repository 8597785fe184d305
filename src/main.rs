use std::io;
use std::sync::Arc;

use clap::{CommandFactory, Parser};
use colored::*;
use tracing_subscriber::EnvFilter;

use persona_desk::cli::Args;
use persona_desk::config::{Config, EnvValues, FileConfig};
use persona_desk::web::{self, AppState};
use persona_desk::{AnswerError, AnswerGenerator, OpenAiClient};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{} {}", "error:".bright_red().bold(), e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if let Some(shell) = args.completions {
        clap_complete::generate(shell, &mut Args::command(), "persona-desk", &mut io::stdout());
        return Ok(());
    }

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("persona_desk=info")),
        )
        .with_writer(io::stderr)
        .init();

    let env = EnvValues::capture(args.env_file.as_deref());
    let file = match &args.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let config = Config::resolve(&args, file, env)?;
    tracing::info!(model = %config.model, temperature = config.temperature, "configuration loaded");

    let generator = AnswerGenerator::new(OpenAiClient::new(&config)?);

    if let Some(question) = &args.ask {
        config.require_api_key()?;
        return ask_once(&generator, question, &args.persona).await;
    }

    if config.api_key.is_none() {
        tracing::warn!("OPENAI_API_KEY not set; answers will fail until it is configured");
    }

    let state = Arc::new(AppState::new(generator));
    web::serve(&config.bind_addr(), state, !args.no_browser).await?;
    Ok(())
}

async fn ask_once(
    generator: &AnswerGenerator<OpenAiClient>,
    question: &str,
    persona: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("{}", "Generating answer...".dimmed());
    match generator.generate(question, persona).await {
        Ok(answer) => {
            println!("{}", answer.heading().bright_yellow().bold());
            println!("{}", answer.text);
            Ok(())
        }
        Err(AnswerError::EmptyQuestion) => {
            eprintln!("{}", AnswerError::EmptyQuestion.to_string().yellow());
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
