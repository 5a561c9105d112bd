//! BizOps - Business Operations Copilot
//!
//! CLI entry point for chat, strategy plans, document analysis and the
//! executive dashboard.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use colored::Colorize;
use eyre::{Context, Result, eyre};
use tracing::{info, warn};

use bizops::chat::ChatSession;
use bizops::cli::{Cli, Command, OutputFormat};
use bizops::config::Config;
use bizops::copilot::{ConversationManager, DocumentAnalyzer, PlanRequester};
use bizops::dashboard::Dashboard;
use bizops::llm::{LlmClient, create_client};
use bizops::prompts::PromptLoader;
use bizops::render;

fn setup_logging(level: Option<&str>) -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("bizops")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Write to log file, not stdout/stderr
    let requested = level.unwrap_or("info");
    let (level, known) = match requested.parse::<tracing::Level>() {
        Ok(level) => (level, true),
        Err(_) => (tracing::Level::INFO, false),
    };
    let log_file = fs::File::create(log_dir.join("bizops.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    if !known {
        warn!("Unknown log level '{}', using info", requested);
    }
    info!("Logging initialized (level: {})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let log_level = cli
        .log_level
        .clone()
        .or_else(|| Config::load_log_level(cli.config.as_ref()));
    setup_logging(log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!(
        "BizOps loaded config: provider={}, model={}",
        config.llm.provider, config.llm.model
    );

    match cli.command {
        Command::Chat => cmd_chat(&config).await,
        Command::Ask { message } => cmd_ask(&config, &message).await,
        Command::Plan { goal, format } => cmd_plan(&config, &goal, format).await,
        Command::Analyze { file } => cmd_analyze(&config, file.as_deref()).await,
        Command::Dashboard { format } => cmd_dashboard(format),
    }
}

/// Reject blank input before any client is created
///
/// Only the check is whitespace-insensitive; the text is passed on as given.
fn require_input<'a>(value: &'a str, what: &str) -> Result<&'a str> {
    if value.trim().is_empty() {
        return Err(eyre!("{} must not be empty", what));
    }
    Ok(value)
}

fn build_client(config: &Config) -> Result<Arc<dyn LlmClient>> {
    create_client(&config.llm).context("Failed to create LLM client")
}

fn build_prompts(config: &Config) -> Arc<PromptLoader> {
    Arc::new(PromptLoader::new(config.prompts.dir.as_deref()))
}

/// Print a component failure and signal a non-zero exit
fn report_failure(message: impl std::fmt::Display) -> ExitCode {
    eprintln!("{}", message.to_string().red());
    ExitCode::FAILURE
}

/// Run the interactive chat
async fn cmd_chat(config: &Config) -> Result<ExitCode> {
    let manager = ConversationManager::new(build_client(config)?, build_prompts(config));
    let mut session = ChatSession::new(manager);
    session.run().await?;
    Ok(ExitCode::SUCCESS)
}

/// Ask a single question
async fn cmd_ask(config: &Config, message: &str) -> Result<ExitCode> {
    let message = require_input(message, "Message")?;
    let manager = ConversationManager::new(build_client(config)?, build_prompts(config));

    match manager.send_turn(message, &[]).await {
        Ok(reply) => {
            print!("{}", render::render_markdown(&reply));
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => Ok(report_failure(e)),
    }
}

/// Generate a strategy plan
async fn cmd_plan(config: &Config, goal: &str, format: OutputFormat) -> Result<ExitCode> {
    let goal = require_input(goal, "Goal")?;
    let requester = PlanRequester::new(build_client(config)?, build_prompts(config));

    // stderr keeps `--format json` output parseable
    eprintln!("{}", "Generating strategy...".dimmed());
    match requester.generate_plan(goal).await {
        Ok(plan) => {
            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&plan)?),
                OutputFormat::Text => print!("{}", render::render_plan(&plan)),
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => Ok(report_failure(e)),
    }
}

fn read_document(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) if path != Path::new("-") => {
            fs::read_to_string(path).context(format!("Failed to read {}", path.display()))
        }
        _ => {
            let mut document = String::new();
            std::io::stdin()
                .read_to_string(&mut document)
                .context("Failed to read document from stdin")?;
            Ok(document)
        }
    }
}

/// Analyze a document from a file or stdin
async fn cmd_analyze(config: &Config, file: Option<&Path>) -> Result<ExitCode> {
    let document = read_document(file)?;
    let document = require_input(&document, "Document")?;
    let analyzer = DocumentAnalyzer::new(build_client(config)?, build_prompts(config));

    match analyzer.analyze_text(document).await {
        Ok(analysis) => {
            print!("{}", render::render_markdown(&analysis));
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => Ok(report_failure(e)),
    }
}

/// Show the executive overview
fn cmd_dashboard(format: OutputFormat) -> Result<ExitCode> {
    let dashboard = Dashboard::sample();
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&dashboard)?),
        OutputFormat::Text => print!("{}", render::render_dashboard(&dashboard)),
    }
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_input_keeps_original_text() {
        let document = "  Q3 notes\n\n  - churn up 2%\n";
        assert_eq!(require_input(document, "Document").unwrap(), document);
    }

    #[test]
    fn test_require_input_rejects_blank() {
        let err = require_input(" \n\t", "Goal").unwrap_err();
        assert_eq!(err.to_string(), "Goal must not be empty");
    }
}
