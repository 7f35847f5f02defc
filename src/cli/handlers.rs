//! Subcommand entry points; each returns the process exit code

use super::commands::{ServeArgs, ValidateArgs};
use super::output::OutputFormatter;
use crate::config::IdeaforgeConfig;
use crate::pipeline::{TranscriptLogger, ValidationError, ValidationOrchestrator};
use crate::progress::LoggingHandler;
use crate::server::{run_server, AppState};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, error};

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_INVALID_INPUT: i32 = 2;

/// Wires the configured model, store and transcript into an orchestrator
pub async fn build_orchestrator(config: &IdeaforgeConfig) -> Result<ValidationOrchestrator> {
    let llm = config
        .create_llm_client()
        .context("Failed to create LLM client")?;
    let store = config
        .store
        .open()
        .await
        .with_context(|| format!("Failed to open record store {}", config.store))?;
    let transcript = Arc::new(TranscriptLogger::new(config.transcript_file.clone()));

    Ok(
        ValidationOrchestrator::new(llm, store, config.pipeline_config())
            .with_progress_handler(Arc::new(LoggingHandler))
            .with_transcript(transcript),
    )
}

fn load_config() -> Result<IdeaforgeConfig> {
    let config = IdeaforgeConfig::from_env().context("Invalid environment configuration")?;
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

pub async fn handle_serve(args: &ServeArgs) -> i32 {
    match serve(args).await {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            EXIT_FAILURE
        }
    }
}

async fn serve(args: &ServeArgs) -> Result<()> {
    let mut config = load_config()?;
    if let Some(ref bind) = args.bind {
        config.bind = bind.clone();
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    let addr = config.socket_addr()?;
    debug!("{}", config);

    let orchestrator = Arc::new(build_orchestrator(&config).await?);
    run_server(AppState::new(orchestrator), addr).await
}

pub async fn handle_validate(args: &ValidateArgs) -> i32 {
    if args.idea.trim().is_empty() {
        eprintln!("Error: Invalid input: idea must be a non-empty string");
        return EXIT_INVALID_INPUT;
    }

    let mut config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return EXIT_FAILURE;
        }
    };
    if let Some(backend) = args.backend {
        config.provider = backend;
    }
    if let Some(ref model) = args.model {
        config.model = model.clone();
    }
    debug!("{}", config);

    let orchestrator = match build_orchestrator(&config).await {
        Ok(orchestrator) => orchestrator,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return EXIT_FAILURE;
        }
    };

    let report = match orchestrator
        .validate_idea(&args.idea, args.worklab.as_deref())
        .await
    {
        Ok(report) => report,
        Err(e @ ValidationError::InvalidInput(_)) => {
            eprintln!("Error: {}", e);
            return EXIT_INVALID_INPUT;
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            return EXIT_FAILURE;
        }
    };

    let formatter = OutputFormatter::new(args.format.into()).with_pretty(args.pretty);
    match formatter.format_report(&report) {
        Ok(output) => {
            println!("{}", output);
            EXIT_SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            EXIT_FAILURE
        }
    }
}
