//! Launchpad CLI
//!
//! Provisions, configures, verifies and tears down the task manager
//! deployment.
//!
//! Exit status is the failing external tool's exit code, or 1 for failures
//! detected by launchpad itself.

mod commands;
mod config;

use clap::Parser;
use colored::*;
use commands::{Commands, handle_command};
use config::ConfigArgs;
use launchpad_runner::PipelineError;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "launchpad")]
#[command(about = "Task manager deployment pipeline", long_about = None)]
struct Cli {
    /// Log filter used when RUST_LOG is not set
    #[arg(
        long,
        global = true,
        env = "LAUNCHPAD_LOG",
        default_value = "launchpad_cli=info,launchpad_runner=info,launchpad_client=info"
    )]
    log: String,

    #[command(flatten)]
    config: ConfigArgs,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries command output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cli.log.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let result = match cli.config.into_config() {
        Ok(config) => handle_command(cli.command, config).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report_error(&e),
    }
}

/// Prints the error and, for tool failures, the tool's raw output
fn report_error(err: &anyhow::Error) -> ExitCode {
    eprintln!("{} {:#}", "Error:".red().bold(), err);

    let Some(pipeline_err) = err.downcast_ref::<PipelineError>() else {
        return ExitCode::FAILURE;
    };

    if let Some(output) = pipeline_err.tool_output() {
        if !output.trim().is_empty() {
            eprintln!("{}", "─".repeat(80).dimmed());
            eprintln!("{}", output.trim_end());
            eprintln!("{}", "─".repeat(80).dimmed());
        }
    }

    ExitCode::from(exit_status(pipeline_err))
}

fn exit_status(err: &PipelineError) -> u8 {
    u8::try_from(err.exit_code()).unwrap_or(1)
}
