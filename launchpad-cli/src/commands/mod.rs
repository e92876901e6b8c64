//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod clean;
mod deploy;
mod output;
mod provision;
mod remote;

use anyhow::Result;
use clap::Subcommand;
use launchpad_runner::{Pipeline, PipelineConfig, RunContext, SystemRunner};
use std::sync::Arc;

/// Top-level CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Initialize the terraform working directory
    Init,
    /// Validate variables and show the terraform plan
    Plan,
    /// Provision the host, wait until it accepts ssh and write the inventory
    Apply,
    /// Validate variables, terraform definitions and the playbook syntax
    Validate,
    /// Configure the provisioned host with the playbook
    Deploy,
    /// Probe the deployed endpoints and write the evidence summary
    Verify,
    /// Destroy the provisioned infrastructure
    Destroy,
    /// Remove generated state files and evidence (never terraform state)
    Clean,
    /// Show health and statistics of the deployed API
    Health,
    /// Copy the task database off the host
    Backup,
    /// Open an interactive shell on the host
    Ssh,
    /// Run the full pipeline: apply, deploy, verify
    All,
}

/// Handle a CLI command
///
/// Every command gets a fresh run context; state shared between commands
/// lives in the state directory.
pub async fn handle_command(command: Commands, config: PipelineConfig) -> Result<()> {
    let mut ctx = RunContext::new(config);
    tracing::debug!(
        "Running {:?} (run {}, state in {})",
        command,
        ctx.run_id,
        ctx.state_dir().display()
    );
    let pipeline = Pipeline::new(Arc::new(SystemRunner::new()));

    match command {
        Commands::Init => provision::init(&pipeline, &ctx).await,
        Commands::Plan => provision::plan(&pipeline, &ctx).await,
        Commands::Apply => provision::apply(&pipeline, &mut ctx).await,
        Commands::Validate => provision::validate(&pipeline, &ctx).await,
        Commands::Destroy => provision::destroy(&pipeline, &mut ctx).await,
        Commands::Deploy => deploy::deploy(&pipeline, &mut ctx).await,
        Commands::Verify => deploy::verify(&pipeline, &mut ctx).await,
        Commands::All => deploy::all(&pipeline, &mut ctx).await,
        Commands::Clean => clean::clean(&mut ctx),
        Commands::Health => remote::health(&mut ctx).await,
        Commands::Backup => remote::backup(&pipeline, &mut ctx).await,
        Commands::Ssh => remote::ssh(&pipeline, &mut ctx).await,
    }
}
