//! Operational command handlers
//!
//! `health`, `backup` and `ssh` against the recorded host.

use anyhow::{Context, Result};
use colored::*;
use launchpad_client::TaskApiClient;
use launchpad_runner::{Pipeline, PipelineError, RunContext};

use super::output;

/// One-shot health and statistics of the deployed API
pub async fn health(ctx: &mut RunContext) -> Result<()> {
    let address = ctx.require_target()?.address.clone();
    let base_url = ctx.config.base_url(&address);
    let client = TaskApiClient::with_timeouts(
        &base_url,
        ctx.config.connect_timeout,
        ctx.config.connect_timeout * 2,
    )?;

    let health = client
        .health()
        .await
        .with_context(|| format!("health check against {} failed", base_url))?;

    let status = if health.status == "healthy" {
        health.status.green().bold()
    } else {
        health.status.red().bold()
    };
    println!("{}", format!("API at {}", base_url).bold());
    println!("  Status:     {}", status);
    println!("  Database:   {}", health.database);
    println!(
        "  Checked at: {}",
        health
            .timestamp
            .format("%Y-%m-%d %H:%M:%S UTC")
            .to_string()
            .dimmed()
    );

    match client.stats().await {
        Ok(stats) => {
            println!();
            println!("{}", "Tasks".bold());
            println!("  Total:      {}", stats.total_tasks);
            println!("  Completed:  {}", stats.completed_tasks);
            println!("  Pending:    {}", stats.pending_tasks);
            println!("  Completion: {:.2}%", stats.completion_rate);
        }
        Err(e) => output::warning(&format!("Could not fetch statistics: {}", e)),
    }

    Ok(())
}

/// Copies the remote SQLite database into the backups directory
pub async fn backup(pipeline: &Pipeline, ctx: &mut RunContext) -> Result<()> {
    output::step("Backing up task database");
    let destination = pipeline.remote().backup(ctx).await?;
    output::success(&format!("Backup written to {}", destination.display()));
    Ok(())
}

/// Interactive shell; a non-zero shell exit becomes the process exit code
pub async fn ssh(pipeline: &Pipeline, ctx: &mut RunContext) -> Result<()> {
    let exit_code = pipeline.remote().open_shell(ctx).await?;

    if exit_code != 0 {
        return Err(PipelineError::ToolFailed {
            tool: ctx.config.ssh_bin.clone(),
            exit_code,
            output: String::new(),
        }
        .into());
    }

    Ok(())
}
