//! Deployment command handlers
//!
//! `deploy`, `verify` and the full pipeline `all`.

use anyhow::Result;
use colored::*;
use launchpad_core::domain::evidence::EvidencePhase;
use launchpad_runner::{Pipeline, RunContext};

use super::output;

/// Configure the host recorded by a previous `apply`
pub async fn deploy(pipeline: &Pipeline, ctx: &mut RunContext) -> Result<()> {
    output::step("Configuring host");
    pipeline.configure(ctx).await?;
    output::success("Host configured");
    Ok(())
}

/// Probe the endpoints, then write the summary whatever the outcome
pub async fn verify(pipeline: &Pipeline, ctx: &mut RunContext) -> Result<()> {
    output::step("Verifying deployment");
    let result = pipeline.verify(ctx).await;

    match &result {
        Ok(report) => {
            output::verification_report(report);
            for warning in report.warnings() {
                output::warning(&warning);
            }
            ctx.evidence.set_outcome("verification passed");
        }
        Err(e) => ctx.evidence.set_outcome(format!("verification failed: {}", e)),
    }

    let summary_written = ctx.evidence.summarize();
    result?;
    summary_written?;

    output::success(&format!(
        "Verification passed, evidence in {}",
        ctx.evidence.dir().display()
    ));
    Ok(())
}

/// apply → deploy → verify, with a summary at the end
pub async fn all(pipeline: &Pipeline, ctx: &mut RunContext) -> Result<()> {
    output::step("Running full deployment pipeline");
    let report = pipeline.run_all(ctx).await?;

    output::verification_report(&report);
    for warning in report.warnings() {
        output::warning(&warning);
    }

    let address = ctx
        .target()
        .map(|target| ctx.config.base_url(&target.address))
        .unwrap_or_default();
    output::success(&format!("Deployment complete: {}", address.bold()));
    println!(
        "  Summary: {}",
        ctx.evidence.path(EvidencePhase::Summary).display()
    );
    Ok(())
}
