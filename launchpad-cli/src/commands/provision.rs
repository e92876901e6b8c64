//! Provisioning command handlers
//!
//! `init`, `plan`, `validate`, `apply` and `destroy`.

use anyhow::Result;
use launchpad_runner::{Pipeline, RunContext, vars};

use super::output;

/// `terraform init`
pub async fn init(pipeline: &Pipeline, ctx: &RunContext) -> Result<()> {
    let result = pipeline.provisioner().init(ctx).await?;
    output::tool_output(&result);
    output::success("Terraform initialized");
    Ok(())
}

/// Validate variables, then `terraform plan`
pub async fn plan(pipeline: &Pipeline, ctx: &RunContext) -> Result<()> {
    vars::load_variables(&ctx.config.vars_file)?;

    let result = pipeline.provisioner().plan(ctx).await?;
    output::tool_output(&result);
    Ok(())
}

/// Variables, terraform definitions and playbook syntax
pub async fn validate(pipeline: &Pipeline, ctx: &RunContext) -> Result<()> {
    output::step("Validating deployment variables");
    vars::load_variables(&ctx.config.vars_file)?;
    output::success(&format!("{} is valid", ctx.config.vars_file.display()));

    output::step("Validating terraform definitions");
    let result = pipeline.provisioner().validate(ctx).await?;
    output::tool_output(&result);

    output::step("Checking playbook syntax");
    let result = pipeline.configurator().syntax_check(ctx).await?;
    output::tool_output(&result);

    output::success("Validation passed");
    Ok(())
}

/// Provision, wait for readiness, write the inventory
pub async fn apply(pipeline: &Pipeline, ctx: &mut RunContext) -> Result<()> {
    output::step("Provisioning infrastructure");
    let target = pipeline.provision(ctx).await?;

    output::success(&format!("Host {} is ready", target));
    println!("  Inventory: {}", ctx.inventory_path().display());
    println!("  Evidence:  {}", ctx.evidence.dir().display());
    Ok(())
}

/// `terraform destroy`
pub async fn destroy(pipeline: &Pipeline, ctx: &mut RunContext) -> Result<()> {
    output::step("Destroying infrastructure");
    pipeline.destroy(ctx).await?;
    output::success("Infrastructure destroyed");
    Ok(())
}
