//! Provisioning invoker
//!
//! Drives terraform to create and destroy the deployment host, its network
//! access policy and its key pair. Raw tool output always lands in evidence,
//! success or failure. Provisioning failures are never retried.

use launchpad_core::domain::evidence::EvidencePhase;
use launchpad_core::domain::target::DeploymentTarget;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use crate::context::{RunContext, remove_if_exists};
use crate::error::{PipelineError, Result};
use crate::invoker::{CommandRunner, Invocation, ToolOutput};

/// terraform output holding the instance's public address
pub const OUTPUT_ADDRESS: &str = "instance_public_ip";
/// terraform output holding the provider instance id
pub const OUTPUT_INSTANCE_ID: &str = "instance_id";
/// terraform output holding the generated private key
pub const OUTPUT_PRIVATE_KEY: &str = "private_key_pem";

/// Result of a successful apply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Provisioned {
    pub target: DeploymentTarget,
    /// Where the generated credential was written (mode 0400)
    pub credential_path: PathBuf,
}

/// One entry of `terraform output -json`
#[derive(Debug, Deserialize)]
struct TerraformOutput {
    value: serde_json::Value,
}

/// Runs the provisioning tool
pub struct Provisioner {
    runner: Arc<dyn CommandRunner>,
}

impl Provisioner {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    fn terraform(ctx: &RunContext) -> Invocation {
        Invocation::new(&ctx.config.terraform_bin).current_dir(&ctx.config.terraform_dir)
    }

    /// `-var-file=` argument; terraform runs inside its own directory, so
    /// the path must be absolute
    fn var_file_arg(ctx: &RunContext) -> Result<String> {
        let vars_file = std::path::absolute(&ctx.config.vars_file)?;
        Ok(format!("-var-file={}", vars_file.display()))
    }

    /// Runs a pass-through terraform command, failing on non-zero exit
    async fn run_checked(&self, invocation: Invocation) -> Result<ToolOutput> {
        let output = self.runner.run(&invocation).await?;

        if !output.success() {
            return Err(PipelineError::ToolFailed {
                tool: invocation.command_line(),
                exit_code: output.exit_code,
                output: output.combined(),
            });
        }

        Ok(output)
    }

    /// `terraform init`
    pub async fn init(&self, ctx: &RunContext) -> Result<ToolOutput> {
        self.run_checked(Self::terraform(ctx).args(["init", "-input=false", "-no-color"]))
            .await
    }

    /// `terraform validate`
    pub async fn validate(&self, ctx: &RunContext) -> Result<ToolOutput> {
        self.run_checked(Self::terraform(ctx).args(["validate", "-no-color"]))
            .await
    }

    /// `terraform plan`
    pub async fn plan(&self, ctx: &RunContext) -> Result<ToolOutput> {
        let invocation = Self::terraform(ctx)
            .args(["plan", "-input=false", "-no-color"])
            .arg(Self::var_file_arg(ctx)?);

        self.run_checked(invocation).await
    }

    /// Creates the infrastructure and records the resulting target
    ///
    /// Output is written to the apply evidence before the exit code is
    /// looked at, so failures stay diagnosable.
    pub async fn apply(&self, ctx: &mut RunContext) -> Result<Provisioned> {
        let invocation = Self::terraform(ctx)
            .args(["apply", "-auto-approve", "-input=false", "-no-color"])
            .arg(Self::var_file_arg(ctx)?);

        let output = self.runner.run(&invocation).await?;
        ctx.evidence
            .record(EvidencePhase::Apply, output.transcript(&invocation))?;

        if !output.success() {
            return Err(PipelineError::Provisioning {
                exit_code: output.exit_code,
                output: output.combined(),
            });
        }

        let outputs = self.read_outputs(ctx).await?;
        let address = string_output(&outputs, OUTPUT_ADDRESS)?;
        let instance_id = string_output(&outputs, OUTPUT_INSTANCE_ID)?;
        let private_key = string_output(&outputs, OUTPUT_PRIVATE_KEY)?;

        let credential_path = ctx.credential_path();
        write_credential(&credential_path, private_key.as_bytes())?;

        let target = DeploymentTarget::new(instance_id, address);
        ctx.set_target(target.clone())?;

        info!("Provisioned {}", target);

        Ok(Provisioned {
            target,
            credential_path,
        })
    }

    /// Destroys the infrastructure and forgets the local derived state
    ///
    /// Destroying with nothing provisioned is a successful no-op as far as
    /// terraform is concerned, so repeated teardowns succeed.
    pub async fn destroy(&self, ctx: &mut RunContext) -> Result<()> {
        let invocation = Self::terraform(ctx)
            .args(["destroy", "-auto-approve", "-input=false", "-no-color"])
            .arg(Self::var_file_arg(ctx)?);

        let output = self.runner.run(&invocation).await?;
        ctx.evidence
            .record(EvidencePhase::Destroy, output.transcript(&invocation))?;

        if !output.success() {
            return Err(PipelineError::Teardown {
                exit_code: output.exit_code,
                output: output.combined(),
            });
        }

        ctx.clear_target()?;
        info!("Infrastructure destroyed");
        Ok(())
    }

    async fn read_outputs(&self, ctx: &RunContext) -> Result<HashMap<String, TerraformOutput>> {
        let invocation = Self::terraform(ctx).args(["output", "-json", "-no-color"]);
        let output = self.run_checked(invocation).await?;

        serde_json::from_str(&output.stdout).map_err(|e| {
            PipelineError::MalformedOutput(format!("terraform output -json: {}", e))
        })
    }
}

fn string_output(outputs: &HashMap<String, TerraformOutput>, key: &str) -> Result<String> {
    outputs
        .get(key)
        .and_then(|output| output.value.as_str())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| {
            PipelineError::MalformedOutput(format!("terraform output '{}' is missing or empty", key))
        })
}

/// Writes the private key readable by the owner only
fn write_credential(path: &Path, key: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // A previous key is read-only; replace it rather than write through it.
    remove_if_exists(path)?;

    let mut options = std::fs::OpenOptions::new();
    options.write(true).create_new(true);

    // The key is owner-read-only from the moment the file exists.
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o400);
    }

    let mut file = options.open(path)?;
    file.write_all(key)?;
    file.sync_all()?;

    Ok(())
}
