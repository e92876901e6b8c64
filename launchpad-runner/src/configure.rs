//! Configuration invoker
//!
//! Renders the single-host inventory and applies the playbook to it.
//! Connectivity retries belong to the playbook; any non-zero exit here is
//! terminal.

use launchpad_core::domain::evidence::EvidencePhase;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::context::RunContext;
use crate::error::{PipelineError, Result};
use crate::invoker::{CommandRunner, Invocation, ToolOutput};

/// Runs the configuration tool
pub struct Configurator {
    runner: Arc<dyn CommandRunner>,
}

impl Configurator {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    /// Writes the inventory for the current target and returns its path
    pub fn write_inventory(&self, ctx: &mut RunContext) -> Result<PathBuf> {
        let record = ctx.inventory_record()?;
        let path = ctx.inventory_path();

        std::fs::create_dir_all(ctx.state_dir())?;
        std::fs::write(&path, record.render())?;

        info!("Inventory written to {}", path.display());
        Ok(path)
    }

    fn playbook(ctx: &RunContext) -> Result<Invocation> {
        // ansible-playbook runs inside its own directory
        let inventory = std::path::absolute(ctx.inventory_path())?;

        Ok(Invocation::new(&ctx.config.ansible_bin)
            .current_dir(&ctx.config.ansible_dir)
            .env("ANSIBLE_HOST_KEY_CHECKING", "False")
            .env("ANSIBLE_NOCOLOR", "1")
            .arg("-i")
            .arg(inventory.display().to_string()))
    }

    /// Applies the playbook to the deployment host
    ///
    /// Refuses a host that never passed the readiness check. The inventory
    /// is regenerated from the recorded target first, so a standalone
    /// `deploy` after `apply` needs nothing but the state directory.
    pub async fn configure(&self, ctx: &mut RunContext) -> Result<()> {
        ctx.require_ready()?;
        self.write_inventory(ctx)?;

        let invocation = Self::playbook(ctx)?.arg(&ctx.config.playbook);
        let output = self.runner.run(&invocation).await?;
        ctx.evidence
            .record(EvidencePhase::Configure, output.transcript(&invocation))?;

        if !output.success() {
            return Err(PipelineError::Configuration {
                exit_code: output.exit_code,
                output: output.combined(),
            });
        }

        info!("Host configured");
        Ok(())
    }

    /// `ansible-playbook --syntax-check`
    ///
    /// The syntax check never contacts a host, but ansible still wants an
    /// inventory; `localhost,` is an inline one.
    pub async fn syntax_check(&self, ctx: &RunContext) -> Result<ToolOutput> {
        let invocation = Invocation::new(&ctx.config.ansible_bin)
            .current_dir(&ctx.config.ansible_dir)
            .env("ANSIBLE_NOCOLOR", "1")
            .args(["--syntax-check", "-i", "localhost,"])
            .arg(&ctx.config.playbook);

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
}
