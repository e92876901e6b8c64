//! Remote access to the deployment host
//!
//! Interactive shell and database backup, both over the deployment key.

use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::context::RunContext;
use crate::error::{PipelineError, Result};
use crate::invoker::{CommandRunner, Invocation};

/// ssh options shared by every remote command
fn ssh_options(ctx: &RunContext, credential: &str) -> Vec<String> {
    vec![
        "-i".to_string(),
        credential.to_string(),
        "-o".to_string(),
        "StrictHostKeyChecking=no".to_string(),
        "-o".to_string(),
        "UserKnownHostsFile=/dev/null".to_string(),
        "-o".to_string(),
        format!("ConnectTimeout={}", ctx.config.connect_timeout.as_secs().max(1)),
    ]
}

/// `ssh` invocation for the deployment host
pub fn ssh_invocation(ctx: &mut RunContext) -> Result<Invocation> {
    let address = ctx.require_target()?.address.clone();
    let credential = ctx.credential_path().display().to_string();

    Ok(Invocation::new(&ctx.config.ssh_bin)
        .args(ssh_options(ctx, &credential))
        .arg(format!("{}@{}", ctx.config.remote_user, address)))
}

/// Local file name of a backup taken at `at`
pub fn backup_file_name(at: DateTime<Utc>) -> String {
    format!("tasks-{}.db", at.format("%Y%m%d-%H%M%S"))
}

/// Remote operations on the deployment host
pub struct RemoteHost {
    runner: Arc<dyn CommandRunner>,
}

impl RemoteHost {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    /// Opens an interactive shell attached to the operator's terminal
    ///
    /// Returns the shell's exit code.
    pub async fn open_shell(&self, ctx: &mut RunContext) -> Result<i32> {
        let invocation = ssh_invocation(ctx)?;
        self.runner.run_interactive(&invocation).await
    }

    /// Copies the task database off the host into the backups directory
    pub async fn backup(&self, ctx: &mut RunContext) -> Result<PathBuf> {
        let address = ctx.require_target()?.address.clone();
        let credential = ctx.credential_path().display().to_string();

        let backups_dir = ctx.backups_dir();
        std::fs::create_dir_all(&backups_dir)?;
        let destination = backups_dir.join(backup_file_name(Utc::now()));

        let invocation = Invocation::new(&ctx.config.scp_bin)
            .args(ssh_options(ctx, &credential))
            .arg(format!(
                "{}@{}:{}",
                ctx.config.remote_user, address, ctx.config.remote_db_path
            ))
            .arg(destination.display().to_string());

        let output = self.runner.run(&invocation).await?;
        if !output.success() {
            return Err(PipelineError::ToolFailed {
                tool: invocation.command_line(),
                exit_code: output.exit_code,
                output: output.combined(),
            });
        }

        info!("Database backed up to {}", destination.display());
        Ok(destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipelineConfig;
    use crate::invoker::ToolOutput;
    use async_trait::async_trait;
    use launchpad_core::domain::target::DeploymentTarget;
    use std::sync::Mutex;
    use tempfile::TempDir;

    #[derive(Default)]
    struct RecordingRunner {
        seen: Mutex<Vec<Invocation>>,
    }

    #[async_trait]
    impl CommandRunner for RecordingRunner {
        async fn run(&self, invocation: &Invocation) -> Result<ToolOutput> {
            self.seen.lock().unwrap().push(invocation.clone());
            Ok(ToolOutput {
                exit_code: 0,
                stdout: String::new(),
                stderr: String::new(),
            })
        }
    }

    fn context_in(dir: &TempDir) -> RunContext {
        RunContext::new(PipelineConfig {
            state_dir: dir.path().join("state"),
            evidence_dir: dir.path().join("evidence"),
            ..Default::default()
        })
    }

    #[test]
    fn test_backup_file_name() {
        let at = DateTime::parse_from_rfc3339("2025-06-01T08:05:09Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(backup_file_name(at), "tasks-20250601-080509.db");
    }

    #[test]
    fn test_ssh_requires_address() {
        let dir = TempDir::new().unwrap();
        let mut ctx = context_in(&dir);
        assert!(matches!(
            ssh_invocation(&mut ctx),
            Err(PipelineError::MissingAddress(_))
        ));
    }

    #[test]
    fn test_ssh_invocation_targets_host() {
        let dir = TempDir::new().unwrap();
        let mut ctx = context_in(&dir);
        ctx.set_target(DeploymentTarget::new("i-0abc", "203.0.113.7"))
            .unwrap();

        let invocation = ssh_invocation(&mut ctx).unwrap();
        assert_eq!(invocation.program, "ssh");
        assert_eq!(
            invocation.args.last().map(String::as_str),
            Some("ubuntu@203.0.113.7")
        );
    }

    #[tokio::test]
    async fn test_backup_copies_remote_database() {
        let dir = TempDir::new().unwrap();
        let mut ctx = context_in(&dir);
        ctx.set_target(DeploymentTarget::new("i-0abc", "203.0.113.7"))
            .unwrap();
        let runner = Arc::new(RecordingRunner::default());

        let destination = RemoteHost::new(runner.clone())
            .backup(&mut ctx)
            .await
            .unwrap();

        assert!(destination.starts_with(ctx.backups_dir()));
        let seen = runner.seen.lock().unwrap();
        assert_eq!(seen[0].program, "scp");
        assert!(seen[0].args.contains(
            &"ubuntu@203.0.113.7:/opt/taskmanager/backend/instance/tasks.db".to_string()
        ));
    }
}
