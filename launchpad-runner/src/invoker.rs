//! External tool invocation
//!
//! Every phase reaches its external tool through the [`CommandRunner`]
//! trait, so phases can be exercised against scripted runners and the real
//! runner stays a thin wrapper over `tokio::process`.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tracing::{debug, info};

use crate::error::{PipelineError, Result};

/// A fully described external command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub env: Vec<(String, String)>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            env: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Shell-like rendering for logs and evidence headers
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Captured result of a finished command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// stdout followed by stderr, as the tool printed them
    pub fn combined(&self) -> String {
        match (self.stdout.trim().is_empty(), self.stderr.trim().is_empty()) {
            (_, true) => self.stdout.clone(),
            (true, false) => self.stderr.clone(),
            (false, false) => format!("{}\n{}", self.stdout.trim_end(), self.stderr),
        }
    }

    /// Evidence transcript: command line, exit code, then raw output
    pub fn transcript(&self, invocation: &Invocation) -> String {
        format!(
            "$ {}\n# exit code: {}\n\n{}",
            invocation.command_line(),
            self.exit_code,
            self.combined()
        )
    }
}

/// Executes external commands
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Runs a command to completion, capturing its output
    ///
    /// A non-zero exit is not an error here; only failure to launch is.
    async fn run(&self, invocation: &Invocation) -> Result<ToolOutput>;

    /// Runs a command attached to the operator's terminal and returns its exit code
    async fn run_interactive(&self, invocation: &Invocation) -> Result<i32> {
        self.run(invocation).await.map(|output| output.exit_code)
    }
}

/// Runs commands on the local system
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self
    }

    fn command(invocation: &Invocation) -> tokio::process::Command {
        let mut command = tokio::process::Command::new(&invocation.program);
        command.args(&invocation.args);

        if let Some(cwd) = &invocation.cwd {
            command.current_dir(cwd);
        }

        for (key, value) in &invocation.env {
            command.env(key, value);
        }

        command
    }
}

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, invocation: &Invocation) -> Result<ToolOutput> {
        info!("Running: {}", invocation.command_line());

        let output = Self::command(invocation)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| PipelineError::ToolLaunch {
                tool: invocation.program.clone(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        let exit_code = output.status.code().unwrap_or(-1);

        // Always log stdout/stderr as debug
        if !stdout.trim().is_empty() {
            debug!("{} stdout: {}", invocation.program, stdout.trim());
        }
        if !stderr.trim().is_empty() {
            debug!("{} stderr: {}", invocation.program, stderr.trim());
        }

        debug!(
            "{} finished: exit_code={}, stdout_len={}, stderr_len={}",
            invocation.program,
            exit_code,
            stdout.len(),
            stderr.len()
        );

        Ok(ToolOutput {
            exit_code,
            stdout,
            stderr,
        })
    }

    async fn run_interactive(&self, invocation: &Invocation) -> Result<i32> {
        info!("Attaching: {}", invocation.command_line());

        let status = Self::command(invocation)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|source| PipelineError::ToolLaunch {
                tool: invocation.program.clone(),
                source,
            })?;

        Ok(status.code().unwrap_or(-1))
    }
}
