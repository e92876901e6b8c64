//! Configuration module
//!
//! Global command-line flags layered over the `LAUNCHPAD_*` environment
//! variables, which are themselves layered over the pipeline defaults.

use anyhow::Result;
use clap::Args;
use launchpad_runner::PipelineConfig;
use std::path::PathBuf;
use std::time::Duration;

/// Pipeline settings accepted by every command
#[derive(Args, Debug, Default)]
pub struct ConfigArgs {
    /// Directory holding the terraform definitions [env: LAUNCHPAD_TERRAFORM_DIR]
    #[arg(long, global = true)]
    pub terraform_dir: Option<PathBuf>,

    /// Directory holding the ansible playbook [env: LAUNCHPAD_ANSIBLE_DIR]
    #[arg(long, global = true)]
    pub ansible_dir: Option<PathBuf>,

    /// Playbook file, relative to the ansible directory [env: LAUNCHPAD_PLAYBOOK]
    #[arg(long, global = true)]
    pub playbook: Option<String>,

    /// Deployment variables file [env: LAUNCHPAD_VARS_FILE]
    #[arg(long, global = true)]
    pub vars_file: Option<PathBuf>,

    /// Directory for generated state [env: LAUNCHPAD_STATE_DIR]
    #[arg(long, global = true)]
    pub state_dir: Option<PathBuf>,

    /// Directory for evidence artifacts [env: LAUNCHPAD_EVIDENCE_DIR]
    #[arg(long, global = true)]
    pub evidence_dir: Option<PathBuf>,

    /// Login user on the host [env: LAUNCHPAD_REMOTE_USER]
    #[arg(long, global = true)]
    pub remote_user: Option<String>,

    /// Seconds to wait for the host to accept ssh [env: LAUNCHPAD_READINESS_TIMEOUT]
    #[arg(long, global = true, value_name = "SECS")]
    pub readiness_timeout: Option<u64>,

    /// Seconds between readiness probes [env: LAUNCHPAD_PROBE_INTERVAL]
    #[arg(long, global = true, value_name = "SECS")]
    pub probe_interval: Option<u64>,

    /// Seconds to wait after provisioning before probing [env: LAUNCHPAD_POST_PROVISION_DELAY]
    #[arg(long, global = true, value_name = "SECS")]
    pub post_provision_delay: Option<u64>,

    /// Attempts per endpoint during verification [env: LAUNCHPAD_VERIFY_ATTEMPTS]
    #[arg(long, global = true)]
    pub verify_attempts: Option<u32>,

    /// Seconds between verification attempts [env: LAUNCHPAD_VERIFY_DELAY]
    #[arg(long, global = true, value_name = "SECS")]
    pub verify_delay: Option<u64>,

    /// Connect timeout for ssh and HTTP [env: LAUNCHPAD_CONNECT_TIMEOUT]
    #[arg(long, global = true, value_name = "SECS")]
    pub connect_timeout: Option<u64>,

    /// Path of the task database on the host [env: LAUNCHPAD_REMOTE_DB_PATH]
    #[arg(long, global = true)]
    pub db_path: Option<String>,
}

impl ConfigArgs {
    /// Resolves flags over the environment and validates the result
    pub fn into_config(self) -> Result<PipelineConfig> {
        let mut config = PipelineConfig::from_env()?;
        self.apply(&mut config);
        config.validate()?;
        Ok(config)
    }

    /// Overrides every field given on the command line
    pub fn apply(self, config: &mut PipelineConfig) {
        if let Some(dir) = self.terraform_dir {
            config.terraform_dir = dir;
        }
        if let Some(dir) = self.ansible_dir {
            config.ansible_dir = dir;
        }
        if let Some(playbook) = self.playbook {
            config.playbook = playbook;
        }
        if let Some(file) = self.vars_file {
            config.vars_file = file;
        }
        if let Some(dir) = self.state_dir {
            config.state_dir = dir;
        }
        if let Some(dir) = self.evidence_dir {
            config.evidence_dir = dir;
        }
        if let Some(user) = self.remote_user {
            config.remote_user = user;
        }
        if let Some(secs) = self.readiness_timeout {
            config.readiness_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = self.probe_interval {
            config.probe_interval = Duration::from_secs(secs);
        }
        if let Some(secs) = self.post_provision_delay {
            config.post_provision_delay = Duration::from_secs(secs);
        }
        if let Some(attempts) = self.verify_attempts {
            config.verify_attempts = attempts;
        }
        if let Some(secs) = self.verify_delay {
            config.verify_delay = Duration::from_secs(secs);
        }
        if let Some(secs) = self.connect_timeout {
            config.connect_timeout = Duration::from_secs(secs);
        }
        if let Some(path) = self.db_path {
            config.remote_db_path = path;
        }
    }
}
