//! Pipeline configuration
//!
//! Defines every tunable of the deployment pipeline: where the
//! infrastructure and playbook definitions live, where generated state and
//! evidence go, and the retry/timeout budgets of the polling phases.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{PipelineError, Result};

/// Pipeline configuration
///
/// Retry counts and waits are operational tuning values, so all of them are
/// configurable instead of hardcoded.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory holding the terraform definitions
    pub terraform_dir: PathBuf,

    /// Directory holding the ansible playbook and roles
    pub ansible_dir: PathBuf,

    /// Playbook file, relative to `ansible_dir`
    pub playbook: String,

    /// Variables file handed to terraform (`*.tfvars.json`)
    pub vars_file: PathBuf,

    /// Directory for generated local state (address, inventory, key, backups)
    pub state_dir: PathBuf,

    /// Directory for evidence artifacts
    pub evidence_dir: PathBuf,

    /// Login user on the provisioned host
    pub remote_user: String,

    /// Port the deployed web server listens on
    pub http_port: u16,

    /// Fixed wait after provisioning, before readiness probing starts
    pub post_provision_delay: Duration,

    /// Maximum time to wait for the host to accept remote execution
    pub readiness_timeout: Duration,

    /// Fixed delay between readiness probes
    pub probe_interval: Duration,

    /// Attempts per endpoint during verification
    pub verify_attempts: u32,

    /// Delay between verification attempts
    pub verify_delay: Duration,

    /// Connect timeout for SSH probes and HTTP requests
    pub connect_timeout: Duration,

    /// Location of the task database on the host, used by backups
    pub remote_db_path: String,

    /// Provisioning tool executable
    pub terraform_bin: String,

    /// Configuration tool executable
    pub ansible_bin: String,

    /// Remote shell executable
    pub ssh_bin: String,

    /// Remote copy executable
    pub scp_bin: String,
}

impl PipelineConfig {
    /// Creates configuration from environment variables
    ///
    /// Every variable is optional and falls back to the default:
    /// - LAUNCHPAD_TERRAFORM_DIR (default: terraform)
    /// - LAUNCHPAD_ANSIBLE_DIR (default: ansible)
    /// - LAUNCHPAD_PLAYBOOK (default: playbook.yml)
    /// - LAUNCHPAD_VARS_FILE (default: terraform/terraform.tfvars.json)
    /// - LAUNCHPAD_STATE_DIR (default: .launchpad)
    /// - LAUNCHPAD_EVIDENCE_DIR (default: evidence)
    /// - LAUNCHPAD_REMOTE_USER (default: ubuntu)
    /// - LAUNCHPAD_HTTP_PORT (default: 80)
    /// - LAUNCHPAD_POST_PROVISION_DELAY (seconds, default: 0)
    /// - LAUNCHPAD_READINESS_TIMEOUT (seconds, default: 120)
    /// - LAUNCHPAD_PROBE_INTERVAL (seconds, default: 5)
    /// - LAUNCHPAD_VERIFY_ATTEMPTS (default: 5)
    /// - LAUNCHPAD_VERIFY_DELAY (seconds, default: 10)
    /// - LAUNCHPAD_CONNECT_TIMEOUT (seconds, default: 5)
    /// - LAUNCHPAD_REMOTE_DB_PATH
    /// - LAUNCHPAD_TERRAFORM_BIN, LAUNCHPAD_ANSIBLE_BIN, LAUNCHPAD_SSH_BIN, LAUNCHPAD_SCP_BIN
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup
    ///
    /// Unparsable numeric values are rejected rather than silently replaced
    /// by defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(dir) = lookup("LAUNCHPAD_TERRAFORM_DIR") {
            config.terraform_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("LAUNCHPAD_ANSIBLE_DIR") {
            config.ansible_dir = PathBuf::from(dir);
        }
        if let Some(playbook) = lookup("LAUNCHPAD_PLAYBOOK") {
            config.playbook = playbook;
        }
        if let Some(file) = lookup("LAUNCHPAD_VARS_FILE") {
            config.vars_file = PathBuf::from(file);
        }
        if let Some(dir) = lookup("LAUNCHPAD_STATE_DIR") {
            config.state_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("LAUNCHPAD_EVIDENCE_DIR") {
            config.evidence_dir = PathBuf::from(dir);
        }
        if let Some(user) = lookup("LAUNCHPAD_REMOTE_USER") {
            config.remote_user = user;
        }
        if let Some(port) = lookup("LAUNCHPAD_HTTP_PORT") {
            config.http_port = parse_number("LAUNCHPAD_HTTP_PORT", &port)?;
        }
        if let Some(secs) = lookup("LAUNCHPAD_POST_PROVISION_DELAY") {
            config.post_provision_delay = parse_seconds("LAUNCHPAD_POST_PROVISION_DELAY", &secs)?;
        }
        if let Some(secs) = lookup("LAUNCHPAD_READINESS_TIMEOUT") {
            config.readiness_timeout = parse_seconds("LAUNCHPAD_READINESS_TIMEOUT", &secs)?;
        }
        if let Some(secs) = lookup("LAUNCHPAD_PROBE_INTERVAL") {
            config.probe_interval = parse_seconds("LAUNCHPAD_PROBE_INTERVAL", &secs)?;
        }
        if let Some(attempts) = lookup("LAUNCHPAD_VERIFY_ATTEMPTS") {
            config.verify_attempts = parse_number("LAUNCHPAD_VERIFY_ATTEMPTS", &attempts)?;
        }
        if let Some(secs) = lookup("LAUNCHPAD_VERIFY_DELAY") {
            config.verify_delay = parse_seconds("LAUNCHPAD_VERIFY_DELAY", &secs)?;
        }
        if let Some(secs) = lookup("LAUNCHPAD_CONNECT_TIMEOUT") {
            config.connect_timeout = parse_seconds("LAUNCHPAD_CONNECT_TIMEOUT", &secs)?;
        }
        if let Some(path) = lookup("LAUNCHPAD_REMOTE_DB_PATH") {
            config.remote_db_path = path;
        }
        if let Some(bin) = lookup("LAUNCHPAD_TERRAFORM_BIN") {
            config.terraform_bin = bin;
        }
        if let Some(bin) = lookup("LAUNCHPAD_ANSIBLE_BIN") {
            config.ansible_bin = bin;
        }
        if let Some(bin) = lookup("LAUNCHPAD_SSH_BIN") {
            config.ssh_bin = bin;
        }
        if let Some(bin) = lookup("LAUNCHPAD_SCP_BIN") {
            config.scp_bin = bin;
        }

        Ok(config)
    }

    /// Base URL of the deployed site for a given host address
    pub fn base_url(&self, address: &str) -> String {
        if self.http_port == 80 {
            format!("http://{}", address)
        } else {
            format!("http://{}:{}", address, self.http_port)
        }
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        if self.remote_user.trim().is_empty() {
            return Err(PipelineError::Config("remote_user cannot be empty".into()));
        }

        if self.playbook.trim().is_empty() {
            return Err(PipelineError::Config("playbook cannot be empty".into()));
        }

        if self.http_port == 0 {
            return Err(PipelineError::Config("http_port must be greater than 0".into()));
        }

        if self.probe_interval.is_zero() {
            return Err(PipelineError::Config(
                "probe_interval must be greater than 0".into(),
            ));
        }

        if self.readiness_timeout < self.probe_interval {
            return Err(PipelineError::Config(
                "readiness_timeout must be at least one probe_interval".into(),
            ));
        }

        if self.verify_attempts == 0 {
            return Err(PipelineError::Config(
                "verify_attempts must be greater than 0".into(),
            ));
        }

        if self.connect_timeout.is_zero() {
            return Err(PipelineError::Config(
                "connect_timeout must be greater than 0".into(),
            ));
        }

        Ok(())
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            terraform_dir: PathBuf::from("terraform"),
            ansible_dir: PathBuf::from("ansible"),
            playbook: "playbook.yml".to_string(),
            vars_file: PathBuf::from("terraform/terraform.tfvars.json"),
            state_dir: PathBuf::from(".launchpad"),
            evidence_dir: PathBuf::from("evidence"),
            remote_user: "ubuntu".to_string(),
            http_port: 80,
            post_provision_delay: Duration::ZERO,
            readiness_timeout: Duration::from_secs(120),
            probe_interval: Duration::from_secs(5),
            verify_attempts: 5,
            verify_delay: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(5),
            remote_db_path: "/opt/taskmanager/backend/instance/tasks.db".to_string(),
            terraform_bin: "terraform".to_string(),
            ansible_bin: "ansible-playbook".to_string(),
            ssh_bin: "ssh".to_string(),
            scp_bin: "scp".to_string(),
        }
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| PipelineError::Config(format!("{} must be a number, got '{}'", key, value)))
}

fn parse_seconds(key: &str, value: &str) -> Result<Duration> {
    parse_number::<u64>(key, value).map(Duration::from_secs)
}
