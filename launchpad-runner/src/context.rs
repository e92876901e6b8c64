//! Run context
//!
//! Carries everything a phase needs, explicitly, instead of relying on the
//! working directory or shared globals:
//! - Pipeline configuration
//! - Generated state paths (address, instance id, inventory, credential)
//! - The deployment target once known
//! - The evidence recorder for this run

use launchpad_core::domain::inventory::InventoryRecord;
use launchpad_core::domain::target::DeploymentTarget;
use std::path::PathBuf;
use tracing::{debug, info};
use uuid::Uuid;

use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::evidence::EvidenceRecorder;

const ADDRESS_FILE: &str = "instance_ip";
const INSTANCE_ID_FILE: &str = "instance_id";
const INVENTORY_FILE: &str = "inventory.ini";
const READY_FILE: &str = "ready";
const CREDENTIAL_FILE: &str = "deploy-key.pem";
const BACKUPS_DIR: &str = "backups";

/// State threaded through every phase of one pipeline invocation
#[derive(Debug)]
pub struct RunContext {
    /// Unique identifier of this invocation
    pub run_id: Uuid,

    /// Pipeline configuration
    pub config: PipelineConfig,

    /// Evidence sink for this run
    pub evidence: EvidenceRecorder,

    target: Option<DeploymentTarget>,
}

impl RunContext {
    /// Creates a new run context
    ///
    /// Nothing is touched on disk until a phase writes.
    pub fn new(config: PipelineConfig) -> Self {
        let run_id = Uuid::new_v4();
        let evidence = EvidenceRecorder::new(config.evidence_dir.clone(), run_id);

        Self {
            run_id,
            config,
            evidence,
            target: None,
        }
    }

    pub fn state_dir(&self) -> &std::path::Path {
        &self.config.state_dir
    }

    pub fn address_file(&self) -> PathBuf {
        self.config.state_dir.join(ADDRESS_FILE)
    }

    pub fn instance_id_file(&self) -> PathBuf {
        self.config.state_dir.join(INSTANCE_ID_FILE)
    }

    pub fn inventory_path(&self) -> PathBuf {
        self.config.state_dir.join(INVENTORY_FILE)
    }

    /// Holds the address that last passed the readiness check
    pub fn ready_file(&self) -> PathBuf {
        self.config.state_dir.join(READY_FILE)
    }

    pub fn credential_path(&self) -> PathBuf {
        self.config.state_dir.join(CREDENTIAL_FILE)
    }

    pub fn backups_dir(&self) -> PathBuf {
        self.config.state_dir.join(BACKUPS_DIR)
    }

    /// The deployment target, if known in this run
    pub fn target(&self) -> Option<&DeploymentTarget> {
        self.target.as_ref()
    }

    /// Records and persists the deployment target
    ///
    /// A new target has not been probed yet, so any readiness marker is
    /// dropped.
    pub fn set_target(&mut self, target: DeploymentTarget) -> Result<()> {
        std::fs::create_dir_all(&self.config.state_dir)?;
        remove_if_exists(&self.ready_file())?;
        std::fs::write(self.address_file(), format!("{}\n", target.address))?;
        std::fs::write(self.instance_id_file(), format!("{}\n", target.instance_id))?;

        info!("Deployment target: {}", target);
        self.target = Some(target);
        Ok(())
    }

    /// Returns the deployment target, loading it from the state directory
    ///
    /// Fails with `MissingAddress` when no address was ever recorded, which
    /// is how standalone `deploy`/`verify` invocations refuse to run before
    /// `apply`.
    pub fn require_target(&mut self) -> Result<&DeploymentTarget> {
        if self.target.is_none() {
            let address_file = self.address_file();
            let address = match std::fs::read_to_string(&address_file) {
                Ok(content) => content.trim().to_string(),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
                Err(e) => return Err(e.into()),
            };

            if address.is_empty() {
                return Err(PipelineError::MissingAddress(address_file));
            }

            let instance_id = std::fs::read_to_string(self.instance_id_file())
                .map(|id| id.trim().to_string())
                .unwrap_or_default();

            debug!("Loaded deployment target {} from {}", address, address_file.display());
            self.target = Some(DeploymentTarget::new(instance_id, address));
        }

        self.target
            .as_ref()
            .ok_or_else(|| PipelineError::MissingAddress(self.address_file()))
    }

    /// Persists that the current target accepted remote execution
    pub fn mark_ready(&mut self) -> Result<()> {
        let address = self.require_target()?.address.clone();
        std::fs::write(self.ready_file(), format!("{}\n", address))?;
        Ok(())
    }

    /// Returns the deployment target only if it passed the readiness check
    pub fn require_ready(&mut self) -> Result<&DeploymentTarget> {
        let address = self.require_target()?.address.clone();

        let confirmed = match std::fs::read_to_string(self.ready_file()) {
            Ok(content) => content.trim() == address,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
            Err(e) => return Err(e.into()),
        };

        if !confirmed {
            return Err(PipelineError::HostNotReady(address));
        }

        self.require_target()
    }

    /// Inventory record for the current target
    pub fn inventory_record(&mut self) -> Result<InventoryRecord> {
        let address = self.require_target()?.address.clone();
        let credential_path = std::path::absolute(self.credential_path())?;

        Ok(InventoryRecord::new(
            address,
            credential_path,
            self.config.remote_user.clone(),
        ))
    }

    /// Forgets the target and removes every file derived from it
    pub fn clear_target(&mut self) -> Result<()> {
        for path in [
            self.address_file(),
            self.instance_id_file(),
            self.inventory_path(),
            self.credential_path(),
            self.ready_file(),
        ] {
            remove_if_exists(&path)?;
        }

        self.target = None;
        Ok(())
    }
}

/// Removes a file, treating "already gone" as success
pub(crate) fn remove_if_exists(path: &std::path::Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            debug!("Removed {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn context_in(dir: &TempDir) -> RunContext {
        let config = PipelineConfig {
            state_dir: dir.path().join("state"),
            evidence_dir: dir.path().join("evidence"),
            ..Default::default()
        };
        RunContext::new(config)
    }

    #[test]
    fn test_require_target_without_address_fails() {
        let dir = TempDir::new().unwrap();
        let mut ctx = context_in(&dir);

        let err = ctx.require_target().unwrap_err();
        assert!(matches!(err, PipelineError::MissingAddress(_)));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_target_round_trips_through_state_dir() {
        let dir = TempDir::new().unwrap();
        let mut ctx = context_in(&dir);
        ctx.set_target(DeploymentTarget::new("i-0abc", "203.0.113.7"))
            .unwrap();

        // A later invocation only sees the state directory.
        let mut later = context_in(&dir);
        let target = later.require_target().unwrap();
        assert_eq!(target.address, "203.0.113.7");
        assert_eq!(target.instance_id, "i-0abc");
    }

    #[test]
    fn test_inventory_record_uses_absolute_key_path() {
        let dir = TempDir::new().unwrap();
        let mut ctx = context_in(&dir);
        ctx.set_target(DeploymentTarget::new("i-0abc", "203.0.113.7"))
            .unwrap();

        let record = ctx.inventory_record().unwrap();
        assert_eq!(record.address, "203.0.113.7");
        assert_eq!(record.remote_user, "ubuntu");
        assert!(record.credential_path.is_absolute());
        assert!(record.credential_path.ends_with("deploy-key.pem"));
    }

    #[test]
    fn test_ready_marker_follows_the_target() {
        let dir = TempDir::new().unwrap();
        let mut ctx = context_in(&dir);
        ctx.set_target(DeploymentTarget::new("i-0abc", "203.0.113.7"))
            .unwrap();

        assert!(matches!(
            ctx.require_ready(),
            Err(PipelineError::HostNotReady(ref address)) if address == "203.0.113.7"
        ));

        ctx.mark_ready().unwrap();
        let mut later = context_in(&dir);
        assert_eq!(later.require_ready().unwrap().address, "203.0.113.7");

        // Re-provisioning replaces the host; it has to be probed again.
        later
            .set_target(DeploymentTarget::new("i-0def", "203.0.113.9"))
            .unwrap();
        assert!(matches!(
            later.require_ready(),
            Err(PipelineError::HostNotReady(_))
        ));
    }

    #[test]
    fn test_stale_ready_marker_is_ignored() {
        let dir = TempDir::new().unwrap();
        let mut ctx = context_in(&dir);
        ctx.set_target(DeploymentTarget::new("i-0abc", "203.0.113.7"))
            .unwrap();
        std::fs::write(ctx.ready_file(), "198.51.100.1\n").unwrap();

        assert!(matches!(
            ctx.require_ready(),
            Err(PipelineError::HostNotReady(_))
        ));
    }

    #[test]
    fn test_clear_target_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let mut ctx = context_in(&dir);
        ctx.set_target(DeploymentTarget::new("i-0abc", "203.0.113.7"))
            .unwrap();

        ctx.mark_ready().unwrap();

        ctx.clear_target().unwrap();
        ctx.clear_target().unwrap();

        assert!(ctx.target().is_none());
        assert!(!ctx.ready_file().exists());
        assert!(!ctx.address_file().exists());
        assert!(matches!(
            ctx.require_target(),
            Err(PipelineError::MissingAddress(_))
        ));
    }
}
