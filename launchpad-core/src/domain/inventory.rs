//! Inventory domain type
//!
//! The configuration tool reads its target hosts from an inventory file.
//! Launchpad only ever deploys to one host, so the inventory is a single
//! record derived from the provisioning output.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Inventory group the playbook targets
pub const INVENTORY_GROUP: &str = "webservers";

/// Connection parameters for the single deployment host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRecord {
    pub address: String,
    pub credential_path: PathBuf,
    pub remote_user: String,
}

impl InventoryRecord {
    pub fn new(
        address: impl Into<String>,
        credential_path: impl Into<PathBuf>,
        remote_user: impl Into<String>,
    ) -> Self {
        Self {
            address: address.into(),
            credential_path: credential_path.into(),
            remote_user: remote_user.into(),
        }
    }

    /// Renders the record as an INI inventory
    pub fn render(&self) -> String {
        format!(
            "[{group}]\n{address} ansible_user={user} ansible_ssh_private_key_file={key} \
             ansible_ssh_common_args='-o StrictHostKeyChecking=no'\n\n\
             [{group}:vars]\nansible_python_interpreter=/usr/bin/python3\n",
            group = INVENTORY_GROUP,
            address = self.address,
            user = self.remote_user,
            key = self.credential_path.display(),
        )
    }
}
