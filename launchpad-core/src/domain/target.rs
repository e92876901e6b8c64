//! Deployment target domain type

use serde::{Deserialize, Serialize};

/// The single compute host created by provisioning
///
/// Its address is the join key used by every downstream phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentTarget {
    /// Provider-assigned instance identifier
    pub instance_id: String,
    /// Public network address of the instance
    pub address: String,
}

impl DeploymentTarget {
    pub fn new(instance_id: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            instance_id: instance_id.into(),
            address: address.into(),
        }
    }
}

impl std::fmt::Display for DeploymentTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.address, self.instance_id)
    }
}
