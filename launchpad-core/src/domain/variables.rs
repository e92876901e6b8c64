//! Deployment variables
//!
//! The variables file handed to the provisioning tool. It is stored as
//! `terraform.tfvars.json`, which terraform reads natively, so the same file
//! is validated here and consumed there.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Variables supplied to the provisioning tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentVariables {
    /// Cloud region (e.g. "us-east-1")
    pub aws_region: String,

    /// Instance size, restricted to an enumerated set
    pub instance_type: String,

    /// CIDR ranges allowed to reach the SSH port
    pub ssh_allowed_ips: Vec<String>,

    /// Name prefix for every created resource
    pub project_name: String,

    /// Deployment environment tag
    pub environment: String,

    /// Root volume size in GiB
    pub root_volume_size: u32,

    /// Extra resource tags
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,
}
