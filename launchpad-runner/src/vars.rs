//! Deployment variables loading and validation
//!
//! The variables file is checked for shape before terraform ever sees it.
//! All violations are collected so the operator can fix them in one pass.

use ipnetwork::IpNetwork;
use launchpad_core::domain::variables::DeploymentVariables;
use std::ops::RangeInclusive;
use std::path::Path;
use tracing::warn;

use crate::error::{PipelineError, Result};

/// Instance sizes the deployment is sized for
pub const INSTANCE_TYPES: &[&str] = &[
    "t2.micro",
    "t2.small",
    "t2.medium",
    "t3.micro",
    "t3.small",
    "t3.medium",
    "t3a.micro",
    "t3a.small",
    "t3a.medium",
];

/// Accepted environment names
pub const ENVIRONMENTS: &[&str] = &["dev", "staging", "prod"];

/// Accepted root volume sizes in GiB
pub const ROOT_VOLUME_RANGE: RangeInclusive<u32> = 8..=100;

const MAX_PROJECT_NAME_LEN: usize = 32;

/// Reads and validates a variables file
pub fn load_variables(path: &Path) -> Result<DeploymentVariables> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        PipelineError::InvalidVariables(vec![format!(
            "cannot read variables file {}: {}",
            path.display(),
            e
        )])
    })?;

    let vars: DeploymentVariables = serde_json::from_str(&content).map_err(|e| {
        PipelineError::InvalidVariables(vec![format!(
            "cannot parse variables file {}: {}",
            path.display(),
            e
        )])
    })?;

    validate_variables(&vars)?;
    Ok(vars)
}

/// Validates variable shapes, reporting every violation at once
pub fn validate_variables(vars: &DeploymentVariables) -> Result<()> {
    let mut errors = Vec::new();

    if let Err(e) = validate_region(&vars.aws_region) {
        errors.push(e);
    }

    if !INSTANCE_TYPES.contains(&vars.instance_type.as_str()) {
        errors.push(format!(
            "instance_type '{}' is not one of: {}",
            vars.instance_type,
            INSTANCE_TYPES.join(", ")
        ));
    }

    if vars.ssh_allowed_ips.is_empty() {
        errors.push("ssh_allowed_ips must list at least one CIDR range".to_string());
    }
    for cidr in &vars.ssh_allowed_ips {
        match parse_cidr(cidr) {
            Ok(network) if network.prefix() == 0 => {
                warn!("ssh_allowed_ips contains {}: SSH is open to the world", cidr);
            }
            Ok(_) => {}
            Err(e) => errors.push(e),
        }
    }

    if let Err(e) = validate_project_name(&vars.project_name) {
        errors.push(e);
    }

    if !ENVIRONMENTS.contains(&vars.environment.as_str()) {
        errors.push(format!(
            "environment '{}' is not one of: {}",
            vars.environment,
            ENVIRONMENTS.join(", ")
        ));
    }

    if !ROOT_VOLUME_RANGE.contains(&vars.root_volume_size) {
        errors.push(format!(
            "root_volume_size {} is outside {}..={} GiB",
            vars.root_volume_size,
            ROOT_VOLUME_RANGE.start(),
            ROOT_VOLUME_RANGE.end()
        ));
    }

    for (key, value) in &vars.tags {
        if key.trim().is_empty() || value.trim().is_empty() {
            errors.push(format!("tag '{}' must have a non-empty key and value", key));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(PipelineError::InvalidVariables(errors))
    }
}

/// Parses a CIDR range; a bare address without a prefix length is rejected
fn parse_cidr(value: &str) -> std::result::Result<IpNetwork, String> {
    if !value.contains('/') {
        return Err(format!(
            "ssh_allowed_ips entry '{}' is not CIDR notation (missing /prefix)",
            value
        ));
    }

    value
        .parse::<IpNetwork>()
        .map_err(|e| format!("ssh_allowed_ips entry '{}' is not a valid CIDR: {}", value, e))
}

/// Region names look like `us-east-1` or `ap-southeast-2`
fn validate_region(region: &str) -> std::result::Result<(), String> {
    if region.trim().is_empty() {
        return Err("aws_region cannot be empty".to_string());
    }

    let parts: Vec<&str> = region.split('-').collect();
    let (number, words) = match parts.split_last() {
        Some(split) => split,
        None => return Err(format!("aws_region '{}' is malformed", region)),
    };

    let well_formed = words.len() >= 2
        && words
            .iter()
            .all(|w| !w.is_empty() && w.chars().all(|c| c.is_ascii_lowercase()))
        && !number.is_empty()
        && number.chars().all(|c| c.is_ascii_digit());

    if well_formed {
        Ok(())
    } else {
        Err(format!(
            "aws_region '{}' is malformed (expected e.g. us-east-1)",
            region
        ))
    }
}

/// Resource name prefix: lowercase letters, digits and dashes, starting with a letter
fn validate_project_name(name: &str) -> std::result::Result<(), String> {
    if name.trim().is_empty() {
        return Err("project_name cannot be empty".to_string());
    }

    if name.len() > MAX_PROJECT_NAME_LEN {
        return Err(format!(
            "project_name is too long (max {} characters)",
            MAX_PROJECT_NAME_LEN
        ));
    }

    let starts_with_letter = name.chars().next().is_some_and(|c| c.is_ascii_lowercase());
    let allowed = name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');

    if starts_with_letter && allowed {
        Ok(())
    } else {
        Err(format!(
            "project_name '{}' must start with a lowercase letter and contain only a-z, 0-9 and '-'",
            name
        ))
    }
}
