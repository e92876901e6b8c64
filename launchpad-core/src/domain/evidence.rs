//! Evidence phase domain type

use serde::{Deserialize, Serialize};

/// Pipeline phase an evidence artifact belongs to
///
/// Each phase maps to exactly one file name, so repeated runs overwrite
/// instead of accumulating artifacts. Variant order is report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvidencePhase {
    Variables,
    Apply,
    Readiness,
    Configure,
    Verification,
    Destroy,
    Summary,
}

impl EvidencePhase {
    /// All phases in report order
    pub const ALL: [EvidencePhase; 7] = [
        EvidencePhase::Variables,
        EvidencePhase::Apply,
        EvidencePhase::Readiness,
        EvidencePhase::Configure,
        EvidencePhase::Verification,
        EvidencePhase::Destroy,
        EvidencePhase::Summary,
    ];

    /// Artifact file name inside the evidence directory
    pub fn file_name(&self) -> &'static str {
        match self {
            EvidencePhase::Variables => "deployment-vars.json",
            EvidencePhase::Apply => "apply-output.txt",
            EvidencePhase::Readiness => "readiness.txt",
            EvidencePhase::Configure => "configure-output.txt",
            EvidencePhase::Verification => "verification.txt",
            EvidencePhase::Destroy => "destroy-output.txt",
            EvidencePhase::Summary => "SUMMARY.md",
        }
    }

    /// Human-readable section title
    pub fn title(&self) -> &'static str {
        match self {
            EvidencePhase::Variables => "Deployment variables",
            EvidencePhase::Apply => "Provisioning output",
            EvidencePhase::Readiness => "Readiness wait",
            EvidencePhase::Configure => "Configuration output",
            EvidencePhase::Verification => "HTTP verification",
            EvidencePhase::Destroy => "Teardown output",
            EvidencePhase::Summary => "Summary",
        }
    }
}

impl std::fmt::Display for EvidencePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EvidencePhase::Variables => "variables",
            EvidencePhase::Apply => "apply",
            EvidencePhase::Readiness => "readiness",
            EvidencePhase::Configure => "configure",
            EvidencePhase::Verification => "verification",
            EvidencePhase::Destroy => "destroy",
            EvidencePhase::Summary => "summary",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_file_names_are_unique() {
        let names: HashSet<_> = EvidencePhase::ALL.iter().map(|p| p.file_name()).collect();
        assert_eq!(names.len(), EvidencePhase::ALL.len());
    }
}
