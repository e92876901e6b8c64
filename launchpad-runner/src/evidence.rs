//! Evidence recorder
//!
//! Captures what each phase produced into a fixed set of named artifacts and
//! renders a Markdown summary of the run. Writes overwrite the previous
//! run's artifact of the same phase; a write failure is fatal.

use chrono::{DateTime, Utc};
use launchpad_core::domain::evidence::EvidencePhase;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

use crate::error::{PipelineError, Result};

/// Writes evidence artifacts for one pipeline run
#[derive(Debug)]
pub struct EvidenceRecorder {
    dir: PathBuf,
    run_id: Uuid,
    recorded: BTreeMap<EvidencePhase, String>,
    outcome: Option<String>,
}

impl EvidenceRecorder {
    pub fn new(dir: impl Into<PathBuf>, run_id: Uuid) -> Self {
        Self {
            dir: dir.into(),
            run_id,
            recorded: BTreeMap::new(),
            outcome: None,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of a phase's artifact
    pub fn path(&self, phase: EvidencePhase) -> PathBuf {
        self.dir.join(phase.file_name())
    }

    /// Phases recorded during this run, in report order
    pub fn recorded_phases(&self) -> Vec<EvidencePhase> {
        self.recorded.keys().copied().collect()
    }

    /// Content recorded for a phase during this run
    pub fn recorded(&self, phase: EvidencePhase) -> Option<&str> {
        self.recorded.get(&phase).map(String::as_str)
    }

    /// Writes a phase's artifact, replacing any previous content
    pub fn record(&mut self, phase: EvidencePhase, content: impl Into<String>) -> Result<PathBuf> {
        let content = content.into();
        let path = self.path(phase);

        std::fs::create_dir_all(&self.dir).map_err(|source| PipelineError::Evidence {
            path: self.dir.clone(),
            source,
        })?;
        std::fs::write(&path, &content).map_err(|source| PipelineError::Evidence {
            path: path.clone(),
            source,
        })?;

        debug!("Recorded {} evidence at {}", phase, path.display());
        self.recorded.insert(phase, content);

        Ok(path)
    }

    /// Sets the one-line outcome shown at the top of the summary
    pub fn set_outcome(&mut self, outcome: impl Into<String>) {
        self.outcome = Some(outcome.into());
    }

    /// Renders the summary and writes it as the summary artifact
    pub fn summarize(&mut self) -> Result<String> {
        let report = self.render_summary(Utc::now(), &invoking_user());
        self.record(EvidencePhase::Summary, report.clone())?;
        Ok(report)
    }

    /// Renders the summary document without writing it
    pub fn render_summary(&self, generated_at: DateTime<Utc>, user: &str) -> String {
        let mut report = String::from("# Deployment Summary\n\n");
        report.push_str(&format!("- Run: `{}`\n", self.run_id));
        report.push_str(&format!("- Generated: {}\n", generated_at.to_rfc3339()));
        report.push_str(&format!("- Operator: {}\n", user));
        if let Some(outcome) = &self.outcome {
            report.push_str(&format!("- Outcome: {}\n", outcome));
        }

        let phases: Vec<_> = self
            .recorded
            .iter()
            .filter(|(phase, _)| **phase != EvidencePhase::Summary)
            .collect();

        if phases.is_empty() {
            report.push_str("\nNo phases were recorded in this run.\n");
            return report;
        }

        for (phase, content) in phases {
            report.push_str(&format!(
                "\n## {}\n\nArtifact: `{}`\n\n```\n{}\n```\n",
                phase.title(),
                phase.file_name(),
                content.trim_end()
            ));
        }

        report
    }

    /// Deletes the evidence directory
    pub fn clear(&mut self) -> Result<()> {
        if self.dir.exists() {
            std::fs::remove_dir_all(&self.dir)?;
        }
        self.recorded.clear();
        self.outcome = None;
        Ok(())
    }
}

/// Name of the operator running the pipeline
pub fn invoking_user() -> String {
    std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .ok()
        .filter(|user| !user.trim().is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_record_overwrites() {
        let dir = TempDir::new().unwrap();
        let mut recorder = EvidenceRecorder::new(dir.path().join("evidence"), Uuid::new_v4());

        let path = recorder.record(EvidencePhase::Apply, "first").unwrap();
        recorder.record(EvidencePhase::Apply, "second").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
        assert_eq!(recorder.recorded(EvidencePhase::Apply), Some("second"));
        assert_eq!(recorder.recorded_phases(), vec![EvidencePhase::Apply]);
    }

    #[test]
    fn test_rerun_keeps_same_artifact_set() {
        let dir = TempDir::new().unwrap();
        let evidence_dir = dir.path().join("evidence");

        let list = |dir: &Path| {
            let mut names: Vec<String> = std::fs::read_dir(dir)
                .unwrap()
                .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
                .collect();
            names.sort();
            names
        };

        for run in 0..2 {
            let mut recorder = EvidenceRecorder::new(&evidence_dir, Uuid::new_v4());
            recorder.record(EvidencePhase::Apply, format!("apply {run}")).unwrap();
            recorder
                .record(EvidencePhase::Verification, format!("verify {run}"))
                .unwrap();
            recorder.summarize().unwrap();
        }

        assert_eq!(
            list(evidence_dir.as_path()),
            vec!["SUMMARY.md", "apply-output.txt", "verification.txt"]
        );
        let apply = std::fs::read_to_string(evidence_dir.join("apply-output.txt")).unwrap();
        assert_eq!(apply, "apply 1");
    }

    #[test]
    fn test_summary_lists_phases_in_order() {
        let dir = TempDir::new().unwrap();
        let run_id = Uuid::new_v4();
        let mut recorder = EvidenceRecorder::new(dir.path(), run_id);

        recorder
            .record(EvidencePhase::Verification, "GET / -> 200")
            .unwrap();
        recorder
            .record(EvidencePhase::Apply, "Apply complete!")
            .unwrap();
        recorder.set_outcome("succeeded");

        let generated_at = DateTime::parse_from_rfc3339("2025-06-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let report = recorder.render_summary(generated_at, "alice");

        assert!(report.contains(&run_id.to_string()));
        assert!(report.contains("- Generated: 2025-06-01T12:00:00+00:00"));
        assert!(report.contains("- Operator: alice"));
        assert!(report.contains("- Outcome: succeeded"));

        let apply_at = report.find("## Provisioning output").unwrap();
        let verify_at = report.find("## HTTP verification").unwrap();
        assert!(apply_at < verify_at);
    }

    #[test]
    fn test_summary_without_phases() {
        let dir = TempDir::new().unwrap();
        let recorder = EvidenceRecorder::new(dir.path(), Uuid::new_v4());
        let report = recorder.render_summary(Utc::now(), "bob");
        assert!(report.contains("No phases were recorded"));
    }

    #[cfg(unix)]
    #[test]
    fn test_write_failure_is_an_error() {
        let dir = TempDir::new().unwrap();
        // A regular file where the evidence directory should be.
        let blocker = dir.path().join("evidence");
        std::fs::write(&blocker, "not a directory").unwrap();

        let mut recorder = EvidenceRecorder::new(&blocker, Uuid::new_v4());
        let result = recorder.record(EvidencePhase::Apply, "output");

        assert!(matches!(result, Err(PipelineError::Evidence { .. })));
    }

    #[test]
    fn test_clear_removes_directory() {
        let dir = TempDir::new().unwrap();
        let evidence_dir = dir.path().join("evidence");
        let mut recorder = EvidenceRecorder::new(&evidence_dir, Uuid::new_v4());
        recorder.record(EvidencePhase::Apply, "output").unwrap();

        recorder.clear().unwrap();

        assert!(!evidence_dir.exists());
        assert!(recorder.recorded_phases().is_empty());
    }
}
