//! Pipeline error taxonomy
//!
//! Every error is terminal to the current invocation: there is no automatic
//! cross-phase retry or rollback. Tool failures keep the tool's raw output so
//! the operator sees exactly what the tool printed.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors raised by pipeline phases
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Variables file failed validation; nothing was invoked
    #[error("invalid deployment variables:\n  - {}", .0.join("\n  - "))]
    InvalidVariables(Vec<String>),

    /// Provisioning tool exited non-zero during apply
    #[error("provisioning failed: terraform apply exited with {exit_code}")]
    Provisioning { exit_code: i32, output: String },

    /// Provisioning tool exited non-zero during destroy
    #[error("teardown failed: terraform destroy exited with {exit_code}")]
    Teardown { exit_code: i32, output: String },

    /// Host never accepted remote execution within the readiness budget
    #[error(
        "host {address} not reachable after {attempts} attempt(s) within {}s",
        .timeout.as_secs()
    )]
    ReachabilityTimeout {
        address: String,
        timeout: Duration,
        attempts: u32,
    },

    /// Configuration tool exited non-zero
    #[error("configuration failed: ansible-playbook exited with {exit_code}")]
    Configuration { exit_code: i32, output: String },

    /// A mandatory endpoint never answered 2xx within its attempts
    #[error("verification failed for mandatory endpoint(s): {}", .failed.join(", "))]
    VerificationFailure { failed: Vec<String> },

    /// Any other external tool exited non-zero
    #[error("{tool} exited with {exit_code}")]
    ToolFailed {
        tool: String,
        exit_code: i32,
        output: String,
    },

    /// A phase needs the deployment address but none was recorded
    #[error("no deployment address at {} (run `apply` first)", .0.display())]
    MissingAddress(PathBuf),

    /// The recorded host never passed the readiness check
    #[error("host {0} has not passed the readiness check (run `apply` first)")]
    HostNotReady(String),

    /// An external tool could not be started at all
    #[error("failed to launch {tool}: {source}")]
    ToolLaunch {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// A tool succeeded but printed something we could not interpret
    #[error("unexpected tool output: {0}")]
    MalformedOutput(String),

    /// Evidence could not be written; evidence is part of the deliverable
    #[error("failed to write evidence {}: {source}", .path.display())]
    Evidence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid pipeline configuration
    #[error("invalid pipeline configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PipelineError {
    /// Process exit code for this error
    ///
    /// Tool failures propagate the tool's own exit code; everything else is
    /// an internal precondition failure and maps to 1.
    pub fn exit_code(&self) -> i32 {
        let code = match self {
            PipelineError::Provisioning { exit_code, .. }
            | PipelineError::Teardown { exit_code, .. }
            | PipelineError::Configuration { exit_code, .. }
            | PipelineError::ToolFailed { exit_code, .. } => *exit_code,
            _ => 1,
        };

        // Signals report -1; out-of-range codes would wrap.
        if (1..=255).contains(&code) { code } else { 1 }
    }

    /// Raw output of the failing tool, if this error came from one
    pub fn tool_output(&self) -> Option<&str> {
        match self {
            PipelineError::Provisioning { output, .. }
            | PipelineError::Teardown { output, .. }
            | PipelineError::Configuration { output, .. }
            | PipelineError::ToolFailed { output, .. } => Some(output.as_str()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_propagates_tool_code() {
        let err = PipelineError::Provisioning {
            exit_code: 2,
            output: "Error: creating EC2 Instance".into(),
        };
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.tool_output(), Some("Error: creating EC2 Instance"));
    }

    #[test]
    fn test_exit_code_internal_failures() {
        let err = PipelineError::MissingAddress(PathBuf::from(".launchpad/instance_ip"));
        assert_eq!(err.exit_code(), 1);
        assert!(err.tool_output().is_none());

        let err = PipelineError::ToolFailed {
            tool: "ssh".into(),
            exit_code: -1,
            output: String::new(),
        };
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_messages() {
        let err = PipelineError::InvalidVariables(vec!["a".into(), "b".into()]);
        assert_eq!(err.to_string(), "invalid deployment variables:\n  - a\n  - b");

        let err = PipelineError::ReachabilityTimeout {
            address: "10.0.0.5".into(),
            timeout: Duration::from_secs(60),
            attempts: 12,
        };
        assert_eq!(
            err.to_string(),
            "host 10.0.0.5 not reachable after 12 attempt(s) within 60s"
        );
    }
}
