//! Launchpad Runner
//!
//! The deployment pipeline: provision a host, wait until it accepts remote
//! execution, configure it, verify the deployed endpoints and record evidence
//! of every phase.
//!
//! Architecture:
//! - Configuration: tuning values from environment or defaults
//! - Context: explicit per-run state (paths, deployment target, evidence)
//! - Invoker: external tool execution behind the `CommandRunner` trait
//! - Phases: provisioning, readiness, configuration, verification, evidence
//! - Pipeline: the sequencer that stops at the first failing phase
//!
//! External tools (`terraform`, `ansible-playbook`, `ssh`, `scp`) are only
//! reached through their command-line contracts.

pub mod config;
pub mod configure;
pub mod context;
pub mod error;
pub mod evidence;
pub mod invoker;
pub mod pipeline;
pub mod provision;
pub mod readiness;
pub mod remote;
pub mod vars;
pub mod verify;

pub use config::PipelineConfig;
pub use context::RunContext;
pub use error::{PipelineError, Result};
pub use invoker::{CommandRunner, Invocation, SystemRunner, ToolOutput};
pub use pipeline::Pipeline;
