//! Readiness poller
//!
//! A freshly provisioned host takes a while before it accepts remote
//! execution. The poller probes at a fixed interval against a monotonic
//! deadline.

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{self, Instant};
use tracing::{debug, info, warn};

use crate::invoker::{CommandRunner, Invocation};

/// Checks whether a host accepts remote execution
#[async_trait]
pub trait ReachabilityProbe: Send + Sync {
    /// One attempt; `true` when the host ran a no-op command
    async fn probe(&self, address: &str) -> bool;
}

/// Result of a readiness wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessOutcome {
    pub reachable: bool,
    pub attempts: u32,
    pub elapsed: Duration,
}

impl ReadinessOutcome {
    /// Line recorded in the readiness evidence
    pub fn describe(&self, address: &str) -> String {
        let state = if self.reachable {
            "reachable"
        } else {
            "NOT reachable"
        };
        format!(
            "host {} {} after {} attempt(s) in {}s",
            address,
            state,
            self.attempts,
            self.elapsed.as_secs()
        )
    }
}

/// Probes until the host is reachable or `timeout` has elapsed
///
/// Probe, and on failure sleep `interval`; give up once the elapsed time
/// reaches `timeout`. The wait therefore never exceeds `timeout + interval`
/// plus the duration of a single probe.
pub async fn await_reachable(
    probe: &dyn ReachabilityProbe,
    address: &str,
    timeout: Duration,
    interval: Duration,
) -> ReadinessOutcome {
    let started = Instant::now();
    let mut attempts = 0;

    info!(
        "Waiting for {} to accept remote execution (timeout: {:?}, interval: {:?})",
        address, timeout, interval
    );

    loop {
        attempts += 1;

        if probe.probe(address).await {
            let elapsed = started.elapsed();
            info!("{} reachable after {} attempt(s)", address, attempts);
            return ReadinessOutcome {
                reachable: true,
                attempts,
                elapsed,
            };
        }

        debug!("{} not reachable yet (attempt {})", address, attempts);
        time::sleep(interval).await;

        let elapsed = started.elapsed();
        if elapsed >= timeout {
            warn!(
                "{} still unreachable after {} attempt(s), giving up",
                address, attempts
            );
            return ReadinessOutcome {
                reachable: false,
                attempts,
                elapsed,
            };
        }
    }
}

/// Probes by running `true` over ssh with the deployment key
pub struct SshProbe {
    runner: Arc<dyn CommandRunner>,
    ssh_bin: String,
    credential_path: PathBuf,
    remote_user: String,
    connect_timeout: Duration,
}

impl SshProbe {
    pub fn new(
        runner: Arc<dyn CommandRunner>,
        ssh_bin: impl Into<String>,
        credential_path: impl Into<PathBuf>,
        remote_user: impl Into<String>,
        connect_timeout: Duration,
    ) -> Self {
        Self {
            runner,
            ssh_bin: ssh_bin.into(),
            credential_path: credential_path.into(),
            remote_user: remote_user.into(),
            connect_timeout,
        }
    }

    fn invocation(&self, address: &str) -> Invocation {
        Invocation::new(&self.ssh_bin)
            .arg("-i")
            .arg(self.credential_path.display().to_string())
            .args(["-o", "BatchMode=yes"])
            .arg("-o")
            .arg(format!(
                "ConnectTimeout={}",
                self.connect_timeout.as_secs().max(1)
            ))
            .args(["-o", "StrictHostKeyChecking=no"])
            .args(["-o", "UserKnownHostsFile=/dev/null"])
            .arg(format!("{}@{}", self.remote_user, address))
            .arg("true")
    }
}

#[async_trait]
impl ReachabilityProbe for SshProbe {
    async fn probe(&self, address: &str) -> bool {
        match self.runner.run(&self.invocation(address)).await {
            Ok(output) => output.success(),
            Err(e) => {
                warn!("ssh probe could not run: {}", e);
                false
            }
        }
    }
}
