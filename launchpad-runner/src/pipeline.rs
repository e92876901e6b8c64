//! Pipeline sequencer
//!
//! Runs the phases in order and stops at the first failure:
//! variables → apply → (delay) → readiness → inventory → configure → verify
//! → summary. There is no rollback; the summary is still written when a
//! phase fails.

use launchpad_client::TaskApiClient;
use launchpad_core::domain::evidence::EvidencePhase;
use launchpad_core::domain::target::DeploymentTarget;
use launchpad_core::domain::variables::DeploymentVariables;
use std::sync::Arc;
use tokio::time;
use tracing::{error, info, warn};

use crate::configure::Configurator;
use crate::context::RunContext;
use crate::error::{PipelineError, Result};
use crate::invoker::CommandRunner;
use crate::provision::Provisioner;
use crate::readiness::{self, ReachabilityProbe, ReadinessOutcome, SshProbe};
use crate::remote::RemoteHost;
use crate::vars;
use crate::verify::{self, HttpTransport, VerificationReport};

/// Deployment pipeline
///
/// The probe and transport default to ssh and HTTP against the recorded
/// target; both can be replaced.
pub struct Pipeline {
    runner: Arc<dyn CommandRunner>,
    probe: Option<Arc<dyn ReachabilityProbe>>,
    transport: Option<Arc<dyn HttpTransport>>,
}

impl Pipeline {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            runner,
            probe: None,
            transport: None,
        }
    }

    pub fn with_probe(mut self, probe: Arc<dyn ReachabilityProbe>) -> Self {
        self.probe = Some(probe);
        self
    }

    pub fn with_transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn provisioner(&self) -> Provisioner {
        Provisioner::new(self.runner.clone())
    }

    pub fn configurator(&self) -> Configurator {
        Configurator::new(self.runner.clone())
    }

    pub fn remote(&self) -> RemoteHost {
        RemoteHost::new(self.runner.clone())
    }

    /// Loads and validates the variables file, snapshotting it into evidence
    pub fn prepare_variables(&self, ctx: &mut RunContext) -> Result<DeploymentVariables> {
        let variables = vars::load_variables(&ctx.config.vars_file)?;
        ctx.evidence.record(
            EvidencePhase::Variables,
            serde_json::to_string_pretty(&variables)?,
        )?;
        Ok(variables)
    }

    /// Validates variables, provisions, waits for readiness and writes the inventory
    pub async fn provision(&self, ctx: &mut RunContext) -> Result<DeploymentTarget> {
        self.prepare_variables(ctx)?;

        let provisioned = self.provisioner().apply(ctx).await?;

        let delay = ctx.config.post_provision_delay;
        if !delay.is_zero() {
            info!("Waiting {:?} before probing the new host", delay);
            time::sleep(delay).await;
        }

        self.await_readiness(ctx).await?;
        self.configurator().write_inventory(ctx)?;

        Ok(provisioned.target)
    }

    /// Waits until the recorded target accepts remote execution
    pub async fn await_readiness(&self, ctx: &mut RunContext) -> Result<ReadinessOutcome> {
        let address = ctx.require_target()?.address.clone();

        let ssh_probe;
        let probe: &dyn ReachabilityProbe = match &self.probe {
            Some(probe) => probe.as_ref(),
            None => {
                ssh_probe = SshProbe::new(
                    self.runner.clone(),
                    &ctx.config.ssh_bin,
                    ctx.credential_path(),
                    &ctx.config.remote_user,
                    ctx.config.connect_timeout,
                );
                &ssh_probe
            }
        };

        let outcome = readiness::await_reachable(
            probe,
            &address,
            ctx.config.readiness_timeout,
            ctx.config.probe_interval,
        )
        .await;

        ctx.evidence
            .record(EvidencePhase::Readiness, format!("{}\n", outcome.describe(&address)))?;

        if !outcome.reachable {
            return Err(PipelineError::ReachabilityTimeout {
                address,
                timeout: ctx.config.readiness_timeout,
                attempts: outcome.attempts,
            });
        }

        ctx.mark_ready()?;
        Ok(outcome)
    }

    /// Applies the playbook to the recorded target
    pub async fn configure(&self, ctx: &mut RunContext) -> Result<()> {
        self.configurator().configure(ctx).await
    }

    /// Probes the deployed endpoints and records the transcript
    pub async fn verify(&self, ctx: &mut RunContext) -> Result<VerificationReport> {
        let address = ctx.require_target()?.address.clone();

        let client;
        let transport: &dyn HttpTransport = match &self.transport {
            Some(transport) => transport.as_ref(),
            None => {
                client = TaskApiClient::with_timeouts(
                    ctx.config.base_url(&address),
                    ctx.config.connect_timeout,
                    ctx.config.connect_timeout * 2,
                )
                .map_err(|e| PipelineError::Config(format!("HTTP client: {}", e)))?;
                &client
            }
        };

        let report = verify::verify(
            transport,
            &verify::default_endpoints(),
            ctx.config.verify_attempts,
            ctx.config.verify_delay,
        )
        .await;

        ctx.evidence
            .record(EvidencePhase::Verification, report.transcript())?;

        for warning in report.warnings() {
            warn!("{}", warning);
        }

        if !report.passed() {
            return Err(PipelineError::VerificationFailure {
                failed: report.failed_mandatory(),
            });
        }

        Ok(report)
    }

    /// Tears the infrastructure down
    pub async fn destroy(&self, ctx: &mut RunContext) -> Result<()> {
        self.provisioner().destroy(ctx).await
    }

    /// Runs every phase, then writes the summary
    ///
    /// A failing phase stops the run; the summary is still attempted and
    /// the phase's error is returned.
    pub async fn run_all(&self, ctx: &mut RunContext) -> Result<VerificationReport> {
        ctx.config.validate()?;
        info!("Starting deployment run {}", ctx.run_id);

        let result = self.run_phases(ctx).await;

        match &result {
            Ok(_) => ctx.evidence.set_outcome("succeeded"),
            Err(e) => ctx.evidence.set_outcome(format!("failed: {}", e)),
        }

        match (result, ctx.evidence.summarize()) {
            (Ok(report), Ok(_)) => {
                info!("Deployment run {} succeeded", ctx.run_id);
                Ok(report)
            }
            (Ok(_), Err(summary_err)) => Err(summary_err),
            (Err(e), summary) => {
                if let Err(summary_err) = summary {
                    warn!("Could not write summary: {}", summary_err);
                }
                error!("Deployment run {} failed: {}", ctx.run_id, e);
                Err(e)
            }
        }
    }

    async fn run_phases(&self, ctx: &mut RunContext) -> Result<VerificationReport> {
        self.provision(ctx).await?;
        self.configure(ctx).await?;
        self.verify(ctx).await
    }
}
