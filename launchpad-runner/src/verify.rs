//! Verification prober
//!
//! Confirms the deployed site answers over HTTP. Each endpoint is retried a
//! bounded number of times; only mandatory endpoints decide the verdict.

use async_trait::async_trait;
use launchpad_client::{RawResponse, TaskApiClient};
use std::time::Duration;
use tokio::time;
use tracing::{debug, info, warn};

/// Maximum body bytes kept per endpoint
pub const MAX_BODY_BYTES: usize = 2048;

/// An endpoint to probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub name: String,
    pub path: String,
    pub mandatory: bool,
}

impl Endpoint {
    pub fn mandatory(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            mandatory: true,
        }
    }

    pub fn optional(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            mandatory: false,
        }
    }
}

/// The deployed site: frontend, API health, and the task listing
pub fn default_endpoints() -> Vec<Endpoint> {
    vec![
        Endpoint::mandatory("frontend", "/"),
        Endpoint::mandatory("health", "/api/health"),
        Endpoint::optional("tasks", "/api/tasks"),
    ]
}

/// Issues GET requests against the deployment
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Full URL for a path, for the report
    fn url(&self, path: &str) -> String;

    /// One GET; transport failures are reported as a message
    async fn get(&self, path: &str) -> std::result::Result<RawResponse, String>;
}

#[async_trait]
impl HttpTransport for TaskApiClient {
    fn url(&self, path: &str) -> String {
        TaskApiClient::url(self, path)
    }

    async fn get(&self, path: &str) -> std::result::Result<RawResponse, String> {
        self.get_raw(path).await.map_err(|e| e.to_string())
    }
}

/// What happened to one endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointOutcome {
    pub name: String,
    pub url: String,
    pub mandatory: bool,
    pub attempts: u32,
    /// Status of the final attempt, if any response arrived
    pub status: Option<u16>,
    /// Body of the final response, truncated
    pub body: Option<String>,
    /// Transport error of the final attempt
    pub error: Option<String>,
    pub success: bool,
}

/// Outcome of a verification pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerificationReport {
    pub outcomes: Vec<EndpointOutcome>,
}

impl VerificationReport {
    /// True when every mandatory endpoint succeeded
    pub fn passed(&self) -> bool {
        self.outcomes.iter().all(|o| o.success || !o.mandatory)
    }

    /// Names of mandatory endpoints that failed
    pub fn failed_mandatory(&self) -> Vec<String> {
        self.outcomes
            .iter()
            .filter(|o| o.mandatory && !o.success)
            .map(|o| o.name.clone())
            .collect()
    }

    /// Warnings for optional endpoints that failed
    pub fn warnings(&self) -> Vec<String> {
        self.outcomes
            .iter()
            .filter(|o| !o.mandatory && !o.success)
            .map(|o| {
                format!(
                    "optional endpoint '{}' ({}) failed after {} attempt(s)",
                    o.name, o.url, o.attempts
                )
            })
            .collect()
    }

    /// Plain-text transcript for the verification evidence
    pub fn transcript(&self) -> String {
        let mut out = String::new();

        for o in &self.outcomes {
            let verdict = match (o.success, o.mandatory) {
                (true, _) => "PASS",
                (false, true) => "FAIL",
                (false, false) => "WARN",
            };
            let kind = if o.mandatory { "mandatory" } else { "optional" };

            out.push_str(&format!(
                "[{}] {} GET {} ({}, {} attempt(s))\n",
                verdict, o.name, o.url, kind, o.attempts
            ));
            match (&o.status, &o.error) {
                (Some(status), _) => out.push_str(&format!("status: {}\n", status)),
                (None, Some(error)) => out.push_str(&format!("error: {}\n", error)),
                (None, None) => {}
            }
            if let Some(body) = &o.body {
                out.push_str(&format!("body:\n{}\n", body.trim_end()));
            }
            out.push('\n');
        }

        out.push_str(if self.passed() {
            "Verification PASSED\n"
        } else {
            "Verification FAILED\n"
        });
        out
    }
}

/// Probes every endpoint in order
///
/// Each endpoint gets up to `max_attempts` GETs with `retry_delay` between
/// them; there is no delay after the final attempt.
pub async fn verify(
    transport: &dyn HttpTransport,
    endpoints: &[Endpoint],
    max_attempts: u32,
    retry_delay: Duration,
) -> VerificationReport {
    let max_attempts = max_attempts.max(1);
    let mut report = VerificationReport::default();

    for endpoint in endpoints {
        let outcome = probe_endpoint(transport, endpoint, max_attempts, retry_delay).await;

        if outcome.success {
            info!("{} OK after {} attempt(s)", outcome.url, outcome.attempts);
        } else if endpoint.mandatory {
            warn!("{} failed after {} attempt(s)", outcome.url, outcome.attempts);
        } else {
            warn!(
                "{} (optional) failed after {} attempt(s)",
                outcome.url, outcome.attempts
            );
        }

        report.outcomes.push(outcome);
    }

    report
}

async fn probe_endpoint(
    transport: &dyn HttpTransport,
    endpoint: &Endpoint,
    max_attempts: u32,
    retry_delay: Duration,
) -> EndpointOutcome {
    let url = transport.url(&endpoint.path);
    let mut outcome = EndpointOutcome {
        name: endpoint.name.clone(),
        url: url.clone(),
        mandatory: endpoint.mandatory,
        attempts: 0,
        status: None,
        body: None,
        error: None,
        success: false,
    };

    for attempt in 1..=max_attempts {
        outcome.attempts = attempt;

        match transport.get(&endpoint.path).await {
            Ok(response) => {
                debug!("GET {} -> {} (attempt {})", url, response.status, attempt);
                outcome.success = response.is_success();
                outcome.status = Some(response.status);
                outcome.body = Some(truncate_body(&response.body));
                outcome.error = None;
            }
            Err(e) => {
                debug!("GET {} failed: {} (attempt {})", url, e, attempt);
                outcome.status = None;
                outcome.body = None;
                outcome.error = Some(e);
            }
        }

        if outcome.success {
            break;
        }
        if attempt < max_attempts {
            time::sleep(retry_delay).await;
        }
    }

    outcome
}

fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_BODY_BYTES {
        return body.to_string();
    }

    let mut end = MAX_BODY_BYTES;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}\n... [truncated, {} bytes total]", &body[..end], body.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, VecDeque};
    use std::sync::Mutex;
    use tokio::time::Instant;

    /// Serves a scripted sequence of statuses per path; `None` is a
    /// connection error. Once a script runs out its last entry repeats.
    struct ScriptedTransport {
        scripts: Mutex<HashMap<String, VecDeque<Option<u16>>>>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedTransport {
        fn new(scripts: &[(&str, &[Option<u16>])]) -> Self {
            Self {
                scripts: Mutex::new(
                    scripts
                        .iter()
                        .map(|(path, seq)| (path.to_string(), seq.iter().copied().collect()))
                        .collect(),
                ),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls_to(&self, path: &str) -> usize {
            self.calls.lock().unwrap().iter().filter(|p| *p == path).count()
        }
    }

    #[async_trait]
    impl HttpTransport for ScriptedTransport {
        fn url(&self, path: &str) -> String {
            format!("http://203.0.113.7{}", path)
        }

        async fn get(&self, path: &str) -> std::result::Result<RawResponse, String> {
            self.calls.lock().unwrap().push(path.to_string());

            let mut scripts = self.scripts.lock().unwrap();
            let script = scripts.get_mut(path).expect("unscripted path");
            let next = if script.len() > 1 {
                script.pop_front().flatten()
            } else {
                script.front().copied().flatten()
            };

            match next {
                Some(status) => Ok(RawResponse {
                    status,
                    body: format!("status {status}"),
                }),
                None => Err("connection refused".to_string()),
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_health_recovers_on_fourth_attempt() {
        let transport = ScriptedTransport::new(&[(
            "/api/health",
            &[Some(500), Some(500), Some(500), Some(200)],
        )]);
        let started = Instant::now();

        let report = verify(
            &transport,
            &[Endpoint::mandatory("health", "/api/health")],
            5,
            Duration::from_secs(10),
        )
        .await;

        let outcome = &report.outcomes[0];
        assert!(outcome.success);
        assert_eq!(outcome.attempts, 4);
        assert_eq!(outcome.status, Some(200));
        assert!(report.passed());
        assert_eq!(started.elapsed(), Duration::from_secs(30));
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_attempts_fail_without_trailing_sleep() {
        let transport = ScriptedTransport::new(&[("/", &[None])]);
        let started = Instant::now();

        let report = verify(
            &transport,
            &[Endpoint::mandatory("frontend", "/")],
            3,
            Duration::from_secs(10),
        )
        .await;

        assert!(!report.passed());
        assert_eq!(report.failed_mandatory(), vec!["frontend".to_string()]);
        assert_eq!(transport.calls_to("/"), 3);
        assert_eq!(started.elapsed(), Duration::from_secs(20));
        assert_eq!(
            report.outcomes[0].error.as_deref(),
            Some("connection refused")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_optional_failure_only_warns() {
        let transport = ScriptedTransport::new(&[
            ("/", &[Some(200)]),
            ("/api/health", &[Some(200)]),
            ("/api/tasks", &[Some(502)]),
        ]);

        let report = verify(&transport, &default_endpoints(), 2, Duration::from_secs(1)).await;

        assert!(report.passed());
        assert!(report.failed_mandatory().is_empty());
        assert_eq!(report.warnings().len(), 1);
        assert!(report.warnings()[0].contains("tasks"));
        assert!(report.transcript().contains("[WARN] tasks"));
        assert!(report.transcript().ends_with("Verification PASSED\n"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_endpoints_probed_in_order() {
        let transport = ScriptedTransport::new(&[
            ("/", &[Some(200)]),
            ("/api/health", &[Some(200)]),
            ("/api/tasks", &[Some(200)]),
        ]);

        verify(&transport, &default_endpoints(), 1, Duration::ZERO).await;

        assert_eq!(
            *transport.calls.lock().unwrap(),
            vec!["/", "/api/health", "/api/tasks"]
        );
    }

    #[test]
    fn test_truncate_body() {
        let short = "ok";
        assert_eq!(truncate_body(short), "ok");

        let long = "é".repeat(MAX_BODY_BYTES);
        let truncated = truncate_body(&long);
        assert!(truncated.len() < long.len());
        assert!(truncated.contains("[truncated"));
    }

    #[tokio::test]
    async fn test_verify_against_http_server() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/health"))
            .respond_with(ResponseTemplate::new(503))
            .up_to_n_times(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/health"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"status":"healthy"}"#))
            .mount(&server)
            .await;

        let client = TaskApiClient::new(server.uri());
        let report = verify(
            &client,
            &[Endpoint::mandatory("health", "/api/health")],
            5,
            Duration::from_millis(10),
        )
        .await;

        let outcome = &report.outcomes[0];
        assert!(outcome.success);
        assert_eq!(outcome.attempts, 3);
        assert_eq!(outcome.body.as_deref(), Some(r#"{"status":"healthy"}"#));
    }
}
