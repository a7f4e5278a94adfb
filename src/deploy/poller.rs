// ABOUTME: Polls a service's latest deploy until it is live, failed, or out of time.
// ABOUTME: On a terminal status it reads the event history for diagnostics.

use crate::api::{ApiError, Deploy, EventEnvelope, PlatformApi, find_succeeded_build};
use crate::diagnostics::{Diagnostics, Warning};
use crate::output::Output;
use crate::types::{BuildId, DeployStatus, ServiceId, StatusClass, StatusClassifier};
use std::time::Duration;
use tokio::time::{Instant, sleep};

/// Fixed delay between polls.
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Events requested when looking for the build behind a live deploy.
pub const CORRELATION_EVENT_LIMIT: usize = 20;

/// Events kept for the diagnostic dump after a failed deploy.
pub const FAILURE_EVENT_LIMIT: usize = 20;

/// How a wait ended. Each variant has its own exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failed,
    TimedOut,
}

impl Outcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::Success => 0,
            Outcome::Failed => 2,
            Outcome::TimedOut => 3,
        }
    }
}

/// Settings for a single wait.
#[derive(Debug, Clone)]
pub struct WaitOptions {
    pub timeout: Duration,
    pub poll_interval: Duration,
    pub classifier: StatusClassifier,
}

impl WaitOptions {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            poll_interval: POLL_INTERVAL,
            classifier: StatusClassifier::default(),
        }
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn classifier(mut self, classifier: StatusClassifier) -> Self {
        self.classifier = classifier;
        self
    }
}

/// Everything observed during a wait.
#[derive(Debug)]
pub struct WaitReport {
    pub outcome: Outcome,
    /// One entry per distinct consecutive status, in order.
    pub transitions: Vec<DeployStatus>,
    /// Last deploy returned by the platform.
    pub deploy: Option<Deploy>,
    /// Build correlated with a live deploy.
    pub build_id: Option<BuildId>,
    /// Recent events captured after a failed deploy.
    pub failure_events: Vec<EventEnvelope>,
    pub elapsed: Duration,
    pub diagnostics: Diagnostics,
}

/// Wait for the latest deploy of `service` to reach a terminal status.
///
/// The deadline is checked before every poll, so a zero timeout returns
/// [`Outcome::TimedOut`] without calling the platform. A non-success status
/// from the deploy list counts as "no deploy yet" and a deploy without a
/// status counts as in progress; transport and decoding errors are returned.
pub async fn wait_for_deploy<A>(
    api: &A,
    service: &ServiceId,
    options: &WaitOptions,
    output: &Output,
) -> Result<WaitReport, ApiError>
where
    A: PlatformApi + ?Sized,
{
    let start = Instant::now();
    let mut session = Session::default();

    while start.elapsed() < options.timeout {
        let deploy = match api.latest_deploy(service).await {
            Ok(deploy) => deploy,
            Err(e) if e.is_transient() => {
                tracing::debug!(%service, error = %e, "deploy list unavailable, retrying");
                None
            }
            Err(e) => return Err(e),
        };

        let Some(deploy) = deploy else {
            tracing::debug!(%service, "no deploy found yet");
            sleep(options.poll_interval).await;
            continue;
        };

        let class = match &deploy.status {
            Some(status) => {
                if session.observe(status) {
                    output.status(status.as_str());
                }
                options.classifier.classify(status)
            }
            None => {
                tracing::debug!(%service, "latest deploy has no status yet");
                StatusClass::InProgress
            }
        };
        session.deploy = Some(deploy);

        match class {
            StatusClass::Live => {
                session.build_id = correlate_build(api, service, &mut session.diagnostics).await;
                return Ok(session.finish(Outcome::Success, start));
            }
            StatusClass::Failed => {
                session.failure_events =
                    recent_events(api, service, &mut session.diagnostics).await;
                return Ok(session.finish(Outcome::Failed, start));
            }
            StatusClass::InProgress => sleep(options.poll_interval).await,
        }
    }

    tracing::debug!(%service, timeout = ?options.timeout, "deploy wait timed out");
    Ok(session.finish(Outcome::TimedOut, start))
}

/// Mutable state of one wait.
#[derive(Default)]
struct Session {
    last_status: Option<DeployStatus>,
    transitions: Vec<DeployStatus>,
    deploy: Option<Deploy>,
    build_id: Option<BuildId>,
    failure_events: Vec<EventEnvelope>,
    diagnostics: Diagnostics,
}

impl Session {
    /// Record a status; true when it differs from the previous one.
    fn observe(&mut self, status: &DeployStatus) -> bool {
        if self.last_status.as_ref() == Some(status) {
            return false;
        }
        self.last_status = Some(status.clone());
        self.transitions.push(status.clone());
        true
    }

    fn finish(self, outcome: Outcome, start: Instant) -> WaitReport {
        WaitReport {
            outcome,
            transitions: self.transitions,
            deploy: self.deploy,
            build_id: self.build_id,
            failure_events: self.failure_events,
            elapsed: start.elapsed(),
            diagnostics: self.diagnostics,
        }
    }
}

/// Most recent successful build, if the event history is readable.
async fn correlate_build<A>(
    api: &A,
    service: &ServiceId,
    diag: &mut Diagnostics,
) -> Option<BuildId>
where
    A: PlatformApi + ?Sized,
{
    match api.events(service, CORRELATION_EVENT_LIMIT).await {
        Ok(events) => find_succeeded_build(&events),
        Err(e) => {
            diag.warn(Warning::event_history(format!(
                "could not read events for {service}: {e}"
            )));
            None
        }
    }
}

async fn recent_events<A>(
    api: &A,
    service: &ServiceId,
    diag: &mut Diagnostics,
) -> Vec<EventEnvelope>
where
    A: PlatformApi + ?Sized,
{
    match api.events(service, FAILURE_EVENT_LIMIT).await {
        Ok(mut events) => {
            events.truncate(FAILURE_EVENT_LIMIT);
            events
        }
        Err(e) => {
            diag.warn(Warning::event_history(format!(
                "could not read events for {service}: {e}"
            )));
            Vec::new()
        }
    }
}
