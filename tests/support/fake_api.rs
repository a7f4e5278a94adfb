// ABOUTME: Scripted in-memory implementation of the platform API trait.
// ABOUTME: Replays deploy statuses in order and records every call.

use async_trait::async_trait;
use deploykit::api::{
    ApiError, Deploy, EventEnvelope, LogEndpoint, PlatformApi, RawResponse, ServicePatch,
};
use deploykit::types::{DeployId, DeployStatus, ServiceId};
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::collections::{HashMap, VecDeque};

/// One answer to a `latest_deploy` call.
#[derive(Debug, Clone)]
pub enum Step {
    /// A deploy with this status.
    Status(&'static str),
    /// A deploy whose status is not set yet.
    Unset,
    /// Empty deploy list.
    NoDeploy,
    /// Non-success HTTP status from the deploy list.
    HttpError(u16),
}

/// Calls received by the fake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    LatestDeploy,
    Events(usize),
    UpdateService(Value),
    TriggerDeploy,
    BuildLogs(String),
}

/// Platform fake. The last scripted step repeats once the script runs out.
pub struct FakeApi {
    steps: Mutex<VecDeque<Step>>,
    last_step: Mutex<Step>,
    events: Result<Vec<EventEnvelope>, u16>,
    patch_status: u16,
    trigger: RawResponse,
    logs: HashMap<String, RawResponse>,
    calls: Mutex<Vec<Call>>,
}

impl Default for FakeApi {
    fn default() -> Self {
        Self {
            steps: Mutex::new(VecDeque::new()),
            last_step: Mutex::new(Step::NoDeploy),
            events: Ok(Vec::new()),
            patch_status: 200,
            trigger: json_response(201, json!({"id": "dep-new", "status": "created"})),
            logs: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script deploy statuses, in order.
    pub fn statuses<I>(self, statuses: I) -> Self
    where
        I: IntoIterator<Item = &'static str>,
    {
        self.steps(statuses.into_iter().map(Step::Status))
    }

    pub fn steps<I>(self, steps: I) -> Self
    where
        I: IntoIterator<Item = Step>,
    {
        self.steps.lock().extend(steps);
        self
    }

    /// Events returned by `events`.
    pub fn with_events(mut self, events: Value) -> Self {
        self.events = Ok(serde_json::from_value(events).expect("valid event list"));
        self
    }

    /// Make `events` fail with an HTTP status.
    pub fn events_fail(mut self, status: u16) -> Self {
        self.events = Err(status);
        self
    }

    pub fn patch_status(mut self, status: u16) -> Self {
        self.patch_status = status;
        self
    }

    pub fn trigger(mut self, status: u16, body: Value) -> Self {
        self.trigger = json_response(status, body);
        self
    }

    /// Answer a log endpoint path with the given status and body.
    pub fn log(mut self, path: &str, status: u16, body: &[u8]) -> Self {
        self.logs.insert(
            path.to_string(),
            RawResponse {
                status,
                content_type: Some("text/plain".to_string()),
                body: body.to_vec(),
            },
        );
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn deploy_calls(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| **c == Call::LatestDeploy)
            .count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().push(call);
    }

    fn next_step(&self) -> Step {
        let mut steps = self.steps.lock();
        let mut last = self.last_step.lock();
        if let Some(step) = steps.pop_front() {
            *last = step;
        }
        last.clone()
    }
}

fn deploy(status: Option<DeployStatus>) -> Deploy {
    Deploy {
        id: Some(DeployId::new("dep-1")),
        status,
        created_at: None,
        finished_at: None,
    }
}

fn json_response(status: u16, body: Value) -> RawResponse {
    RawResponse {
        status,
        content_type: Some("application/json".to_string()),
        body: serde_json::to_vec(&body).unwrap(),
    }
}

fn status_error(path: &str, status: u16) -> ApiError {
    ApiError::Status {
        path: path.to_string(),
        status,
    }
}

#[async_trait]
impl PlatformApi for FakeApi {
    async fn latest_deploy(&self, _service: &ServiceId) -> Result<Option<Deploy>, ApiError> {
        self.record(Call::LatestDeploy);
        match self.next_step() {
            Step::Status(status) => Ok(Some(deploy(Some(DeployStatus::new(status))))),
            Step::Unset => Ok(Some(deploy(None))),
            Step::NoDeploy => Ok(None),
            Step::HttpError(status) => Err(status_error("/deploys", status)),
        }
    }

    async fn events(
        &self,
        _service: &ServiceId,
        limit: usize,
    ) -> Result<Vec<EventEnvelope>, ApiError> {
        self.record(Call::Events(limit));
        match &self.events {
            Ok(events) => Ok(events.iter().take(limit).cloned().collect()),
            Err(status) => Err(status_error("/events", *status)),
        }
    }

    async fn update_service(
        &self,
        _service: &ServiceId,
        patch: &ServicePatch,
    ) -> Result<RawResponse, ApiError> {
        self.record(Call::UpdateService(serde_json::to_value(patch).unwrap()));
        Ok(RawResponse {
            status: self.patch_status,
            content_type: None,
            body: b"patch response".to_vec(),
        })
    }

    async fn trigger_deploy(&self, _service: &ServiceId) -> Result<RawResponse, ApiError> {
        self.record(Call::TriggerDeploy);
        Ok(self.trigger.clone())
    }

    async fn build_logs(&self, endpoint: &LogEndpoint) -> Result<RawResponse, ApiError> {
        let path = endpoint.path();
        self.record(Call::BuildLogs(path.clone()));
        Ok(self.logs.get(&path).cloned().unwrap_or(RawResponse {
            status: 404,
            content_type: None,
            body: Vec::new(),
        }))
    }
}
