// ABOUTME: Platform API abstraction used by every deploykit command.
// ABOUTME: The trait lets the poller and helpers run against scripted fakes.

mod client;
mod error;
mod models;

pub use client::{ClientConfig, DEFAULT_API_URL, HttpPlatform, REQUEST_TIMEOUT};
pub use error::{ApiError, ApiErrorKind};
pub use models::{
    BUILD_ENDED, BUILD_SUCCEEDED, Deploy, DeployEnvelope, EnvSpecificDetails, Event,
    EventEnvelope, RawResponse, ServiceDetailsPatch, ServicePatch, find_succeeded_build,
};

use crate::types::{BuildId, ServiceId};
use async_trait::async_trait;
use std::fmt;

/// Build log endpoints, in the order they are tried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEndpoint {
    /// `GET /builds/{build}/logs`
    Build(BuildId),
    /// `GET /services/{service}/builds/{build}/logs`
    ServiceBuild(ServiceId, BuildId),
}

impl LogEndpoint {
    /// Candidate endpoints for a build, most specific last.
    pub fn candidates(service: &ServiceId, build: &BuildId) -> [LogEndpoint; 2] {
        [
            LogEndpoint::Build(build.clone()),
            LogEndpoint::ServiceBuild(service.clone(), build.clone()),
        ]
    }

    pub fn path(&self) -> String {
        match self {
            LogEndpoint::Build(build) => format!("/builds/{}/logs", build.path_segment()),
            LogEndpoint::ServiceBuild(service, build) => format!(
                "/services/{}/builds/{}/logs",
                service.path_segment(),
                build.path_segment()
            ),
        }
    }
}

impl fmt::Display for LogEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Operations deploykit needs from the platform.
#[async_trait]
pub trait PlatformApi: Send + Sync {
    /// Most recent deploy of a service, `None` if the service has none yet.
    ///
    /// A non-success status is reported as [`ApiError::Status`].
    async fn latest_deploy(&self, service: &ServiceId) -> Result<Option<Deploy>, ApiError>;

    /// Up to `limit` service events, newest first.
    async fn events(
        &self,
        service: &ServiceId,
        limit: usize,
    ) -> Result<Vec<EventEnvelope>, ApiError>;

    /// `PATCH /services/{id}`. The caller judges the returned status.
    async fn update_service(
        &self,
        service: &ServiceId,
        patch: &ServicePatch,
    ) -> Result<RawResponse, ApiError>;

    /// `POST /services/{id}/deploys`. The caller judges the returned status.
    async fn trigger_deploy(&self, service: &ServiceId) -> Result<RawResponse, ApiError>;

    /// Fetch one build log endpoint. The caller judges the returned status.
    async fn build_logs(&self, endpoint: &LogEndpoint) -> Result<RawResponse, ApiError>;
}
