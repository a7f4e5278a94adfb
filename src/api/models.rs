// ABOUTME: Wire types for the platform's deploy, event, and service resources.
// ABOUTME: Includes the build-success scan used to correlate deploys with builds.

use crate::types::{BuildId, DeployId, DeployStatus, ImageRef};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Event type emitted when a build finishes.
pub const BUILD_ENDED: &str = "build_ended";

/// `details.buildStatus` value for a successful build.
pub const BUILD_SUCCEEDED: &str = "succeeded";

/// One element of `GET /services/{id}/deploys`.
#[derive(Debug, Clone, Deserialize)]
pub struct DeployEnvelope {
    pub deploy: Deploy,
    #[serde(default)]
    pub cursor: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deploy {
    #[serde(default)]
    pub id: Option<DeployId>,
    /// Absent or null while the platform has not assigned one yet.
    #[serde(default)]
    pub status: Option<DeployStatus>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub finished_at: Option<DateTime<Utc>>,
}

impl Deploy {
    /// Wall time between creation and completion, when both are known.
    pub fn duration(&self) -> Option<chrono::Duration> {
        Some(self.finished_at? - self.created_at?)
    }
}

/// One element of `GET /services/{id}/events`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope {
    pub event: Event,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cursor: Option<String>,
}

/// A service event. Fields we don't interpret are kept so event dumps stay
/// faithful to what the platform sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub details: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Event {
    /// The build id if this event records a successful build.
    pub fn succeeded_build(&self) -> Option<BuildId> {
        if self.kind != BUILD_ENDED {
            return None;
        }
        if self.details.get("buildStatus").and_then(Value::as_str) != Some(BUILD_SUCCEEDED) {
            return None;
        }
        self.details
            .get("buildId")
            .and_then(Value::as_str)
            .map(BuildId::new)
    }

    pub fn timestamp(&self) -> Option<&str> {
        self.extra.get("timestamp").and_then(Value::as_str)
    }
}

/// First successful build in list order.
///
/// The platform lists events newest first, so this is the most recent
/// successful build.
pub fn find_succeeded_build(events: &[EventEnvelope]) -> Option<BuildId> {
    events.iter().find_map(|e| e.event.succeeded_build())
}

/// Body of `PATCH /services/{id}` pointing the service at a new image.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicePatch {
    pub service_details: ServiceDetailsPatch,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDetailsPatch {
    pub env: String,
    pub env_specific_details: EnvSpecificDetails,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvSpecificDetails {
    pub image: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub docker_command: Option<String>,
}

impl ServicePatch {
    /// Patch for a docker-runtime service.
    pub fn docker_image(image: &ImageRef, docker_command: Option<&str>) -> Self {
        Self {
            service_details: ServiceDetailsPatch {
                env: "docker".to_string(),
                env_specific_details: EnvSpecificDetails {
                    image: image.as_str().to_string(),
                    docker_command: docker_command.map(str::to_string),
                },
            },
        }
    }
}

/// Status, content type, and body of a response whose success the caller
/// decides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.starts_with("application/json"))
    }
}
