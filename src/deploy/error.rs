// ABOUTME: Error types for updating a service and triggering a deploy.
// ABOUTME: Each rejection maps to its own exit code.

use crate::api::ApiError;

/// Errors from pointing a service at a new image and deploying it.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    /// The service update was not accepted.
    #[error("service update rejected with HTTP {status}: {body}")]
    PatchRejected { status: u16, body: String },

    /// The deploy request was not accepted.
    #[error("deploy trigger rejected with HTTP {status}: {body}")]
    TriggerRejected { status: u16, body: String },

    /// The platform could not be reached.
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl DeployError {
    pub fn exit_code(&self) -> i32 {
        match self {
            DeployError::PatchRejected { .. } => 2,
            DeployError::TriggerRejected { .. } => 3,
            DeployError::Api(_) => 1,
        }
    }
}
