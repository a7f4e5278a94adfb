// ABOUTME: Application-wide error type for deploykit commands.
// ABOUTME: Wraps per-module errors and maps each to a process exit code.

use crate::api::ApiError;
use crate::deploy::DeployError;
use crate::logs::LogsError;
use crate::smoke::SmokeError;
use thiserror::Error;

/// Exit code for errors that have no dedicated code.
pub const EXIT_ERROR: i32 = 1;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Deploy(#[from] DeployError),

    #[error(transparent)]
    Logs(#[from] LogsError),

    #[error(transparent)]
    Smoke(#[from] SmokeError),
}

impl Error {
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Deploy(e) => e.exit_code(),
            Error::Logs(e) => e.exit_code(),
            Error::Smoke(e) => e.exit_code(),
            Error::Api(_) => EXIT_ERROR,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_the_wrapped_error() {
        let err: Error = SmokeError::HealthFailed { status: 500 }.into();
        assert_eq!(err.exit_code(), 2);

        let err: Error = DeployError::TriggerRejected {
            status: 500,
            body: String::new(),
        }
        .into();
        assert_eq!(err.exit_code(), 3);

        let err: Error = ApiError::Status {
            path: "/services/x/events".to_string(),
            status: 500,
        }
        .into();
        assert_eq!(err.exit_code(), EXIT_ERROR);
    }
}
