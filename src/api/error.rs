// ABOUTME: Error types for platform API calls with SNAFU context selectors.
// ABOUTME: Separates transport, HTTP status, and decoding failures.

use snafu::Snafu;

/// Failure talking to the platform API.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ApiError {
    #[snafu(display("failed to build HTTP client: {source}"))]
    ClientBuild { source: reqwest::Error },

    #[snafu(display("request to {path} failed: {source}"))]
    Transport { path: String, source: reqwest::Error },

    #[snafu(display("{path} returned HTTP {status}"))]
    Status { path: String, status: u16 },

    #[snafu(display("unexpected response body from {path}: {source}"))]
    Decode {
        path: String,
        source: serde_json::Error,
    },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// The client could not be constructed.
    Setup,
    /// Connection, TLS, or per-request timeout failure.
    Transport,
    /// The platform answered with a non-success status.
    Status,
    /// The platform answered with a body we could not parse.
    Decode,
}

impl ApiError {
    pub fn kind(&self) -> ApiErrorKind {
        match self {
            ApiError::ClientBuild { .. } => ApiErrorKind::Setup,
            ApiError::Transport { .. } => ApiErrorKind::Transport,
            ApiError::Status { .. } => ApiErrorKind::Status,
            ApiError::Decode { .. } => ApiErrorKind::Decode,
        }
    }

    /// Whether a poller may retry after this error.
    ///
    /// Only non-success statuses qualify. Transport and decoding failures
    /// end the run.
    pub fn is_transient(&self) -> bool {
        self.kind() == ApiErrorKind::Status
    }

    /// HTTP status, if the platform answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
