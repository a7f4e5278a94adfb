// ABOUTME: Post-deploy smoke tests against the deployed service.
// ABOUTME: Checks the health endpoint and then license validation.

use crate::api::REQUEST_TIMEOUT;
use crate::output::Output;
use reqwest::StatusCode;
use serde::Serialize;

pub const HEALTH_PATH: &str = "/health";
pub const LICENSE_VALIDATE_PATH: &str = "/api/v1/license/validate";

/// Sample key validated when none is given.
pub const DEFAULT_LICENSE_KEY: &str = "UAI-PRO-SAR57T4A-528F";

#[derive(Debug, thiserror::Error)]
pub enum SmokeError {
    #[error("health check returned HTTP {status}, expected 200")]
    HealthFailed { status: u16 },

    #[error("license validation returned HTTP {status}: {body}")]
    LicenseRejected { status: u16, body: String },

    #[error("health check request to {url} failed: {source}")]
    HealthUnreachable { url: String, source: reqwest::Error },

    #[error("license validation request to {url} failed: {source}")]
    LicenseUnreachable { url: String, source: reqwest::Error },

    #[error("failed to build HTTP client: {0}")]
    Client(reqwest::Error),
}

impl SmokeError {
    pub fn exit_code(&self) -> i32 {
        match self {
            SmokeError::HealthFailed { .. } => 2,
            SmokeError::HealthUnreachable { .. } => 3,
            SmokeError::LicenseRejected { .. } => 4,
            SmokeError::LicenseUnreachable { .. } => 5,
            SmokeError::Client(_) => 1,
        }
    }
}

/// Checks that passed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmokeReport {
    pub health_status: u16,
    pub license_status: u16,
}

#[derive(Serialize)]
struct LicenseRequest<'a> {
    license_key: &'a str,
}

/// HTTP client for one deployed service.
pub struct SmokeClient {
    client: reqwest::Client,
    base_url: String,
}

impl SmokeClient {
    pub fn new(base_url: &str) -> Result<Self, SmokeError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(SmokeError::Client)?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `GET /health` must answer exactly 200.
    pub async fn check_health(&self) -> Result<u16, SmokeError> {
        let url = self.url(HEALTH_PATH);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| SmokeError::HealthUnreachable { url, source })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(SmokeError::HealthFailed {
                status: status.as_u16(),
            });
        }
        Ok(status.as_u16())
    }

    /// `POST /api/v1/license/validate` must answer 2xx.
    pub async fn validate_license(&self, license_key: &str) -> Result<u16, SmokeError> {
        let url = self.url(LICENSE_VALIDATE_PATH);
        let response = self
            .client
            .post(&url)
            .json(&LicenseRequest { license_key })
            .send()
            .await
            .map_err(|source| SmokeError::LicenseUnreachable { url, source })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SmokeError::LicenseRejected {
                status: status.as_u16(),
                body,
            });
        }
        Ok(status.as_u16())
    }
}

/// Run all smoke checks, stopping at the first failure.
pub async fn run_smoke(
    base_url: &str,
    license_key: &str,
    output: &Output,
) -> Result<SmokeReport, SmokeError> {
    let client = SmokeClient::new(base_url)?;

    output.progress(&format!("  → GET {}{HEALTH_PATH}", client.base_url));
    let health_status = client.check_health().await?;
    tracing::debug!(status = health_status, "health check passed");

    output.progress(&format!("  → POST {}{LICENSE_VALIDATE_PATH}", client.base_url));
    let license_status = client.validate_license(license_key).await?;

    Ok(SmokeReport {
        health_status,
        license_status,
    })
}
