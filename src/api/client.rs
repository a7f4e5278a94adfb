// ABOUTME: reqwest-backed implementation of the platform API trait.
// ABOUTME: Adds bearer auth, JSON accept headers, and a fixed per-request timeout.

use super::error::{ApiError, ClientBuildSnafu, DecodeSnafu, TransportSnafu};
use super::models::{Deploy, DeployEnvelope, EventEnvelope, RawResponse, ServicePatch};
use super::{LogEndpoint, PlatformApi};
use crate::types::ServiceId;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use snafu::ResultExt;
use std::time::Duration;

/// Default platform API root.
pub const DEFAULT_API_URL: &str = "https://api.render.com/v1";

/// Timeout applied to each HTTP request, independent of any poll deadline.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for [`HttpPlatform`].
#[derive(Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: String,
    pub request_timeout: Duration,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            api_key: api_key.into(),
            request_timeout: REQUEST_TIMEOUT,
        }
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// Platform API over HTTPS.
pub struct HttpPlatform {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpPlatform {
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("deploykit/", env!("CARGO_PKG_VERSION")))
            .build()
            .context(ClientBuildSnafu)?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url, path))
            .bearer_auth(&self.api_key)
            .header(ACCEPT, "application/json")
    }

    async fn send(&self, request: RequestBuilder, path: &str) -> Result<RawResponse, ApiError> {
        let response = request.send().await.context(TransportSnafu { path })?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response
            .bytes()
            .await
            .context(TransportSnafu { path })?
            .to_vec();

        tracing::debug!(path, status, bytes = body.len(), "platform response");

        Ok(RawResponse {
            status,
            content_type,
            body,
        })
    }

    /// GET a JSON resource, turning non-success statuses into errors.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send(self.request(Method::GET, path), path).await?;
        if !response.is_success() {
            return Err(ApiError::Status {
                path: path.to_string(),
                status: response.status,
            });
        }
        serde_json::from_slice(&response.body).context(DecodeSnafu { path })
    }
}

#[async_trait]
impl PlatformApi for HttpPlatform {
    async fn latest_deploy(&self, service: &ServiceId) -> Result<Option<Deploy>, ApiError> {
        let path = format!("/services/{}/deploys?limit=1", service.path_segment());
        let deploys: Vec<DeployEnvelope> = self.get_json(&path).await?;
        Ok(deploys.into_iter().next().map(|envelope| envelope.deploy))
    }

    async fn events(
        &self,
        service: &ServiceId,
        limit: usize,
    ) -> Result<Vec<EventEnvelope>, ApiError> {
        let path = format!(
            "/services/{}/events?limit={}",
            service.path_segment(),
            limit
        );
        self.get_json(&path).await
    }

    async fn update_service(
        &self,
        service: &ServiceId,
        patch: &ServicePatch,
    ) -> Result<RawResponse, ApiError> {
        let path = format!("/services/{}", service.path_segment());
        let request = self.request(Method::PATCH, &path).json(patch);
        self.send(request, &path).await
    }

    async fn trigger_deploy(&self, service: &ServiceId) -> Result<RawResponse, ApiError> {
        let path = format!("/services/{}/deploys", service.path_segment());
        let request = self
            .request(Method::POST, &path)
            .json(&serde_json::Map::new());
        self.send(request, &path).await
    }

    async fn build_logs(&self, endpoint: &LogEndpoint) -> Result<RawResponse, ApiError> {
        let path = endpoint.path();
        self.send(self.request(Method::GET, &path), &path).await
    }
}
