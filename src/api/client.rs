use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::error::ApiError;
use super::traits::{RawResponse, Transport};
use super::types::RequestParams;
use crate::config::Settings;

const USER_AGENT: &str = concat!("fika-finder/", env!("CARGO_PKG_VERSION"));

/// reqwest-backed transport
pub struct HttpTransport {
    client: Client,
    base_url: Option<String>,
}

impl HttpTransport {
    /// Builds a client with a request timeout; an empty base URL counts as missing
    pub fn new(base_url: Option<String>, timeout: Duration) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ApiError::Transport {
                endpoint: String::new(),
                message: format!("failed to create HTTP client: {e}"),
            })?;

        let base_url = base_url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty());

        Ok(Self { client, base_url })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, ApiError> {
        Self::new(settings.api_url.clone(), settings.request_timeout)
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }
}

/// Joins base URL and endpoint with exactly one slash
pub fn join_url(base: &str, endpoint: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        endpoint.trim_start_matches('/')
    )
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, endpoint: &str, params: &RequestParams) -> Result<RawResponse, ApiError> {
        let base = self.base_url.as_deref().ok_or(ApiError::NotConfigured)?;
        let url = join_url(base, endpoint);

        debug!("Fetching URL: {} {:?}", url, params.query_pairs());

        let response = self
            .client
            .get(&url)
            .query(&params.query_pairs())
            .send()
            .await
            .map_err(|e| ApiError::from_reqwest(endpoint, e))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::from_reqwest(endpoint, e))?;

        debug!("Downloaded {} bytes from {} (status {})", body.len(), url, status);

        Ok(RawResponse { status, body })
    }
}
