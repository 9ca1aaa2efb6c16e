use async_trait::async_trait;

use super::error::ApiError;
use super::types::RequestParams;

/// Status and body of one HTTP exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Single-attempt GET against the fika API
/// This allows the cache wrapper to run against a fake source in tests
#[async_trait]
pub trait Transport: Send + Sync {
    /// Fetches `endpoint` with `params` as query string
    async fn get(&self, endpoint: &str, params: &RequestParams) -> Result<RawResponse, ApiError>;
}
