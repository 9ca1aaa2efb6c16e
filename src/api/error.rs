use thiserror::Error;

/// Why a remote call produced no data
///
/// Every variant is a failed request and must be shown as an error,
/// never as an empty result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("no API base URL configured")]
    NotConfigured,

    #[error("a search query or city is required")]
    MissingCriteria,

    #[error("request to {endpoint} timed out")]
    Timeout { endpoint: String },

    #[error("request to {endpoint} failed: {message}")]
    Transport { endpoint: String, message: String },

    #[error("{endpoint} answered with status {status}")]
    Status { endpoint: String, status: u16 },

    #[error("malformed response from {endpoint}: {message}")]
    Malformed { endpoint: String, message: String },
}

impl ApiError {
    pub(crate) fn from_reqwest(endpoint: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                endpoint: endpoint.to_string(),
            }
        } else {
            Self::Transport {
                endpoint: endpoint.to_string(),
                message: err.to_string(),
            }
        }
    }

    pub(crate) fn malformed(endpoint: &str, err: impl std::fmt::Display) -> Self {
        Self::Malformed {
            endpoint: endpoint.to_string(),
            message: err.to_string(),
        }
    }
}
