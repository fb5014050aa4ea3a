//! Reputation API access.

pub mod virustotal;

use crate::entry::EntryKind;
use async_trait::async_trait;

/// Status and body of one API response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        self.status == 429
    }

    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Error from a reputation lookup.
#[derive(Debug)]
pub enum LookupError {
    /// HTTP request failed.
    Http(reqwest::Error),
    /// Timeout.
    Timeout,
    /// Non-200, non-429 status.
    Status(u16),
    /// Still rate limited after the configured number of retries.
    RateLimited { retries: u32 },
    /// Body could not be parsed.
    InvalidResponse(String),
}

impl std::fmt::Display for LookupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LookupError::Http(e) => write!(f, "Network error: {}", e),
            LookupError::Timeout => write!(f, "Network error: request timed out"),
            LookupError::Status(code) => write!(f, "HTTP {}", code),
            LookupError::RateLimited { retries } => {
                write!(f, "Rate limited after {} retries", retries)
            }
            LookupError::InvalidResponse(msg) => write!(f, "Invalid response: {}", msg),
        }
    }
}

impl std::error::Error for LookupError {}

impl From<reqwest::Error> for LookupError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            LookupError::Timeout
        } else {
            LookupError::Http(e)
        }
    }
}

impl From<serde_json::Error> for LookupError {
    fn from(e: serde_json::Error) -> Self {
        LookupError::InvalidResponse(e.to_string())
    }
}

/// A source of per-entry reputation data.
#[async_trait]
pub trait ReputationApi: Send + Sync {
    /// Issue a single request for one entry. Rate limiting is reported as a
    /// 429 status, not as an error.
    async fn fetch(&self, kind: EntryKind, entry: &str) -> Result<RawResponse, LookupError>;

    /// Provider name for logging.
    fn name(&self) -> &str;
}
