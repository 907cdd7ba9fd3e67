pub mod score_client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::ScoreRecord;

pub use score_client::ScoreClient;
pub use types::{ApiHealth, ApiScore};

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Http(reqwest::Error),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected response: {0}")]
    Unexpected(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ProviderError::Unexpected(e.to_string())
        } else {
            ProviderError::Http(e)
        }
    }
}

/// Anything that can turn an address into a score record.
///
/// The harness only sees this trait, so tests can script verdicts and
/// failures without a network.
#[async_trait]
pub trait ScoreProvider: Send + Sync {
    async fn fetch_score(&self, address: &str) -> Result<ScoreRecord, ProviderError>;
}
