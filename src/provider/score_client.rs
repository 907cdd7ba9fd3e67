use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};

use super::types::{ApiHealth, ApiScore};
use super::{ProviderError, ScoreProvider};
use crate::models::ScoreRecord;

pub const DEFAULT_SCORE_API: &str = "https://oro-api-private.onrender.com";

/// Longest error body we keep from a non-2xx response.
const MAX_ERROR_BODY: usize = 200;

#[derive(Debug, Clone)]
pub struct ScoreClient {
    http: Client,
    base_url: String,
    timeout: Duration,
}

impl ScoreClient {
    pub fn new(http: Client, base_url: impl Into<String>, timeout: Duration) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http,
            base_url,
            timeout,
        }
    }

    /// Build a client with its own connection pool and a per-request timeout.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ProviderError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self::new(http, base_url, timeout))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn score_url(&self, address: &str) -> String {
        format!("{}/score/{}", self.base_url, address.trim())
    }

    /// Fetch the raw score document for one address.
    pub async fn get_score(&self, address: &str) -> Result<ApiScore, ProviderError> {
        let url = self.score_url(address);
        let resp = self.http.get(&url).send().await.map_err(|e| self.map_err(e))?;
        let resp = check_status(resp).await?;

        let body: serde_json::Value = resp.json().await.map_err(|e| self.map_err(e))?;
        ApiScore::from_value(body)
    }

    /// Query the provider's health endpoint.
    pub async fn health(&self) -> Result<ApiHealth, ProviderError> {
        let url = format!("{}/health", self.base_url);
        let resp = self.http.get(&url).send().await.map_err(|e| self.map_err(e))?;
        let resp = check_status(resp).await?;

        let health: ApiHealth = resp.json().await.map_err(|e| self.map_err(e))?;
        Ok(health)
    }

    fn map_err(&self, e: reqwest::Error) -> ProviderError {
        if e.is_timeout() {
            ProviderError::Timeout(self.timeout)
        } else {
            e.into()
        }
    }
}

async fn check_status(resp: Response) -> Result<Response, ProviderError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let mut body = resp.text().await.unwrap_or_default();
    if body.len() > MAX_ERROR_BODY {
        let cut = (0..=MAX_ERROR_BODY)
            .rev()
            .find(|i| body.is_char_boundary(*i))
            .unwrap_or(0);
        body.truncate(cut);
    }

    Err(ProviderError::Status {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl ScoreProvider for ScoreClient {
    async fn fetch_score(&self, address: &str) -> Result<ScoreRecord, ProviderError> {
        let score = self.get_score(address).await?;
        Ok(score.into_record())
    }
}
