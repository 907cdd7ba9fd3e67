use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use riskeval::models::{AddressRecord, RiskCategory, RiskLevel, ScoreRecord};
use riskeval::provider::{ProviderError, ScoreProvider};

/// What the fake provider does for one address.
#[derive(Clone)]
#[allow(dead_code)]
pub enum Reply {
    Score(ScoreRecord),
    Fail(String),
    /// Answer after a pause, for overlap and timeout tests.
    Slow(Duration, ScoreRecord),
}

/// In-memory provider with a fixed reply per address. Unknown addresses
/// fail. Every call is recorded in arrival order.
#[derive(Default)]
pub struct ScriptedProvider {
    replies: HashMap<String, Reply>,
    calls: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, address: &str, reply: Reply) -> Self {
        self.replies.insert(address.to_string(), reply);
        self
    }

    pub fn score(self, address: &str, record: ScoreRecord) -> Self {
        self.reply(address, Reply::Score(record))
    }

    pub fn fail(self, address: &str, message: &str) -> Self {
        self.reply(address, Reply::Fail(message.to_string()))
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ScoreProvider for ScriptedProvider {
    async fn fetch_score(&self, address: &str) -> Result<ScoreRecord, ProviderError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(address.to_string());
        }

        match self.replies.get(address).cloned() {
            Some(Reply::Score(record)) => Ok(record),
            Some(Reply::Fail(message)) => Err(ProviderError::Unexpected(message)),
            Some(Reply::Slow(delay, record)) => {
                tokio::time::sleep(delay).await;
                Ok(record)
            }
            None => Err(ProviderError::Unexpected(format!("no reply scripted for {address}"))),
        }
    }
}

// ---------------------------------------------------------------------------
// Record builders
// ---------------------------------------------------------------------------

#[allow(dead_code)]
pub fn established() -> ScoreRecord {
    ScoreRecord::new(92, "Trusted", RiskLevel::Low)
}

#[allow(dead_code)]
pub fn defi() -> ScoreRecord {
    ScoreRecord::new(70, "Stable", RiskLevel::Low)
}

#[allow(dead_code)]
pub fn new_wallet() -> ScoreRecord {
    ScoreRecord::new(12, "New/Unproven", RiskLevel::Medium)
}

#[allow(dead_code)]
pub fn mixer() -> ScoreRecord {
    ScoreRecord::new(5, "Flagged", RiskLevel::High).with_flag("PRIVACY_MIXER")
}

#[allow(dead_code)]
pub fn edge_case() -> ScoreRecord {
    ScoreRecord::new(45, "Unknown", RiskLevel::Medium)
}

#[allow(dead_code)]
pub fn wallet(address: &str, expected: RiskCategory) -> AddressRecord {
    AddressRecord::new(address, expected, "test")
}
