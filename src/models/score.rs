use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Status reported when the provider omits one.
pub const UNKNOWN_STATUS: &str = "Unknown";

// ---------------------------------------------------------------------------
// RiskLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    #[default]
    Unknown,
}

impl RiskLevel {
    /// Lenient parse for provider payloads: anything unrecognized is `Unknown`.
    ///
    /// Case-insensitive on purpose: a lowercase `"high"` also trips the Bad
    /// gate, where an exact `"HIGH"` comparison would let it through.
    pub fn from_api_str(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "LOW" => RiskLevel::Low,
            "MEDIUM" => RiskLevel::Medium,
            "HIGH" => RiskLevel::High,
            _ => RiskLevel::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
            RiskLevel::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ScoreRecord: one provider verdict
// ---------------------------------------------------------------------------

/// The score provider's verdict for a single address, with every field
/// already defaulted. Built once per provider response and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    pub score: i64,
    pub status: String,
    pub risk_flags: BTreeSet<String>,
    pub risk_level: RiskLevel,
}

impl Default for ScoreRecord {
    fn default() -> Self {
        Self {
            score: 0,
            status: UNKNOWN_STATUS.into(),
            risk_flags: BTreeSet::new(),
            risk_level: RiskLevel::Unknown,
        }
    }
}

impl ScoreRecord {
    pub fn new(score: i64, status: impl Into<String>, risk_level: RiskLevel) -> Self {
        Self {
            score,
            status: status.into(),
            risk_flags: BTreeSet::new(),
            risk_level,
        }
    }

    pub fn with_flag(mut self, flag: impl Into<String>) -> Self {
        self.risk_flags.insert(flag.into());
        self
    }

    /// True if any flag token contains `marker` as a substring.
    ///
    /// Matching is by containment rather than equality so that new flag
    /// spellings from the provider (`SANCTIONS_OFAC_LIST`, structured flag
    /// objects serialized to text) still trip the check.
    pub fn has_flag_containing(&self, marker: &str) -> bool {
        self.risk_flags.iter().any(|flag| flag.contains(marker))
    }
}

impl fmt::Display for ScoreRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "score={} status={} level={} flags={}",
            self.score,
            self.status,
            self.risk_level,
            self.risk_flags.len(),
        )
    }
}
