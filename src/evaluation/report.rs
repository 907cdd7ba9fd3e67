use std::fmt;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::harness::{CorrectnessPolicy, RunOutcome};
use super::tally::Metrics;
use crate::errors::AppError;
use crate::models::{EvaluationResult, RiskCategory, ScoreRecord};

const RULE: &str = "============================================================";

// ---------------------------------------------------------------------------
// System status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SystemStatus {
    /// No asymmetric errors and no provider failures.
    ProductionReady,
    /// A few safe wallets flagged, no bad wallet missed.
    Acceptable,
    NeedsReview,
}

impl SystemStatus {
    /// `tolerance` is the number of safe-classified-as-unsafe results still
    /// considered acceptable.
    pub fn from_metrics(metrics: &Metrics, tolerance: u32) -> Self {
        if metrics.asymmetric_errors() == 0 && metrics.errors == 0 {
            SystemStatus::ProductionReady
        } else if metrics.safe_classified_as_unsafe <= tolerance
            && metrics.unsafe_classified_as_safe == 0
        {
            SystemStatus::Acceptable
        } else {
            SystemStatus::NeedsReview
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SystemStatus::ProductionReady => "PRODUCTION READY",
            SystemStatus::Acceptable => "ACCEPTABLE",
            SystemStatus::NeedsReview => "NEEDS REVIEW",
        }
    }
}

impl fmt::Display for SystemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdown {
    pub category: RiskCategory,
    pub correct: u32,
    pub total: u32,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Misclassification {
    pub address: String,
    pub name: Option<String>,
    pub source: String,
    pub expected: RiskCategory,
    pub classified: RiskCategory,
    pub score: Option<ScoreRecord>,
    pub error: Option<String>,
}

impl From<&EvaluationResult> for Misclassification {
    fn from(result: &EvaluationResult) -> Self {
        Self {
            address: result.address.clone(),
            name: result.name.clone(),
            source: result.source.clone(),
            expected: result.expected_category,
            classified: result.classified_category,
            score: result.score.clone(),
            error: result.error.clone(),
        }
    }
}

/// Serializable summary of one run, handed to the report sinks.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub policy: CorrectnessPolicy,
    pub total: u32,
    pub correct: u32,
    pub errors: u32,
    pub categorized: u32,
    pub accuracy: f64,
    pub categories: Vec<CategoryBreakdown>,
    pub safe_classified_as_unsafe: u32,
    pub unsafe_classified_as_safe: u32,
    pub average_latency_ms: Option<f64>,
    /// Average latency of a second pass over the same dataset, when one ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat_average_latency_ms: Option<f64>,
    pub tolerance: u32,
    pub status: SystemStatus,
    pub misclassified: Vec<Misclassification>,
    pub results: Vec<EvaluationResult>,
}

impl Report {
    pub fn from_outcome(outcome: &RunOutcome, tolerance: u32) -> Self {
        let metrics = &outcome.metrics;

        let categories = RiskCategory::ALL
            .iter()
            .map(|c| (*c, metrics.category(*c)))
            .filter(|(_, tally)| tally.total > 0)
            .map(|(category, tally)| CategoryBreakdown {
                category,
                correct: tally.correct,
                total: tally.total,
                percentage: tally.percentage(),
            })
            .collect();

        let misclassified = outcome
            .results
            .iter()
            .filter(|r| !r.correct)
            .map(Misclassification::from)
            .collect();

        Self {
            run_id: outcome.run_id,
            started_at: outcome.started_at,
            finished_at: outcome.finished_at,
            policy: outcome.policy,
            total: metrics.total,
            correct: metrics.correct,
            errors: metrics.errors,
            categorized: metrics.categorized(),
            accuracy: metrics.accuracy(),
            categories,
            safe_classified_as_unsafe: metrics.safe_classified_as_unsafe,
            unsafe_classified_as_safe: metrics.unsafe_classified_as_safe,
            average_latency_ms: metrics.average_latency_ms(),
            repeat_average_latency_ms: None,
            tolerance,
            status: SystemStatus::from_metrics(metrics, tolerance),
            misclassified,
            results: outcome.results.clone(),
        }
    }

    /// Attach the latency of a repeat pass. Its classifications are not
    /// counted; only the provider's response time is compared.
    pub fn with_repeat_pass(mut self, repeat: &RunOutcome) -> Self {
        self.repeat_average_latency_ms = repeat.metrics.average_latency_ms();
        self
    }

    pub fn to_json(&self) -> Result<String, AppError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_json(&self, path: &Path) -> Result<(), AppError> {
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(|source| AppError::Output {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{RULE}")?;
        writeln!(f, "WALLET CLASSIFICATION SUMMARY ({} policy)", self.policy)?;
        writeln!(f, "{RULE}")?;
        writeln!(f, "Run: {}", self.run_id)?;
        writeln!(f, "Started: {}", self.started_at.format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(f, "Finished: {}", self.finished_at.format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(f)?;
        writeln!(f, "Total Wallets Tested: {}", self.total)?;
        writeln!(f, "Correct Classifications: {}", self.correct)?;
        writeln!(f, "Accuracy: {:.1}%", self.accuracy)?;
        writeln!(
            f,
            "Safe classified as unsafe: {} (good users penalized)",
            self.safe_classified_as_unsafe
        )?;
        writeln!(
            f,
            "Unsafe classified as safe: {} (bad users missed)",
            self.unsafe_classified_as_safe
        )?;
        writeln!(f, "Errors: {}", self.errors)?;
        if let Some(avg) = self.average_latency_ms {
            writeln!(f, "Average response time: {avg:.0}ms")?;
        }
        if let Some(repeat) = self.repeat_average_latency_ms {
            writeln!(f, "Repeat pass average response time: {repeat:.0}ms")?;
            if let Some(avg) = self.average_latency_ms.filter(|_| repeat > 0.0) {
                writeln!(f, "Repeat speedup: {:.1}x", avg / repeat)?;
            }
        }

        if !self.categories.is_empty() {
            writeln!(f)?;
            writeln!(f, "Breakdown by expected category:")?;
            for c in &self.categories {
                writeln!(
                    f,
                    "  {}: {}/{} ({:.1}%)",
                    c.category, c.correct, c.total, c.percentage
                )?;
            }
        }

        writeln!(f)?;
        writeln!(f, "Total Categorized: {}/{} wallets", self.categorized, self.total)?;

        if !self.results.is_empty() {
            writeln!(f)?;
            writeln!(f, "{RULE}")?;
            writeln!(f, "DETAILED RESULTS")?;
            writeln!(f, "{RULE}")?;
            for r in &self.results {
                let mark = if r.correct { "PASS" } else { "FAIL" };
                writeln!(f, "{mark} {} ({})", r.label(), r.address)?;
                writeln!(
                    f,
                    "   Expected: {} | Got: {}",
                    r.expected_category, r.classified_category
                )?;
                match (&r.score, &r.error) {
                    (Some(score), _) => {
                        writeln!(
                            f,
                            "   Score: {} | Status: {} | Risk: {}",
                            score.score, score.status, score.risk_level
                        )?;
                        if !score.risk_flags.is_empty() {
                            writeln!(f, "   Risk Flags: {} flags", score.risk_flags.len())?;
                        }
                    }
                    (None, Some(error)) => writeln!(f, "   Error: {error}")?,
                    (None, None) => {}
                }
            }
        }

        let flagged: Vec<&Misclassification> = self
            .misclassified
            .iter()
            .filter(|m| m.score.is_some())
            .collect();
        if !flagged.is_empty() {
            writeln!(f)?;
            writeln!(f, "MISCLASSIFIED ({}):", flagged.len())?;
            for m in flagged {
                let Some(score) = &m.score else { continue };
                writeln!(
                    f,
                    "  {} - expected {}, got {} (score {}, risk {})",
                    m.address, m.expected, m.classified, score.score, score.risk_level
                )?;
                for flag in &score.risk_flags {
                    writeln!(f, "    - {flag}")?;
                }
            }
        }

        writeln!(f)?;
        writeln!(f, "{RULE}")?;
        writeln!(f, "FINAL VERDICT: {}", self.status)?;
        match self.status {
            SystemStatus::ProductionReady => {
                writeln!(f, "No good users penalized, no bad users missed, no failed lookups.")?
            }
            SystemStatus::Acceptable => writeln!(
                f,
                "At most {} good users penalized and no bad users missed.",
                self.tolerance
            )?,
            SystemStatus::NeedsReview => {
                writeln!(f, "Review the misclassified wallets before relying on these scores.")?
            }
        }
        write!(f, "{RULE}")
    }
}
