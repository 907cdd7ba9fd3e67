use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{EvaluationResult, RiskCategory};

/// `part / whole * 100`, or 0 when there is nothing to divide by.
pub fn percentage(part: u32, whole: u32) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    f64::from(part) / f64::from(whole) * 100.0
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTally {
    pub total: u32,
    pub correct: u32,
}

impl CategoryTally {
    pub fn percentage(&self) -> f64 {
        percentage(self.correct, self.total)
    }
}

/// Running totals for one evaluation run.
///
/// Owned by a single `evaluate` call and returned with its results; a new
/// run always starts from `Metrics::default()`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub total: u32,
    pub correct: u32,
    /// Provider failures.
    pub errors: u32,
    /// Keyed by expected category.
    pub per_category: BTreeMap<RiskCategory, CategoryTally>,
    /// Expected anything but `Bad`, classified `Bad`.
    pub safe_classified_as_unsafe: u32,
    /// Expected `Bad`, classified as something else.
    pub unsafe_classified_as_safe: u32,
    /// Summed latency of successful provider calls.
    pub success_latency_ms: u64,
}

impl Metrics {
    pub fn record(&mut self, result: &EvaluationResult) {
        self.total += 1;
        let tally = self.per_category.entry(result.expected_category).or_default();
        tally.total += 1;

        if result.correct {
            self.correct += 1;
            tally.correct += 1;
        }

        if !result.succeeded {
            self.errors += 1;
            return;
        }

        self.success_latency_ms += result.latency_ms;

        if result.is_safe_classified_as_unsafe() {
            self.safe_classified_as_unsafe += 1;
        }
        if result.is_unsafe_classified_as_safe() {
            self.unsafe_classified_as_safe += 1;
        }
    }

    pub fn accuracy(&self) -> f64 {
        percentage(self.correct, self.total)
    }

    /// Entries for which the provider answered.
    pub fn categorized(&self) -> u32 {
        self.total - self.errors
    }

    pub fn category(&self, category: RiskCategory) -> CategoryTally {
        self.per_category.get(&category).copied().unwrap_or_default()
    }

    pub fn average_latency_ms(&self) -> Option<f64> {
        let succeeded = self.categorized();
        if succeeded == 0 {
            return None;
        }
        Some(self.success_latency_ms as f64 / f64::from(succeeded))
    }

    pub fn asymmetric_errors(&self) -> u32 {
        self.safe_classified_as_unsafe + self.unsafe_classified_as_safe
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AddressRecord, ScoreRecord};

    fn classified(expected: RiskCategory, got: RiskCategory) -> EvaluationResult {
        let entry = AddressRecord::new("0xabc", expected, "test");
        EvaluationResult::classified(&entry, ScoreRecord::default(), got, expected == got, 10)
    }

    fn failed(expected: RiskCategory) -> EvaluationResult {
        let entry = AddressRecord::new("0xabc", expected, "test");
        EvaluationResult::failed(&entry, "connection refused", 5)
    }

    #[test]
    fn test_percentage_zero_whole() {
        assert_eq!(percentage(0, 0), 0.0);
        assert_eq!(percentage(3, 4), 75.0);
    }

    #[test]
    fn test_empty_metrics() {
        let metrics = Metrics::default();
        assert_eq!(metrics.total, 0);
        assert_eq!(metrics.accuracy(), 0.0);
        assert_eq!(metrics.average_latency_ms(), None);
    }

    #[test]
    fn test_safe_flagged_as_bad_counts_once() {
        let mut metrics = Metrics::default();
        metrics.record(&classified(RiskCategory::Established, RiskCategory::Bad));

        assert_eq!(metrics.safe_classified_as_unsafe, 1);
        assert_eq!(metrics.unsafe_classified_as_safe, 0);
        assert_eq!(metrics.category(RiskCategory::Established), CategoryTally { total: 1, correct: 0 });
    }

    #[test]
    fn test_missed_bad_counts_including_edge_case() {
        let mut metrics = Metrics::default();
        metrics.record(&classified(RiskCategory::Bad, RiskCategory::EdgeCase));
        metrics.record(&classified(RiskCategory::Bad, RiskCategory::DeFi));
        metrics.record(&classified(RiskCategory::Bad, RiskCategory::Bad));

        assert_eq!(metrics.unsafe_classified_as_safe, 2);
        assert_eq!(metrics.safe_classified_as_unsafe, 0);
        assert_eq!(metrics.category(RiskCategory::Bad), CategoryTally { total: 3, correct: 1 });
    }

    #[test]
    fn test_failure_counts_as_error_not_asymmetric() {
        let mut metrics = Metrics::default();
        metrics.record(&failed(RiskCategory::Bad));

        assert_eq!(metrics.total, 1);
        assert_eq!(metrics.errors, 1);
        assert_eq!(metrics.categorized(), 0);
        assert_eq!(metrics.asymmetric_errors(), 0);
        assert_eq!(metrics.category(RiskCategory::Bad).total, 1);
    }

    #[test]
    fn test_average_latency_ignores_failures() {
        let mut metrics = Metrics::default();
        metrics.record(&classified(RiskCategory::New, RiskCategory::New));
        metrics.record(&classified(RiskCategory::New, RiskCategory::New));
        metrics.record(&failed(RiskCategory::New));

        assert_eq!(metrics.average_latency_ms(), Some(10.0));
    }
}
