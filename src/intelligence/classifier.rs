use serde::{Deserialize, Serialize};

use crate::models::{RiskCategory, RiskLevel, ScoreRecord};

/// Thresholds, status spellings and flag markers used by the classifier.
///
/// `Default` reproduces the production rule table. Overrides exist so the
/// harness can follow the provider if its vocabulary or scale shifts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierRules {
    /// Any flag containing one of these substrings is a hard `Bad`.
    pub blocking_flag_markers: Vec<String>,
    /// Minimum score for `Established`.
    pub established_min_score: i64,
    pub established_status: String,
    /// Minimum score for `DeFi`.
    pub defi_min_score: i64,
    pub defi_statuses: Vec<String>,
    /// Exclusive upper bound on score for `New`.
    pub new_max_score: i64,
    pub new_status: String,
}

impl Default for ClassifierRules {
    fn default() -> Self {
        Self {
            blocking_flag_markers: vec!["PRIVACY_MIXER".into(), "OFAC".into()],
            established_min_score: 80,
            established_status: "Trusted".into(),
            defi_min_score: 60,
            defi_statuses: vec!["Trusted".into(), "Stable".into()],
            new_max_score: 30,
            new_status: "New/Unproven".into(),
        }
    }
}

impl ClassifierRules {
    /// Classify a score record. First matching rule wins:
    ///
    /// 1. **Bad**: a blocking flag marker is present, or risk level is HIGH.
    ///    This gate overrides every score-based rule.
    /// 2. **Established**: score >= 80 and status `Trusted`.
    /// 3. **DeFi**: score >= 60 and status `Trusted` or `Stable`.
    /// 4. **New**: score < 30 and status `New/Unproven`.
    /// 5. **EdgeCase**: everything else.
    ///
    /// Never returns `RiskCategory::Error`.
    pub fn classify(&self, record: &ScoreRecord) -> RiskCategory {
        if self.is_blocked(record) {
            return RiskCategory::Bad;
        }

        if record.score >= self.established_min_score
            && record.status == self.established_status
        {
            return RiskCategory::Established;
        }

        if record.score >= self.defi_min_score
            && self.defi_statuses.iter().any(|s| *s == record.status)
        {
            return RiskCategory::DeFi;
        }

        if record.score < self.new_max_score && record.status == self.new_status {
            return RiskCategory::New;
        }

        RiskCategory::EdgeCase
    }

    fn is_blocked(&self, record: &ScoreRecord) -> bool {
        record.risk_level == RiskLevel::High
            || self
                .blocking_flag_markers
                .iter()
                .any(|marker| record.has_flag_containing(marker))
    }
}

/// Classify with the default rule table.
pub fn classify(record: &ScoreRecord) -> RiskCategory {
    ClassifierRules::default().classify(record)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
