use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// RiskCategory
// ---------------------------------------------------------------------------

/// Human-meaningful risk bucket for a wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskCategory {
    /// Long-lived, high-score wallet with a trusted status.
    Established,
    /// Healthy wallet with a stable or trusted status.
    DeFi,
    /// Fresh wallet with little history.
    New,
    /// Sanctioned, mixer-linked or otherwise high-risk wallet.
    Bad,
    /// Matches none of the shapes above.
    #[serde(rename = "Edge Case")]
    EdgeCase,
    /// The provider could not be reached. Never produced by the classifier.
    Error,
}

impl RiskCategory {
    /// Categories in report order.
    pub const ALL: [RiskCategory; 6] = [
        RiskCategory::Established,
        RiskCategory::DeFi,
        RiskCategory::New,
        RiskCategory::Bad,
        RiskCategory::EdgeCase,
        RiskCategory::Error,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskCategory::Established => "Established",
            RiskCategory::DeFi => "DeFi",
            RiskCategory::New => "New",
            RiskCategory::Bad => "Bad",
            RiskCategory::EdgeCase => "Edge Case",
            RiskCategory::Error => "Error",
        }
    }

    pub fn is_bad(&self) -> bool {
        matches!(self, RiskCategory::Bad)
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "established" => Ok(RiskCategory::Established),
            "defi" => Ok(RiskCategory::DeFi),
            "new" => Ok(RiskCategory::New),
            "bad" => Ok(RiskCategory::Bad),
            "edgecase" => Ok(RiskCategory::EdgeCase),
            "error" => Ok(RiskCategory::Error),
            _ => Err(format!("unknown risk category: {s}")),
        }
    }
}

// ---------------------------------------------------------------------------
// AddressRecord: one dataset entry
// ---------------------------------------------------------------------------

/// A wallet address to evaluate together with the label we expect the
/// classifier to produce for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressRecord {
    pub address: String,
    /// Display label, e.g. "Binance Cold Wallet" or "CSV 3".
    pub name: Option<String>,
    pub expected_category: RiskCategory,
    /// Where the entry came from (file name, `reference`, ...). Advisory only.
    pub source: String,
}

impl AddressRecord {
    pub fn new(
        address: impl Into<String>,
        expected_category: RiskCategory,
        source: impl Into<String>,
    ) -> Self {
        Self {
            address: address.into(),
            name: None,
            expected_category,
            source: source.into(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Entries without an address are never sent to the provider.
    pub fn is_well_formed(&self) -> bool {
        !self.address.trim().is_empty()
    }

    /// Name if present, otherwise the address itself.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse_variants() {
        assert_eq!("Established".parse(), Ok(RiskCategory::Established));
        assert_eq!("defi".parse(), Ok(RiskCategory::DeFi));
        assert_eq!("Edge Case".parse(), Ok(RiskCategory::EdgeCase));
        assert_eq!("edge_case".parse(), Ok(RiskCategory::EdgeCase));
        assert_eq!("EdgeCase".parse(), Ok(RiskCategory::EdgeCase));
        assert!("trusted".parse::<RiskCategory>().is_err());
    }

    #[test]
    fn test_category_display_round_trips() {
        for category in RiskCategory::ALL {
            assert_eq!(category.to_string().parse(), Ok(category));
        }
    }

    #[test]
    fn test_blank_address_is_malformed() {
        assert!(!AddressRecord::new("   ", RiskCategory::New, "test").is_well_formed());
        assert!(AddressRecord::new("0xabc", RiskCategory::New, "test").is_well_formed());
    }

    #[test]
    fn test_label_falls_back_to_address() {
        let record = AddressRecord::new("0xabc", RiskCategory::New, "test");
        assert_eq!(record.label(), "0xabc");
        assert_eq!(record.with_name("CSV 1").label(), "CSV 1");
    }
}
