use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::ProviderError;
use crate::models::{RiskLevel, ScoreRecord, UNKNOWN_STATUS};

// ---------------------------------------------------------------------------
// Score (GET /score/{address})
// ---------------------------------------------------------------------------

/// Raw score document as returned by the provider. Every field is optional;
/// explicit `null`s are treated the same as missing keys.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiScore {
    #[serde(default)]
    pub address: Option<String>,
    /// Usually an integer, occasionally a float or a numeric string.
    #[serde(default)]
    pub score: Option<serde_json::Value>,
    #[serde(default)]
    pub status: Option<String>,
    /// Older deployments only send `tier`, which carries the same value.
    #[serde(default)]
    pub tier: Option<String>,
    /// Either plain strings or `{type, category, message, severity}` objects.
    #[serde(default)]
    pub risk_flags: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    pub risk_level: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl ApiScore {
    /// Decode a response body. Only a JSON object is a score document; an
    /// array or scalar would otherwise decode to an all-default record.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ProviderError> {
        if !value.is_object() {
            return Err(ProviderError::Unexpected(format!(
                "score document is not a JSON object: {}",
                json_kind(&value)
            )));
        }
        serde_json::from_value(value).map_err(|e| ProviderError::Unexpected(e.to_string()))
    }

    /// Normalize into a `ScoreRecord`, substituting defaults for anything
    /// missing or unparseable.
    pub fn into_record(self) -> ScoreRecord {
        let score = self.score.as_ref().and_then(parse_score).unwrap_or(0);

        let status = self
            .status
            .or(self.tier)
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_STATUS.into());

        let risk_flags: BTreeSet<String> = self
            .risk_flags
            .unwrap_or_default()
            .iter()
            .filter_map(flag_token)
            .collect();

        let risk_level = self
            .risk_level
            .as_deref()
            .map(RiskLevel::from_api_str)
            .unwrap_or_default();

        ScoreRecord {
            score,
            status,
            risk_flags,
            risk_level,
        }
    }
}

fn parse_score(value: &serde_json::Value) -> Option<i64> {
    match value {
        serde_json::Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        serde_json::Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f.trunc() as i64))
        }
        _ => None,
    }
}

/// Flatten one flag entry into a matchable token. Structured flags become
/// their compact JSON text so substring checks see every field.
fn flag_token(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) if s.trim().is_empty() => None,
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

// ---------------------------------------------------------------------------
// Health (GET /health)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiHealth {
    pub status: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> ScoreRecord {
        ApiScore::from_value(value)
            .expect("payload should deserialize")
            .into_record()
    }

    #[test]
    fn test_non_object_document_rejected() {
        for value in [json!([]), json!([{"score": 90}]), json!(null), json!("Trusted"), json!(85)] {
            let err = ApiScore::from_value(value.clone()).unwrap_err();
            assert!(
                matches!(err, ProviderError::Unexpected(ref msg) if msg.contains("not a JSON object")),
                "{value} should be rejected, got {err:?}"
            );
        }
    }

    #[test]
    fn test_mistyped_field_is_unexpected() {
        let err = ApiScore::from_value(json!({"status": 7})).unwrap_err();
        assert!(matches!(err, ProviderError::Unexpected(_)));
    }

    #[test]
    fn test_full_payload() {
        let record = parse(json!({
            "score": 85,
            "status": "Trusted",
            "riskFlags": ["LARGE_TRANSFERS"],
            "riskLevel": "LOW",
            "updatedAt": "2025-10-05T02:00:00.000Z"
        }));

        assert_eq!(record.score, 85);
        assert_eq!(record.status, "Trusted");
        assert!(record.risk_flags.contains("LARGE_TRANSFERS"));
        assert_eq!(record.risk_level, RiskLevel::Low);
    }

    #[test]
    fn test_empty_payload_uses_defaults() {
        assert_eq!(parse(json!({})), ScoreRecord::default());
    }

    #[test]
    fn test_explicit_nulls_use_defaults() {
        let record = parse(json!({
            "score": null,
            "status": null,
            "riskFlags": null,
            "riskLevel": null
        }));
        assert_eq!(record, ScoreRecord::default());
    }

    #[test]
    fn test_structured_flags_keep_category_text() {
        let record = parse(json!({
            "score": 12,
            "status": "New/Unproven",
            "riskFlags": [{
                "type": "HIGH",
                "category": "PRIVACY_MIXER",
                "message": "Interaction with Tornado Cash",
                "severity": "CRITICAL"
            }],
            "riskLevel": "MEDIUM"
        }));

        assert_eq!(record.risk_flags.len(), 1);
        assert!(record.has_flag_containing("PRIVACY_MIXER"));
    }

    #[test]
    fn test_tier_fallback_and_float_score() {
        let record = parse(json!({ "score": 64.9, "tier": "Stable" }));
        assert_eq!(record.score, 64);
        assert_eq!(record.status, "Stable");
    }

    #[test]
    fn test_string_score_and_unknown_level() {
        let record = parse(json!({ "score": "42", "riskLevel": "SEVERE" }));
        assert_eq!(record.score, 42);
        assert_eq!(record.risk_level, RiskLevel::Unknown);
    }

    #[test]
    fn test_blank_and_null_flags_dropped() {
        let record = parse(json!({ "riskFlags": ["", null, "OFAC_MATCH"] }));
        assert_eq!(record.risk_flags.len(), 1);
        assert!(record.has_flag_containing("OFAC"));
    }
}
