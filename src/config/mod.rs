use std::env;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use crate::errors::AppError;
use crate::intelligence::ClassifierRules;
use crate::provider::score_client::DEFAULT_SCORE_API;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub score_api_url: String,

    // Provider calls
    pub timeout_secs: u64,
    pub request_delay_ms: u64,
    pub concurrency: usize,

    // Reporting
    /// Safe-classified-as-unsafe count still considered acceptable.
    pub status_tolerance: u32,

    // Datasets
    pub unlabeled_limit: usize,

    pub classifier: ClassifierRules,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            score_api_url: DEFAULT_SCORE_API.into(),
            timeout_secs: 30,
            request_delay_ms: 0,
            concurrency: 1,
            status_tolerance: 2,
            unlabeled_limit: 50,
            classifier: ClassifierRules::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Unset keys keep their defaults;
    /// set-but-unparseable keys are an error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let default_rules = defaults.classifier.clone();

        let concurrency: usize = parse_or(&lookup, "EVAL_CONCURRENCY", defaults.concurrency)?;
        if concurrency == 0 {
            return Err(AppError::config("EVAL_CONCURRENCY", "0", "must be at least 1"));
        }

        let timeout_secs: u64 = parse_or(&lookup, "SCORE_TIMEOUT_SECS", defaults.timeout_secs)?;
        if timeout_secs == 0 {
            return Err(AppError::config("SCORE_TIMEOUT_SECS", "0", "must be at least 1"));
        }

        Ok(Self {
            score_api_url: lookup("SCORE_API_URL")
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or(defaults.score_api_url),
            timeout_secs,
            request_delay_ms: parse_or(&lookup, "REQUEST_DELAY_MS", defaults.request_delay_ms)?,
            concurrency,
            status_tolerance: parse_or(&lookup, "STATUS_TOLERANCE", defaults.status_tolerance)?,
            unlabeled_limit: parse_or(&lookup, "UNLABELED_LIMIT", defaults.unlabeled_limit)?,
            classifier: ClassifierRules {
                established_min_score: parse_or(
                    &lookup,
                    "CLASSIFIER_ESTABLISHED_MIN",
                    default_rules.established_min_score,
                )?,
                defi_min_score: parse_or(&lookup, "CLASSIFIER_DEFI_MIN", default_rules.defi_min_score)?,
                new_max_score: parse_or(&lookup, "CLASSIFIER_NEW_MAX", default_rules.new_max_score)?,
                ..default_rules
            },
        })
    }

    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| AppError::config(key, &raw, e)),
        _ => Ok(default),
    }
}
