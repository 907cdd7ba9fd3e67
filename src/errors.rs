use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid configuration: {key}={value} ({reason})")]
    Config {
        key: String,
        value: String,
        reason: String,
    },

    #[error("Failed to read dataset {path}: {source}")]
    Dataset {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Metrics recorder unavailable: {0}")]
    Metrics(String),
}

impl AppError {
    pub fn config(key: &str, value: &str, reason: impl ToString) -> Self {
        AppError::Config {
            key: key.into(),
            value: value.into(),
            reason: reason.to_string(),
        }
    }
}
