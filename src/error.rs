use crate::data::store::ResultBucket;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AppError {
    /// A metric definition that would corrupt normalization. Fatal at load time.
    #[error("Invalid metric definition: {0}")]
    Configuration(String),

    #[error("Unknown metric: {0}")]
    UnknownMetric(String),

    #[error("Duplicate value for team {team_id}, metric {metric_id}, bucket {bucket}")]
    DuplicateValue {
        team_id: String,
        metric_id: String,
        bucket: ResultBucket,
    },

    #[error("Invalid result bucket: {0} (expected all, win, draw or loss)")]
    InvalidBucket(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("JSON parsing error: {0}")]
    Json(String),
}

impl AppError {
    pub fn is_unknown_metric(&self) -> bool {
        matches!(self, AppError::UnknownMetric(_))
    }
}
