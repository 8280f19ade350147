use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid date in field \"{field}\": {value:?}")]
    InvalidDate { field: String, value: String },

    #[error("Invalid manuscript identifier: empty or missing")]
    InvalidIdentifier,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TrackerError {
    /// Record-level error kind, used to look up the failure policy.
    pub fn kind(&self) -> Option<RecordErrorKind> {
        match self {
            TrackerError::MissingField(_) => Some(RecordErrorKind::MissingField),
            TrackerError::InvalidDate { .. } => Some(RecordErrorKind::InvalidDate),
            TrackerError::InvalidIdentifier => Some(RecordErrorKind::InvalidIdentifier),
            _ => None,
        }
    }
}

/// The errors a single record can fail with, independent of their payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordErrorKind {
    MissingField,
    InvalidDate,
    InvalidIdentifier,
}

pub type Result<T> = std::result::Result<T, TrackerError>;
