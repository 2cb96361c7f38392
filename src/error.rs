use thiserror::Error;

pub type Result<T> = std::result::Result<T, BleachError>;

#[derive(Debug, Error)]
pub enum BleachError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // Bad value for a BALLOTBLEACH_* setting
    #[error("invalid configuration for {key}: {message}")]
    Config { key: String, message: String },

    // Row numbers are 1-based and count the header row when present
    #[error("row {row}: {message}")]
    Ingest { row: usize, message: String },
}

impl BleachError {
    pub fn config(key: &str, message: impl Into<String>) -> Self {
        BleachError::Config {
            key: key.to_string(),
            message: message.into(),
        }
    }
}
