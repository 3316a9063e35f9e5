use thiserror::Error;

#[derive(Debug, Error)]
pub enum TunerError {
    #[error("Oracle invocation failed: {0}")]
    Oracle(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, TunerError>;
