use thiserror::Error;

pub type Result<T, E = LotteryError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum LotteryError {
    /// Malformed input data, e.g. an entry with an empty number.
    #[error("validation failed: {reason}")]
    Validation { reason: String },

    /// A caller handed in a value outside the accepted range.
    #[error("out of range: {reason}")]
    Range { reason: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
}

impl LotteryError {
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation {
            reason: reason.into(),
        }
    }

    pub fn range(reason: impl Into<String>) -> Self {
        Self::Range {
            reason: reason.into(),
        }
    }
}
