use sea_orm::DbErr;

pub type Result<T> = std::result::Result<T, PriceError>;

#[derive(thiserror::Error, Debug)]
pub enum PriceError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("malformed prices for row {row_key}: {reason}")]
    Format { row_key: String, reason: String },
    #[error("table store error: {0}")]
    Store(#[from] DbErr),
    #[error("request cancelled")]
    Cancelled,
}

impl PriceError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        PriceError::InvalidArgument(message.into())
    }

    pub fn format(row_key: impl Into<String>, reason: impl Into<String>) -> Self {
        PriceError::Format {
            row_key: row_key.into(),
            reason: reason.into(),
        }
    }
}
