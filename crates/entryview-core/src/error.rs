use thiserror::Error;

/// Core error types for EntryView operations
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid search date: {0}")]
    InvalidDate(String),

    #[error("Invalid date bound: {0}")]
    InvalidBound(String),
}

impl CoreError {
    /// Create a new InvalidDate error
    pub fn invalid_date(date: impl Into<String>) -> Self {
        Self::InvalidDate(date.into())
    }

    /// Create a new InvalidBound error
    pub fn invalid_bound(bound: impl Into<String>) -> Self {
        Self::InvalidBound(bound.into())
    }
}

/// Convenience result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
