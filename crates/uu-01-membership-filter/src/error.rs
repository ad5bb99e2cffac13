//! Error types for the membership filter

use thiserror::Error;

/// Errors raised while constructing or configuring a filter.
///
/// Once a filter exists, `insert` and `might_contain` are total and never fail.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FilterError {
    #[error("Invalid filter parameters: {0}")]
    InvalidParameters(String),

    #[error("Invalid false positive rate: {fpr} (must be strictly between 0 and 1)")]
    InvalidFpr { fpr: f64 },

    #[error("Filter size exceeds maximum: {size} > {max}")]
    FilterTooLarge { size: usize, max: usize },
}

impl FilterError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        FilterError::InvalidParameters(message.into())
    }
}
