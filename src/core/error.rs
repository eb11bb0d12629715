//! Error types for the conversion pipeline.

use crate::core::currency::CurrencyCode;

/// Why a remote rate lookup could not complete.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Connect(String),

    #[error("HTTP error! status: {0}")]
    Status(u16),

    #[error("Invalid response format: {0}")]
    Malformed(String),
}

/// Errors surfaced to the user for a single conversion attempt.
///
/// None of these are retried; the user resubmits.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConvertError {
    #[error("Please fill in all fields")]
    MissingField,

    #[error("Amount must be greater than 0")]
    InvalidAmount,

    #[error("Network error. Please check your internet connection ({0})")]
    Network(#[from] FetchError),

    #[error("Exchange rate not available for {0}")]
    RateUnavailable(CurrencyCode),
}
