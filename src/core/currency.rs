//! Currency codes and the supported currency list

use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Currencies offered for selection, with their display names.
pub const SUPPORTED_CURRENCIES: &[(&str, &str)] = &[
    ("USD", "US Dollar"),
    ("EUR", "Euro"),
    ("GBP", "British Pound"),
    ("JPY", "Japanese Yen"),
    ("AUD", "Australian Dollar"),
    ("CAD", "Canadian Dollar"),
    ("CHF", "Swiss Franc"),
    ("CNY", "Chinese Yuan"),
    ("INR", "Indian Rupee"),
    ("KRW", "South Korean Won"),
    ("BRL", "Brazilian Real"),
    ("RUB", "Russian Ruble"),
    ("MXN", "Mexican Peso"),
    ("SGD", "Singapore Dollar"),
    ("NZD", "New Zealand Dollar"),
    ("ZAR", "South African Rand"),
    ("HKD", "Hong Kong Dollar"),
    ("SEK", "Swedish Krona"),
    ("NOK", "Norwegian Krone"),
    ("TRY", "Turkish Lira"),
];

/// An uppercase currency identifier such as `USD`.
///
/// Any non-empty code is accepted so that lookups can reach currencies the
/// remote API knows about but the selection list does not.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Normalizes user input. Returns `None` for blank input.
    pub fn parse(input: &str) -> Option<Self> {
        let code = input.trim();
        if code.is_empty() {
            return None;
        }
        Some(CurrencyCode(code.to_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for three ASCII uppercase letters, the shape of an ISO-4217 code.
    pub fn is_well_formed(&self) -> bool {
        self.0.len() == 3 && self.0.bytes().all(|b| b.is_ascii_uppercase())
    }

    pub fn is_supported(&self) -> bool {
        SUPPORTED_CURRENCIES
            .iter()
            .any(|(code, _)| *code == self.0)
    }

    pub fn display_name(&self) -> Option<&'static str> {
        SUPPORTED_CURRENCIES
            .iter()
            .find(|(code, _)| *code == self.0)
            .map(|(_, name)| *name)
    }
}

impl Display for CurrencyCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
