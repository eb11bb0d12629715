//! Validates conversion requests and turns rates into displayable results.

use crate::core::clock::Clock;
use crate::core::currency::CurrencyCode;
use crate::core::error::ConvertError;
use crate::core::format::{format_currency, format_rate};
use crate::core::provider::RateProvider;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, instrument};

/// A request that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    pub amount: f64,
    pub from: CurrencyCode,
    pub to: CurrencyCode,
}

impl ConversionRequest {
    /// Checks presence first, then the amount. The first failure wins.
    pub fn validate(amount: Option<f64>, from: &str, to: &str) -> Result<Self, ConvertError> {
        let (Some(amount), Some(from), Some(to)) =
            (amount, CurrencyCode::parse(from), CurrencyCode::parse(to))
        else {
            return Err(ConvertError::MissingField);
        };

        if !amount.is_finite() || amount <= 0.0 {
            return Err(ConvertError::InvalidAmount);
        }

        Ok(Self { amount, from, to })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionResult {
    pub from: CurrencyCode,
    pub to: CurrencyCode,
    pub amount: f64,
    pub converted_amount: f64,
    pub rate: f64,
    pub display_text: String,
    pub rate_text: String,
}

/// Reads an amount typed by the user.
///
/// Blank input is absent. Anything else that is not a number comes back as
/// NaN so that validation reports it as an invalid amount.
pub fn parse_amount(input: &str) -> Option<f64> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    Some(input.parse::<f64>().unwrap_or(f64::NAN))
}

pub struct ConversionEngine {
    provider: Arc<RateProvider>,
    clock: Arc<dyn Clock>,
}

impl ConversionEngine {
    pub fn new(provider: Arc<RateProvider>, clock: Arc<dyn Clock>) -> Self {
        Self { provider, clock }
    }

    pub fn provider(&self) -> &Arc<RateProvider> {
        &self.provider
    }

    pub async fn convert(
        &self,
        amount: Option<f64>,
        from: &str,
        to: &str,
    ) -> Result<ConversionResult, ConvertError> {
        self.convert_at(amount, from, to, self.clock.now()).await
    }

    #[instrument(name = "Convert", skip(self, now))]
    pub async fn convert_at(
        &self,
        amount: Option<f64>,
        from: &str,
        to: &str,
        now: DateTime<Utc>,
    ) -> Result<ConversionResult, ConvertError> {
        let request = ConversionRequest::validate(amount, from, to)?;
        let rate = self
            .provider
            .get_rate(&request.from, &request.to, now)
            .await?;

        let converted_amount = request.amount * rate;
        debug!(rate, converted_amount, "Conversion computed");

        Ok(ConversionResult {
            display_text: format_currency(converted_amount, &request.to),
            rate_text: format_rate(&request.from, &request.to, rate),
            from: request.from,
            to: request.to,
            amount: request.amount,
            converted_amount,
            rate,
        })
    }
}
