//! Display formatting for converted amounts and rates.

use crate::core::currency::CurrencyCode;
use num_format::{Locale, ToFormattedString};

const MIN_FRACTION_DIGITS: usize = 2;
const MAX_FRACTION_DIGITS: usize = 4;

fn symbol(currency: &CurrencyCode) -> Option<&'static str> {
    let symbol = match currency.as_str() {
        "USD" => "$",
        "EUR" => "€",
        "GBP" => "£",
        "JPY" => "¥",
        "AUD" => "A$",
        "CAD" => "CA$",
        "CNY" => "CN¥",
        "INR" => "₹",
        "KRW" => "₩",
        "BRL" => "R$",
        "MXN" => "MX$",
        "NZD" => "NZ$",
        "HKD" => "HK$",
        "TWD" => "NT$",
        "ILS" => "₪",
        "VND" => "₫",
        "PHP" => "₱",
        _ => return None,
    };
    Some(symbol)
}

/// Formats `amount` as money in `currency` the way an en-US locale would:
/// grouped thousands and between two and four fraction digits.
///
/// Currencies without a well known symbol are prefixed with their code. A
/// code that is not a well-formed ISO code falls back to `"<CODE> 12.34"`.
pub fn format_currency(amount: f64, currency: &CurrencyCode) -> String {
    if !currency.is_well_formed() || !amount.is_finite() {
        return format_plain(amount, currency);
    }

    let fixed = format!("{:.*}", MAX_FRACTION_DIGITS, amount.abs());
    let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let fraction = format!(
        "{:0<width$}",
        fraction.trim_end_matches('0'),
        width = MIN_FRACTION_DIGITS
    );
    let Ok(whole) = whole.parse::<u128>() else {
        return format_plain(amount, currency);
    };

    let is_zero = whole == 0 && fraction.bytes().all(|b| b == b'0');
    let sign = if amount < 0.0 && !is_zero { "-" } else { "" };
    let number = format!("{}.{}", whole.to_formatted_string(&Locale::en), fraction);

    match symbol(currency) {
        Some(symbol) => format!("{sign}{symbol}{number}"),
        None => format!("{sign}{currency}\u{a0}{number}"),
    }
}

/// Fallback when the currency cannot be formatted as money.
pub fn format_plain(amount: f64, currency: &CurrencyCode) -> String {
    format!("{currency} {amount:.2}")
}

/// The human readable rate line, e.g. `1 USD = 0.8500 EUR`.
pub fn format_rate(from: &CurrencyCode, to: &CurrencyCode, rate: f64) -> String {
    format!("1 {from} = {rate:.4} {to}")
}
