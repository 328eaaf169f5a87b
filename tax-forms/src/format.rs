//! Display formatting for field values.
//!
//! Each document picks one [`CurrencyStyle`] and uses it for every amount it
//! prints, so a document never mixes cents and whole dollars.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tax_core::calculations::common::{floor_dollars, round_half_up};
use tax_core::validation::normalize_tin;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CurrencyStyle {
    /// `1471.38`
    Cents,
    /// `1471`
    WholeDollars,
}

impl CurrencyStyle {
    pub fn format(
        &self,
        value: Decimal,
    ) -> String {
        match self {
            Self::Cents => format!("{:.2}", round_half_up(value)),
            Self::WholeDollars => floor_dollars(value).to_string(),
        }
    }
}

/// `MM/DD/YYYY`.
pub fn date(value: NaiveDate) -> String {
    value.format("%m/%d/%Y").to_string()
}

/// `MM/DD/YY`, used only where a form prints a two-digit year.
pub fn date_short(value: NaiveDate) -> String {
    value.format("%m/%d/%y").to_string()
}

pub fn optional_date(value: Option<NaiveDate>) -> String {
    value.map(date).unwrap_or_default()
}

/// `XXX-XX-XXXX` for a full SSN or ITIN, otherwise the digits as entered.
pub fn ssn(raw: &str) -> String {
    let digits = normalize_tin(raw);
    if digits.len() == 9 {
        format!("{}-{}-{}", &digits[..3], &digits[3..5], &digits[5..])
    } else {
        digits
    }
}

/// `XX-XXXXXXX` for a full EIN, otherwise the digits as entered.
pub fn ein(raw: &str) -> String {
    let digits = normalize_tin(raw);
    if digits.len() == 9 {
        format!("{}-{}", &digits[..2], &digits[2..])
    } else {
        digits
    }
}
