//! Jurisdictions the rule engine knows how to compute.
//!
//! Both enums are closed. Anything outside them is rejected with
//! [`TaxRuleError::NotSupported`] when the input is parsed, so a rule for the
//! wrong country or state can never be picked by a fallback branch.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::IncomeState;

/// Errors raised while selecting or running a tax rule.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaxRuleError {
    /// No rule exists for the requested country or state.
    #[error("{kind} '{key}' is not supported")]
    NotSupported { kind: &'static str, key: String },

    /// The rule set has no constants for this tax year.
    #[error("tax year {0} is not supported")]
    UnsupportedTaxYear(i32),

    /// The bracket table has a gap covering this taxable income.
    #[error("no tax bracket found for taxable income {0}")]
    NoMatchingBracket(Decimal),
}

/// Country of citizenship with a federal treaty rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Country {
    India,
}

impl Country {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::India => "India",
        }
    }

    /// Treaty article whose student benefit the federal rule applies.
    pub fn treaty_article(&self) -> &'static str {
        match self {
            Self::India => "21(2)",
        }
    }
}

impl fmt::Display for Country {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Country {
    type Err = TaxRuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "india" | "in" | "ind" => Ok(Self::India),
            _ => Err(TaxRuleError::NotSupported {
                kind: "country",
                key: s.trim().to_string(),
            }),
        }
    }
}

/// State with an income tax rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UsState {
    Illinois,
}

impl UsState {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Illinois => "IL",
        }
    }

    /// The state rule to run for a filer's income state, if any.
    pub fn for_income_state(state: IncomeState) -> Option<Self> {
        match state {
            IncomeState::Illinois => Some(Self::Illinois),
            IncomeState::Other | IncomeState::Unset => None,
        }
    }
}

impl fmt::Display for UsState {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for UsState {
    type Err = TaxRuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "il" | "illinois" => Ok(Self::Illinois),
            _ => Err(TaxRuleError::NotSupported {
                kind: "state",
                key: s.trim().to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn country_parses_name_and_codes() {
        for input in ["India", "india", " IN ", "IND"] {
            assert_eq!(input.parse::<Country>(), Ok(Country::India), "{input}");
        }
    }

    #[test]
    fn unknown_country_is_not_supported() {
        let err = "China".parse::<Country>().unwrap_err();

        assert_eq!(
            err,
            TaxRuleError::NotSupported {
                kind: "country",
                key: "China".to_string(),
            }
        );
        assert_eq!(err.to_string(), "country 'China' is not supported");
    }

    #[test]
    fn state_parses_code_and_name() {
        assert_eq!("IL".parse::<UsState>(), Ok(UsState::Illinois));
        assert_eq!("illinois".parse::<UsState>(), Ok(UsState::Illinois));
        assert!(matches!(
            "CA".parse::<UsState>(),
            Err(TaxRuleError::NotSupported { kind: "state", .. })
        ));
    }

    #[test]
    fn only_illinois_income_selects_a_state_rule() {
        assert_eq!(
            UsState::for_income_state(IncomeState::Illinois),
            Some(UsState::Illinois)
        );
        assert_eq!(UsState::for_income_state(IncomeState::Other), None);
        assert_eq!(UsState::for_income_state(IncomeState::Unset), None);
    }
}
