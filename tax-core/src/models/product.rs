use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A deliverable bundle a filer can buy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Product {
    Federal,
    State,
    FicaRefund,
    #[serde(rename = "8843-only")]
    Form8843Only,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown product '{0}'; expected one of federal, state, fica-refund, 8843-only")]
pub struct UnknownProduct(pub String);

impl Product {
    pub fn all() -> &'static [Product] {
        &[
            Product::Federal,
            Product::State,
            Product::FicaRefund,
            Product::Form8843Only,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Federal => "federal",
            Self::State => "state",
            Self::FicaRefund => "fica-refund",
            Self::Form8843Only => "8843-only",
        }
    }

    /// Products that settle a balance with a tax authority. These are refused
    /// when the filer owes net tax.
    pub fn is_payable(&self) -> bool {
        matches!(self, Self::Federal | Self::State)
    }
}

impl fmt::Display for Product {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Product {
    type Err = UnknownProduct;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "federal" => Ok(Self::Federal),
            "state" => Ok(Self::State),
            "fica" | "fica-refund" => Ok(Self::FicaRefund),
            "8843" | "8843-only" => Ok(Self::Form8843Only),
            _ => Err(UnknownProduct(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse_accepts_short_names() {
        assert_eq!("FICA".parse::<Product>(), Ok(Product::FicaRefund));
        assert_eq!("8843".parse::<Product>(), Ok(Product::Form8843Only));
        assert_eq!(" federal ".parse::<Product>(), Ok(Product::Federal));
    }

    #[test]
    fn parse_rejects_unknown() {
        assert_eq!(
            "bundle".parse::<Product>(),
            Err(UnknownProduct("bundle".to_string()))
        );
    }

    #[test]
    fn only_federal_and_state_are_payable() {
        let payable: Vec<_> = Product::all().iter().filter(|p| p.is_payable()).collect();

        assert_eq!(payable, vec![&Product::Federal, &Product::State]);
    }
}
