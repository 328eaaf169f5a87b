//! Combined federal and state position, and the refusal to prepare payable
//! returns for filers who owe overall.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::models::TaxResult;

/// A business-rule refusal. Not a failure of the software: the filing is
/// correct, it is just not one this service prepares.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilingRefusal {
    #[error(
        "you owe ${shortfall} more in tax than you are due back across your federal and Illinois \
         returns; these returns cannot be prepared here, please file with a paid preparer or \
         directly with the IRS and the Illinois Department of Revenue"
    )]
    NetUnderpayment { shortfall: Decimal },
}

/// Refund minus balance due, per return and combined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetPosition {
    pub federal: Decimal,
    pub state: Decimal,
    pub net: Decimal,
}

impl NetPosition {
    pub fn from_result(result: &TaxResult) -> Self {
        let federal = result.federal.settlement.net();
        let state = result.state.settlement.net();
        Self {
            federal,
            state,
            net: federal + state,
        }
    }

    pub fn is_underpayment(&self) -> bool {
        self.net < Decimal::ZERO
    }
}

/// Checks that the combined position allows preparing the federal and state
/// returns. Both results must already be computed.
///
/// # Errors
/// * [`FilingRefusal::NetUnderpayment`] when the filer owes more than they get
///   back across both returns.
pub fn ensure_payable_allowed(result: &TaxResult) -> Result<NetPosition, FilingRefusal> {
    let position = NetPosition::from_result(result);
    if position.is_underpayment() {
        info!(
            federal = %position.federal,
            state = %position.state,
            net = %position.net,
            "refusing payable returns for net underpayment"
        );
        return Err(FilingRefusal::NetUnderpayment {
            shortfall: -position.net,
        });
    }
    Ok(position)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::{FederalTaxResult, Settlement, StateTaxResult};

    fn result(
        federal: Settlement,
        state: Settlement,
    ) -> TaxResult {
        TaxResult {
            federal: FederalTaxResult {
                settlement: federal,
                ..Default::default()
            },
            state: StateTaxResult {
                settlement: state,
                ..Default::default()
            },
        }
    }

    #[test]
    fn federal_refund_smaller_than_state_balance_is_refused() {
        let result = result(
            Settlement::new(dec!(800), dec!(1000)),
            Settlement::new(dec!(1500), dec!(1000)),
        );

        let refusal = ensure_payable_allowed(&result).unwrap_err();

        assert_eq!(
            refusal,
            FilingRefusal::NetUnderpayment {
                shortfall: dec!(300)
            }
        );
        assert!(refusal.to_string().starts_with("you owe $300 more"));
    }

    #[test]
    fn refund_covering_balance_is_allowed() {
        let result = result(
            Settlement::new(dec!(1471), dec!(2000)),
            Settlement::new(dec!(1343), dec!(1000)),
        );

        let position = ensure_payable_allowed(&result).unwrap();

        assert_eq!(
            position,
            NetPosition {
                federal: dec!(529),
                state: dec!(-343),
                net: dec!(186),
            }
        );
    }

    #[test]
    fn break_even_is_allowed() {
        let result = result(
            Settlement::new(dec!(100), dec!(300)),
            Settlement::new(dec!(300), dec!(100)),
        );

        assert_eq!(ensure_payable_allowed(&result).map(|p| p.net), Ok(dec!(0)));
    }

    #[test]
    fn placeholder_results_are_allowed() {
        assert!(ensure_payable_allowed(&TaxResult::default()).is_ok());
    }
}
