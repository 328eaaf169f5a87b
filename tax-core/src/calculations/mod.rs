//! Tax rule engine and day-presence counting.
//!
//! [`compute_tax_result`] is the entry point: it runs the federal rule for the
//! filer's country of citizenship and the state rule for their income state.
//! The individual rules are also exported for callers that need only one.

pub mod aggregate;
pub mod common;
pub mod federal;
pub mod jurisdiction;
pub mod net;
pub mod presence;
pub mod state;

pub use federal::{
    FederalRule, IndiaTreatyRule, compute_federal_tax, compute_federal_tax_for_year, federal_rule,
};
pub use jurisdiction::{Country, TaxRuleError, UsState};
pub use net::{FilingRefusal, NetPosition, ensure_payable_allowed};
pub use presence::{YearPresence, days_present, days_present_as_of, presence_history};
pub use state::{IllinoisRule, StateRule, compute_state_tax, compute_state_tax_for_year, state_rule};

use tracing::debug;

use crate::models::{FederalTaxResult, FormData, StateTaxResult, TaxResult};

/// Federal and state results for one filing.
///
/// A filer without U.S. income gets placeholder results without any rule
/// running, so their country of citizenship is not checked. Otherwise an
/// unsupported country fails with [`TaxRuleError::NotSupported`]. A filer
/// whose income state is not Illinois gets a placeholder state result.
pub fn compute_tax_result(form: &FormData) -> Result<TaxResult, TaxRuleError> {
    let income = &form.income;
    if !income.had_us_income {
        debug!("no U.S. income; skipping federal and state rules");
        return Ok(TaxResult {
            federal: FederalTaxResult::no_income(),
            state: StateTaxResult::not_applicable(),
        });
    }

    let country: Country = form.personal.country_of_citizenship.parse()?;
    let federal = compute_federal_tax_for_year(income, country, form.tax_year)?;

    let state = match UsState::for_income_state(income.income_state) {
        Some(state) => compute_state_tax_for_year(income, state, form.tax_year)?,
        None => {
            debug!(income_state = ?income.income_state, "no state rule for income state");
            StateTaxResult::not_applicable()
        }
    };

    Ok(TaxResult { federal, state })
}
