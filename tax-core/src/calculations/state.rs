//! Illinois income tax for part-year and nonresident filers.
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Gross income, same definition as the federal rule |
//! | 2    | Exemption: the single-filer allowance, or zero above the income limit |
//! | 3    | Taxable income: `floor(max(0, gross - exemption))` |
//! | 4    | Tax: `floor(taxable × flat rate)` |
//! | 5    | Withholding: sum of the per-entry floored Illinois withholding |
//!
//! The exemption is lost all at once above the limit; there is no phase-out.
//! Step 5 uses [`illinois_withholding_total`], the same figure Schedule IL-WIT
//! prints.

use rust_decimal::Decimal;
use tracing::debug;

use super::aggregate::{gross_income, illinois_withholding_total};
use super::common::{floor_dollars, max};
use super::jurisdiction::{TaxRuleError, UsState};
use crate::models::{
    IncomeRecord, SUPPORTED_TAX_YEAR, Settlement, StateForms, StateTaxResult, TaxYearConfig,
};

/// A state income tax computation.
pub trait StateRule: Send + Sync {
    fn state(&self) -> UsState;

    fn compute(
        &self,
        income: &IncomeRecord,
    ) -> Result<StateTaxResult, TaxRuleError>;
}

#[derive(Debug, Clone)]
pub struct IllinoisRule {
    config: TaxYearConfig,
}

impl IllinoisRule {
    pub fn new(config: TaxYearConfig) -> Self {
        Self { config }
    }

    fn exemption(
        &self,
        gross_income: Decimal,
    ) -> Decimal {
        if gross_income > self.config.il_exemption_income_limit {
            Decimal::ZERO
        } else {
            self.config.il_exemption_allowance
        }
    }
}

impl StateRule for IllinoisRule {
    fn state(&self) -> UsState {
        UsState::Illinois
    }

    fn compute(
        &self,
        income: &IncomeRecord,
    ) -> Result<StateTaxResult, TaxRuleError> {
        let gross_income = gross_income(income);
        let exemption = self.exemption(gross_income);
        let taxable_income = floor_dollars(max(Decimal::ZERO, gross_income - exemption));
        let tax_owed = floor_dollars(taxable_income * self.config.il_income_tax_rate);
        let withheld = illinois_withholding_total(income);
        let settlement = Settlement::new(tax_owed, withheld);

        debug!(
            %gross_income,
            %exemption,
            %taxable_income,
            %tax_owed,
            %withheld,
            "computed Illinois tax"
        );

        Ok(StateTaxResult {
            gross_income,
            exemption,
            taxable_income,
            settlement,
            forms: StateForms {
                il_1040: true,
                schedule_nr: true,
                schedule_il_wit: true,
            },
        })
    }
}

/// Selects the rule for `state` and `tax_year`.
pub fn state_rule(
    state: UsState,
    tax_year: i32,
) -> Result<Box<dyn StateRule>, TaxRuleError> {
    let config =
        TaxYearConfig::for_year(tax_year).ok_or(TaxRuleError::UnsupportedTaxYear(tax_year))?;

    let rule: Box<dyn StateRule> = match state {
        UsState::Illinois => Box::new(IllinoisRule::new(config)),
    };
    Ok(rule)
}

/// State result for the supported tax year.
pub fn compute_state_tax(
    income: &IncomeRecord,
    state: UsState,
) -> Result<StateTaxResult, TaxRuleError> {
    compute_state_tax_for_year(income, state, SUPPORTED_TAX_YEAR)
}

pub fn compute_state_tax_for_year(
    income: &IncomeRecord,
    state: UsState,
    tax_year: i32,
) -> Result<StateTaxResult, TaxRuleError> {
    state_rule(state, tax_year)?.compute(income)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::{IncomeEntry, IncomeState, W2Entry};

    fn w2(
        wages: Decimal,
        state_withheld: Decimal,
    ) -> W2Entry {
        W2Entry {
            employer_name: "University of Illinois".to_string(),
            ein: "376000511".to_string(),
            wages,
            federal_tax_withheld: dec!(0),
            state_tax_withheld: state_withheld,
            social_security_withheld: dec!(0),
            medicare_withheld: dec!(0),
        }
    }

    fn income(w2_entries: Vec<W2Entry>) -> IncomeRecord {
        IncomeRecord {
            had_us_income: true,
            income_state: IncomeState::Illinois,
            w2_entries,
            ..Default::default()
        }
    }

    fn compute(record: &IncomeRecord) -> StateTaxResult {
        compute_state_tax(record, UsState::Illinois).unwrap()
    }

    // =========================================================================
    // exemption cliff
    // =========================================================================

    #[test]
    fn exemption_kept_at_limit() {
        let result = compute(&income(vec![w2(dec!(250000), dec!(0))]));

        assert_eq!(result.exemption, dec!(2850));
        assert_eq!(result.taxable_income, dec!(247150));
    }

    #[test]
    fn exemption_lost_one_dollar_above_limit() {
        let result = compute(&income(vec![w2(dec!(250001), dec!(0))]));

        assert_eq!(result.exemption, dec!(0));
        assert_eq!(result.taxable_income, dec!(250001));
    }

    #[test]
    fn high_income_loses_exemption_entirely() {
        let result = compute(&income(vec![w2(dec!(260000), dec!(0))]));

        assert_eq!(result.exemption, dec!(0));
        assert_eq!(result.taxable_income, dec!(260000));
        // 260000 × 0.0495
        assert_eq!(result.tax_owed(), dec!(12870));
    }

    // =========================================================================
    // settlement
    // =========================================================================

    #[test]
    fn single_w2_balance_due() {
        let result = compute(&income(vec![w2(dec!(30000), dec!(1000))]));

        assert_eq!(result.taxable_income, dec!(27150));
        // 27150 × 0.0495 = 1343.925
        assert_eq!(result.tax_owed(), dec!(1343));
        assert_eq!(result.refund(), dec!(0));
        assert_eq!(result.amount_owed(), dec!(343));
        assert!(result.forms.il_1040);
        assert!(result.forms.schedule_nr);
        assert!(result.forms.schedule_il_wit);
    }

    #[test]
    fn zero_income_owes_nothing() {
        let result = compute(&income(Vec::new()));

        assert_eq!(result.taxable_income, dec!(0));
        assert_eq!(result.tax_owed(), dec!(0));
        assert_eq!(result.refund(), dec!(0));
        assert_eq!(result.amount_owed(), dec!(0));
    }

    #[test]
    fn withholding_floors_each_entry_before_summing() {
        let mut record = income(vec![w2(dec!(2000), dec!(50.70)), w2(dec!(2000), dec!(50.70))]);
        record.interest_entries.push(IncomeEntry {
            payer_name: "Bank".to_string(),
            payer_tin: None,
            amount: dec!(10),
            federal_tax_withheld: dec!(0),
            state_tax_withheld: dec!(0.90),
        });

        let result = compute(&record);

        // 50 + 50 + 0, not floor(102.30)
        assert_eq!(result.settlement.withheld, dec!(100));
        assert_eq!(result.settlement.withheld, illinois_withholding_total(&record));
    }

    #[test]
    fn state_rule_dispatches_on_state() {
        let rule = state_rule(UsState::Illinois, 2025).unwrap();

        assert_eq!(rule.state(), UsState::Illinois);
        assert!(matches!(
            state_rule(UsState::Illinois, 2030),
            Err(TaxRuleError::UnsupportedTaxYear(2030))
        ));
    }
}
