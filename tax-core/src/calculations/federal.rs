//! Federal income tax for nonresident aliens filing Form 1040-NR.
//!
//! # Computation
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Gross income: wages + interest + miscellaneous, with cents |
//! | 2    | Taxable income: `floor(max(0, gross - treaty deduction))` |
//! | 3    | Tax: `floor((taxable - bracket floor) × rate + bracket base)` |
//! | 4    | Withholding: federal withholding across all entries, floored once |
//! | 5    | Refund or balance due |
//!
//! The rule is selected by country of citizenship. Only the U.S.-India treaty
//! rule exists; it allows the flat standard deduction under Article 21(2).
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::calculations::{Country, compute_federal_tax};
//! use tax_core::{IncomeRecord, IncomeState, W2Entry};
//!
//! let income = IncomeRecord {
//!     had_us_income: true,
//!     income_state: IncomeState::Illinois,
//!     w2_entries: vec![W2Entry {
//!         employer_name: "University".to_string(),
//!         ein: "376000511".to_string(),
//!         wages: dec!(30000),
//!         federal_tax_withheld: dec!(2000),
//!         state_tax_withheld: dec!(1000),
//!         social_security_withheld: dec!(0),
//!         medicare_withheld: dec!(0),
//!     }],
//!     ..Default::default()
//! };
//!
//! let result = compute_federal_tax(&income, Country::India).unwrap();
//!
//! assert_eq!(result.taxable_income, dec!(14250));
//! assert_eq!(result.tax_owed(), dec!(1471));
//! assert_eq!(result.refund(), dec!(529));
//! ```

use rust_decimal::Decimal;
use tracing::debug;

use super::aggregate::{fica_applicable, federal_withholding, gross_income};
use super::common::{floor_dollars, max};
use super::jurisdiction::{Country, TaxRuleError};
use crate::models::{
    FederalForms, FederalTaxResult, IncomeRecord, SUPPORTED_TAX_YEAR, Settlement, TaxBracket,
    TaxYearConfig,
};

/// A federal computation for filers from one treaty country.
pub trait FederalRule: Send + Sync {
    fn country(&self) -> Country;

    fn compute(
        &self,
        income: &IncomeRecord,
    ) -> Result<FederalTaxResult, TaxRuleError>;
}

/// Article 21(2) of the U.S.-India treaty: Indian students may take the
/// standard deduction that nonresidents are otherwise denied.
#[derive(Debug, Clone)]
pub struct IndiaTreatyRule {
    config: TaxYearConfig,
}

impl IndiaTreatyRule {
    pub fn new(config: TaxYearConfig) -> Self {
        Self { config }
    }

    /// Taxable income after the treaty deduction, in whole dollars.
    fn taxable_income(
        &self,
        gross_income: Decimal,
    ) -> Decimal {
        floor_dollars(max(
            Decimal::ZERO,
            gross_income - self.config.treaty_standard_deduction,
        ))
    }

    /// Tax from the rate schedule, in whole dollars.
    fn bracket_tax(
        &self,
        taxable_income: Decimal,
    ) -> Result<Decimal, TaxRuleError> {
        if taxable_income <= Decimal::ZERO {
            return Ok(Decimal::ZERO);
        }

        let bracket: &TaxBracket = self
            .config
            .federal_brackets
            .iter()
            .find(|b| b.contains(taxable_income))
            .ok_or(TaxRuleError::NoMatchingBracket(taxable_income))?;

        let marginal_income = taxable_income - bracket.min_income;
        let tax = bracket.base_tax + (marginal_income * bracket.tax_rate);

        Ok(floor_dollars(tax))
    }
}

impl FederalRule for IndiaTreatyRule {
    fn country(&self) -> Country {
        Country::India
    }

    fn compute(
        &self,
        income: &IncomeRecord,
    ) -> Result<FederalTaxResult, TaxRuleError> {
        if !income.had_us_income {
            return Ok(FederalTaxResult::no_income());
        }

        let gross_income = gross_income(income);
        let taxable_income = self.taxable_income(gross_income);
        let tax_owed = self.bracket_tax(taxable_income)?;
        let withheld = federal_withholding(income).total;
        let settlement = Settlement::new(tax_owed, withheld);
        let fica_applicable = fica_applicable(income);
        let files_fica_claim = fica_applicable && !income.fica_refund_opt_out;

        debug!(
            %gross_income,
            %taxable_income,
            %tax_owed,
            %withheld,
            fica_applicable,
            "computed federal tax under India treaty rule"
        );

        Ok(FederalTaxResult {
            gross_income,
            deduction: self.config.treaty_standard_deduction,
            taxable_income,
            settlement,
            fica_applicable,
            forms: FederalForms {
                form_8843: true,
                form_1040_nr: true,
                schedule_oi: true,
                form_843: files_fica_claim,
                form_8316: files_fica_claim,
            },
        })
    }
}

/// Selects the federal rule for `country` and `tax_year`.
///
/// # Errors
/// * [`TaxRuleError::UnsupportedTaxYear`] when no constants exist for the year.
pub fn federal_rule(
    country: Country,
    tax_year: i32,
) -> Result<Box<dyn FederalRule>, TaxRuleError> {
    let config =
        TaxYearConfig::for_year(tax_year).ok_or(TaxRuleError::UnsupportedTaxYear(tax_year))?;

    let rule: Box<dyn FederalRule> = match country {
        Country::India => Box::new(IndiaTreatyRule::new(config)),
    };
    Ok(rule)
}

/// Federal result for the supported tax year.
pub fn compute_federal_tax(
    income: &IncomeRecord,
    country: Country,
) -> Result<FederalTaxResult, TaxRuleError> {
    compute_federal_tax_for_year(income, country, SUPPORTED_TAX_YEAR)
}

pub fn compute_federal_tax_for_year(
    income: &IncomeRecord,
    country: Country,
    tax_year: i32,
) -> Result<FederalTaxResult, TaxRuleError> {
    federal_rule(country, tax_year)?.compute(income)
}
