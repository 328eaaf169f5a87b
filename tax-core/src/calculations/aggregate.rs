//! Quantities that appear on more than one document.
//!
//! Each quantity has exactly one function here. The rule engine and every form
//! mapper call these instead of re-deriving a total, so two documents in the
//! same filing can never disagree because of a different rounding order.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::common::{floor_dollars, floor_sum, sum_floored};
use crate::models::{IncomeKind, IncomeRecord};

/// Sum of wages, interest and miscellaneous income, with cents.
pub fn gross_income(income: &IncomeRecord) -> Decimal {
    income.items().map(|item| item.amount).sum()
}

pub fn total_wages(income: &IncomeRecord) -> Decimal {
    income.w2_entries.iter().map(|w2| w2.wages).sum()
}

pub fn total_interest(income: &IncomeRecord) -> Decimal {
    income.interest_entries.iter().map(|entry| entry.amount).sum()
}

/// Whole-dollar income lines that foot to the floored gross income.
///
/// Wages and interest are floored individually; `other` takes the remainder so
/// that `wages + interest + other == total` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeBreakdown {
    pub wages: Decimal,
    pub interest: Decimal,
    pub other: Decimal,
    pub total: Decimal,
}

pub fn income_breakdown(income: &IncomeRecord) -> IncomeBreakdown {
    let total = floor_dollars(gross_income(income));
    let wages = floor_dollars(total_wages(income));
    let interest = floor_dollars(total_interest(income));
    IncomeBreakdown {
        wages,
        interest,
        other: (total - wages - interest).max(Decimal::ZERO),
        total,
    }
}

/// Federal income tax withheld, floored as an aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FederalWithholding {
    /// From W-2 box 2.
    pub w2: Decimal,
    /// From 1099s; the remainder of `total` after `w2`.
    pub form_1099: Decimal,
    pub total: Decimal,
}

pub fn federal_withholding(income: &IncomeRecord) -> FederalWithholding {
    let total = floor_sum(income.items().map(|item| item.federal_tax_withheld));
    let w2 = floor_sum(income.w2_entries.iter().map(|w2| w2.federal_tax_withheld)).min(total);
    FederalWithholding {
        w2,
        form_1099: total - w2,
        total,
    }
}

/// One row of Schedule IL-WIT.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IllinoisWithholdingLine {
    pub kind: IncomeKind,
    pub payer_name: String,
    pub payer_id: Option<String>,
    /// Whole dollars.
    pub income: Decimal,
    /// Whole dollars, floored per entry.
    pub withheld: Decimal,
}

/// Illinois withholding rows, one per entry whose floored withholding is
/// positive, in W-2, interest, miscellaneous order.
pub fn illinois_withholding_lines(income: &IncomeRecord) -> Vec<IllinoisWithholdingLine> {
    income
        .items()
        .filter_map(|item| {
            let withheld = floor_dollars(item.state_tax_withheld);
            (withheld > Decimal::ZERO).then(|| IllinoisWithholdingLine {
                kind: item.kind,
                payer_name: item.payer_name.to_string(),
                payer_id: item.payer_id.map(str::to_string),
                income: floor_dollars(item.amount),
                withheld,
            })
        })
        .collect()
}

/// Total Illinois withholding: the sum of the per-entry floored amounts.
///
/// This is the figure on IL-1040 line 25 and on the Schedule IL-WIT total, and
/// the withholding the Illinois rule settles against.
pub fn illinois_withholding_total(income: &IncomeRecord) -> Decimal {
    sum_floored(
        income
            .items()
            .map(|item| item.state_tax_withheld)
            .filter(|withheld| *withheld > Decimal::ZERO),
    )
}

/// A W-2 with FICA withheld, paired with the employer details the filer gave
/// for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FicaClaim {
    /// Position in `IncomeRecord::w2_entries`.
    pub w2_index: usize,
    pub employer_name: String,
    pub employer_address: String,
    pub ein: String,
    pub wages: Decimal,
    pub social_security: Decimal,
    pub medicare: Decimal,
}

impl FicaClaim {
    pub fn total(&self) -> Decimal {
        self.social_security + self.medicare
    }
}

/// FICA claims for every W-2 with social security or Medicare withheld.
///
/// `fica_employer_info` is matched positionally against the filtered W-2s.
/// When an entry is missing the W-2's own employer name is used and the address
/// is left empty.
pub fn fica_claims(income: &IncomeRecord) -> Vec<FicaClaim> {
    let info = income.fica_employer_info.as_deref().unwrap_or(&[]);
    income
        .fica_w2_entries()
        .enumerate()
        .map(|(position, (w2_index, w2))| {
            let employer = info.get(position);
            FicaClaim {
                w2_index,
                employer_name: employer
                    .map(|e| e.employer_name.clone())
                    .unwrap_or_else(|| w2.employer_name.clone()),
                employer_address: employer
                    .map(|e| e.employer_address.clone())
                    .unwrap_or_default(),
                ein: w2.ein.clone(),
                wages: w2.wages,
                social_security: w2.social_security_withheld,
                medicare: w2.medicare_withheld,
            }
        })
        .collect()
}

/// Social security plus Medicare withheld across all W-2s.
pub fn fica_withheld_total(income: &IncomeRecord) -> Decimal {
    income.w2_entries.iter().map(|w2| w2.fica_withheld()).sum()
}

pub fn fica_applicable(income: &IncomeRecord) -> bool {
    fica_withheld_total(income) > Decimal::ZERO
}
