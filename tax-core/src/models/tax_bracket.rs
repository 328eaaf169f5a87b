use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One row of a federal rate schedule.
///
/// Bounds are inclusive on both ends; `max_income` of `None` means the bracket
/// is open-ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub tax_year: i32,
    pub min_income: Decimal,
    pub max_income: Option<Decimal>,
    pub tax_rate: Decimal,
    pub base_tax: Decimal,
}

impl TaxBracket {
    pub fn contains(
        &self,
        taxable_income: Decimal,
    ) -> bool {
        taxable_income >= self.min_income
            && self.max_income.is_none_or(|max| taxable_income <= max)
    }
}
