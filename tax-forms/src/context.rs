use chrono::{Local, NaiveDate};
use tax_core::calculations::{YearPresence, presence_history};
use tax_core::{FormData, TaxResult};

/// Everything a field extractor may read.
///
/// Extractors derive values only from the collected data, the computed tax
/// result and `today`; nothing else is reachable from a field table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillContext {
    pub form: FormData,
    pub tax: TaxResult,
    /// Bounds open-ended visits and dates the package.
    pub today: NaiveDate,
}

impl FillContext {
    pub fn new(
        form: FormData,
        tax: TaxResult,
    ) -> Self {
        Self::as_of(form, tax, Local::now().date_naive())
    }

    pub fn as_of(
        form: FormData,
        tax: TaxResult,
        today: NaiveDate,
    ) -> Self {
        Self { form, tax, today }
    }

    pub fn tax_year(&self) -> i32 {
        self.form.tax_year
    }

    /// Days present in the tax year and the two years before it, most recent
    /// first.
    pub fn presence(&self) -> [YearPresence; 3] {
        presence_history(&self.form.residency.visits, self.tax_year(), self.today)
    }

    /// Calendar years before the tax year, oldest first, for visa history
    /// tables.
    pub fn prior_years(
        &self,
        count: i32,
    ) -> Vec<i32> {
        let year = self.tax_year();
        ((year - count)..year).collect()
    }

    /// Filer SSN or ITIN as entered.
    pub fn ssn(&self) -> &str {
        self.form.income.ssn.as_deref().unwrap_or_default()
    }
}
