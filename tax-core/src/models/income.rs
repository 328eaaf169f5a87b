use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// State in which the filer earned U.S. income.
///
/// Only [`IncomeState::Illinois`] triggers a state computation. `Unset` is what
/// the collector sends before the filer answers the question; it is rejected by
/// validation whenever U.S. income is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeState {
    Illinois,
    Other,
    #[default]
    Unset,
}

/// One Form W-2 as reported by an employer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct W2Entry {
    #[serde(default)]
    pub employer_name: String,
    /// Employer identification number, digits only once validated.
    pub ein: String,
    /// Box 1.
    pub wages: Decimal,
    /// Box 2.
    pub federal_tax_withheld: Decimal,
    /// Box 17.
    #[serde(default)]
    pub state_tax_withheld: Decimal,
    /// Box 4.
    #[serde(default)]
    pub social_security_withheld: Decimal,
    /// Box 6.
    #[serde(default)]
    pub medicare_withheld: Decimal,
}

impl W2Entry {
    /// Social security plus Medicare withheld on this W-2.
    pub fn fica_withheld(&self) -> Decimal {
        self.social_security_withheld + self.medicare_withheld
    }

    pub fn has_fica_withholding(&self) -> bool {
        self.fica_withheld() > Decimal::ZERO
    }
}

/// A 1099-INT or 1099-MISC style entry. Aggregated exactly like W-2 wages for
/// gross income, with no FICA semantics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeEntry {
    #[serde(default)]
    pub payer_name: String,
    #[serde(default)]
    pub payer_tin: Option<String>,
    pub amount: Decimal,
    #[serde(default)]
    pub federal_tax_withheld: Decimal,
    #[serde(default)]
    pub state_tax_withheld: Decimal,
}

/// Employer identity for a W-2 that had FICA withheld in error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FicaEmployerInfo {
    pub employer_name: String,
    pub employer_address: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    Checking,
    Savings,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Checking => "checking",
            Self::Savings => "savings",
        }
    }
}

/// Direct deposit instructions. Only ever used for refunds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankDetails {
    pub account_number: String,
    pub routing_number: String,
    pub account_type: AccountType,
}

/// Which bucket an [`IncomeItem`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeKind {
    Wages,
    Interest,
    Miscellaneous,
}

impl IncomeKind {
    /// Information return that reports this kind of income.
    pub fn source_form(&self) -> &'static str {
        match self {
            Self::Wages => "W-2",
            Self::Interest => "1099-INT",
            Self::Miscellaneous => "1099-MISC",
        }
    }
}

/// Borrowed, kind-agnostic view of a single income entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncomeItem<'a> {
    pub kind: IncomeKind,
    pub payer_name: &'a str,
    pub payer_id: Option<&'a str>,
    pub amount: Decimal,
    pub federal_tax_withheld: Decimal,
    pub state_tax_withheld: Decimal,
}

/// Everything the filer reported about U.S. income for one tax year.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IncomeRecord {
    pub had_us_income: bool,
    #[serde(default)]
    pub income_state: IncomeState,
    #[serde(default)]
    pub ssn: Option<String>,
    #[serde(default)]
    pub w2_entries: Vec<W2Entry>,
    #[serde(default)]
    pub interest_entries: Vec<IncomeEntry>,
    #[serde(default)]
    pub misc_entries: Vec<IncomeEntry>,
    /// Aligned with [`IncomeRecord::fica_w2_entries`], not with `w2_entries`.
    #[serde(default)]
    pub fica_employer_info: Option<Vec<FicaEmployerInfo>>,
    /// Filer declined the FICA refund product.
    #[serde(default)]
    pub fica_refund_opt_out: bool,
    #[serde(default)]
    pub bank_details: Option<BankDetails>,
}

impl IncomeRecord {
    /// W-2 entries with nonzero social security or Medicare withholding, in
    /// their original order, paired with their index in `w2_entries`.
    pub fn fica_w2_entries(&self) -> impl Iterator<Item = (usize, &W2Entry)> {
        self.w2_entries
            .iter()
            .enumerate()
            .filter(|(_, w2)| w2.has_fica_withholding())
    }

    /// Every income entry in W-2, interest, miscellaneous order.
    pub fn items(&self) -> impl Iterator<Item = IncomeItem<'_>> {
        let wages = self.w2_entries.iter().map(|w2| IncomeItem {
            kind: IncomeKind::Wages,
            payer_name: &w2.employer_name,
            payer_id: Some(w2.ein.as_str()),
            amount: w2.wages,
            federal_tax_withheld: w2.federal_tax_withheld,
            state_tax_withheld: w2.state_tax_withheld,
        });
        let interest = self
            .interest_entries
            .iter()
            .map(|entry| entry.as_item(IncomeKind::Interest));
        let misc = self
            .misc_entries
            .iter()
            .map(|entry| entry.as_item(IncomeKind::Miscellaneous));

        wages.chain(interest).chain(misc)
    }
}

impl IncomeEntry {
    fn as_item(
        &self,
        kind: IncomeKind,
    ) -> IncomeItem<'_> {
        IncomeItem {
            kind,
            payer_name: &self.payer_name,
            payer_id: self.payer_tin.as_deref(),
            amount: self.amount,
            federal_tax_withheld: self.federal_tax_withheld,
            state_tax_withheld: self.state_tax_withheld,
        }
    }
}
