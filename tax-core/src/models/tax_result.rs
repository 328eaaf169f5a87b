use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Product;

/// Final balance of one return, in whole dollars.
///
/// At most one of `refund` and `amount_owed` is nonzero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Settlement {
    /// Tax before withholding.
    pub tax_owed: Decimal,
    pub withheld: Decimal,
    pub refund: Decimal,
    pub amount_owed: Decimal,
}

impl Settlement {
    /// Settles `tax_owed` against `withheld`. Both must already be whole
    /// dollars.
    pub fn new(
        tax_owed: Decimal,
        withheld: Decimal,
    ) -> Self {
        Self {
            tax_owed,
            withheld,
            refund: (withheld - tax_owed).max(Decimal::ZERO),
            amount_owed: (tax_owed - withheld).max(Decimal::ZERO),
        }
    }

    /// Refund as a positive number, balance due as a negative one.
    pub fn net(&self) -> Decimal {
        self.refund - self.amount_owed
    }
}

/// Federal documents a filing needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FederalForms {
    pub form_8843: bool,
    pub form_1040_nr: bool,
    pub schedule_oi: bool,
    pub form_843: bool,
    pub form_8316: bool,
}

/// Illinois documents a filing needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StateForms {
    pub il_1040: bool,
    pub schedule_nr: bool,
    pub schedule_il_wit: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FederalTaxResult {
    pub gross_income: Decimal,
    pub deduction: Decimal,
    pub taxable_income: Decimal,
    #[serde(flatten)]
    pub settlement: Settlement,
    /// Social security or Medicare was withheld on at least one W-2.
    pub fica_applicable: bool,
    pub forms: FederalForms,
}

impl FederalTaxResult {
    /// Result for a filer with no U.S. income: zero everywhere, 8843 only.
    pub fn no_income() -> Self {
        Self {
            forms: FederalForms {
                form_8843: true,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn tax_owed(&self) -> Decimal {
        self.settlement.tax_owed
    }

    pub fn refund(&self) -> Decimal {
        self.settlement.refund
    }

    pub fn amount_owed(&self) -> Decimal {
        self.settlement.amount_owed
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StateTaxResult {
    pub gross_income: Decimal,
    pub exemption: Decimal,
    pub taxable_income: Decimal,
    #[serde(flatten)]
    pub settlement: Settlement,
    pub forms: StateForms,
}

impl StateTaxResult {
    /// Placeholder used when no state rule runs.
    pub fn not_applicable() -> Self {
        Self::default()
    }

    pub fn tax_owed(&self) -> Decimal {
        self.settlement.tax_owed
    }

    pub fn refund(&self) -> Decimal {
        self.settlement.refund
    }

    pub fn amount_owed(&self) -> Decimal {
        self.settlement.amount_owed
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaxResult {
    pub federal: FederalTaxResult,
    pub state: StateTaxResult,
}

impl TaxResult {
    /// Products this filing qualifies for, ignoring the net-underpayment
    /// refusal (see [`crate::calculations::ensure_payable_allowed`]).
    pub fn applicable_products(&self) -> Vec<Product> {
        let mut products = Vec::new();
        if self.federal.forms.form_1040_nr {
            products.push(Product::Federal);
        }
        if self.state.forms.il_1040 {
            products.push(Product::State);
        }
        if self.federal.forms.form_843 {
            products.push(Product::FicaRefund);
        }
        products.push(Product::Form8843Only);
        products
    }
}
