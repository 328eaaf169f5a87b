//! Schedule NR (IL-1040), Nonresident and Part-Year Resident Computation of
//! Illinois Tax. Whole dollars.
//!
//! Column A is federal income, column B the Illinois portion. The Illinois rule
//! treats all of the filer's income as Illinois income, so the two columns
//! carry the same figures and the line 46 ratio is 1.000 whenever there is
//! income.

use rust_decimal::Decimal;
use tax_core::TaxYearConfig;
use tax_core::calculations::aggregate::{IncomeBreakdown, income_breakdown};

use super::DocumentKind;
use crate::context::FillContext;
use crate::format;
use crate::mapping::FieldMapping;
use crate::value::FieldValue;

fn amount(value: Decimal) -> FieldValue {
    FieldValue::text(DocumentKind::IlScheduleNr.currency_style().format(value))
}

/// Illinois share of each income line.
fn illinois_portion(ctx: &FillContext) -> IncomeBreakdown {
    income_breakdown(&ctx.form.income)
}

/// Line 46: column B over column A, capped at 1, three decimals.
fn income_ratio(ctx: &FillContext) -> Decimal {
    let federal = income_breakdown(&ctx.form.income).total;
    if federal <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    (illinois_portion(ctx).total / federal)
        .min(Decimal::ONE)
        .round_dp(3)
}

pub fn field_mappings() -> Vec<FieldMapping> {
    vec![
        FieldMapping::required("nr.name", |ctx| FieldValue::text(ctx.form.personal.full_name())),
        FieldMapping::required("nr.ssn", |ctx| FieldValue::text(format::ssn(ctx.ssn()))),
        FieldMapping::fixed("nr.residency", FieldValue::Radio("nonresident".to_string())),
        // Step 3: income, columns A and B
        FieldMapping::required("line1.a", |ctx| amount(income_breakdown(&ctx.form.income).wages)),
        FieldMapping::required("line1.b", |ctx| amount(illinois_portion(ctx).wages)),
        FieldMapping::required("line2.a", |ctx| {
            amount(income_breakdown(&ctx.form.income).interest)
        }),
        FieldMapping::required("line2.b", |ctx| amount(illinois_portion(ctx).interest)),
        FieldMapping::required("line8.a", |ctx| amount(income_breakdown(&ctx.form.income).other)),
        FieldMapping::required("line8.b", |ctx| amount(illinois_portion(ctx).other)),
        FieldMapping::required("line45.a", |ctx| {
            amount(income_breakdown(&ctx.form.income).total)
        }),
        FieldMapping::required("line45.b", |ctx| amount(illinois_portion(ctx).total)),
        // Step 4: tax
        FieldMapping::required("line46", |ctx| {
            FieldValue::text(format!("{:.3}", income_ratio(ctx)))
        }),
        FieldMapping::required("line47", |ctx| amount(ctx.tax.state.exemption)),
        FieldMapping::required("line48", |ctx| amount(ctx.tax.state.taxable_income)),
        FieldMapping::required("line49", |ctx| {
            let rate = TaxYearConfig::for_year(ctx.tax_year())
                .map(|config| config.il_income_tax_rate * Decimal::ONE_HUNDRED)
                .unwrap_or_default();
            FieldValue::text(format!("{}%", rate.normalize()))
        }),
        FieldMapping::required("line50", |ctx| amount(ctx.tax.state.tax_owed())),
    ]
}
