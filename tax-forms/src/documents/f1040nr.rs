//! Form 1040-NR, U.S. Nonresident Alien Income Tax Return. Whole dollars.
//!
//! Fixed answers: filing status single (box 1), no digital assets, occupation
//! "Student". Every amount comes from the federal result or from the shared
//! aggregates, so the return foots with Schedule OI and the Illinois forms.
//!
//! | Line | Source |
//! |------|--------|
//! | 1a, 1z | floored wages |
//! | 2b   | floored interest |
//! | 8    | remaining income, so that line 9 equals floored gross income |
//! | 9, 11 | floored gross income |
//! | 12, 14 | treaty standard deduction |
//! | 15   | taxable income |
//! | 16, 18, 22, 24 | tax |
//! | 25a, 25b, 25d, 33 | federal withholding |
//! | 34, 35a | refund |
//! | 35b-d | direct deposit, only when there is a refund |
//! | 37   | amount owed |

use rust_decimal::Decimal;
use tax_core::AccountType;
use tax_core::calculations::aggregate::{federal_withholding, income_breakdown};

use super::{DocumentKind, irs_box, irs_field, irs_yes_no};
use crate::context::FillContext;
use crate::format;
use crate::mapping::FieldMapping;
use crate::value::FieldValue;

fn amount(value: Decimal) -> FieldValue {
    FieldValue::text(DocumentKind::F1040Nr.currency_style().format(value))
}

fn refund_account(ctx: &FillContext) -> Option<&tax_core::BankDetails> {
    if ctx.tax.federal.refund() > Decimal::ZERO {
        ctx.form.income.bank_details.as_ref()
    } else {
        None
    }
}

pub fn field_mappings() -> Vec<FieldMapping> {
    let mut fields = vec![
        FieldMapping::required(irs_field(1, "f1_01"), |ctx| {
            FieldValue::text(ctx.form.personal.first_and_initial())
        }),
        FieldMapping::required(irs_field(1, "f1_02"), |ctx| {
            FieldValue::text(ctx.form.personal.last_name.trim())
        }),
        FieldMapping::required(irs_field(1, "f1_03"), |ctx| {
            FieldValue::text(format::ssn(ctx.ssn()))
        }),
        FieldMapping::required(irs_field(1, "f1_04"), |ctx| {
            FieldValue::text(ctx.form.personal.us_address.street.trim())
        }),
        FieldMapping::cosmetic(irs_field(1, "f1_05"), |ctx| {
            FieldValue::text(
                ctx.form
                    .personal
                    .us_address
                    .apartment
                    .as_deref()
                    .unwrap_or_default()
                    .trim(),
            )
        }),
        FieldMapping::required(irs_field(1, "f1_06"), |ctx| {
            FieldValue::text(ctx.form.personal.us_address.city_state_zip())
        }),
        FieldMapping::cosmetic(irs_field(1, "f1_07"), |ctx| {
            FieldValue::text(ctx.form.personal.foreign_address.country.trim())
        }),
        FieldMapping::cosmetic(irs_field(1, "f1_08"), |ctx| {
            FieldValue::text(
                ctx.form
                    .personal
                    .foreign_address
                    .province
                    .as_deref()
                    .unwrap_or_default()
                    .trim(),
            )
        }),
        FieldMapping::cosmetic(irs_field(1, "f1_09"), |ctx| {
            FieldValue::text(ctx.form.personal.foreign_address.postal_code.trim())
        }),
        // Filing status: single.
        FieldMapping::fixed(irs_box(1, "c1_1", 0), FieldValue::Checkbox(true)),
        // Income
        FieldMapping::required(irs_field(1, "f1_10"), |ctx| {
            amount(income_breakdown(&ctx.form.income).wages)
        }),
        FieldMapping::required(irs_field(1, "f1_11"), |ctx| {
            amount(income_breakdown(&ctx.form.income).wages)
        }),
        FieldMapping::required(irs_field(1, "f1_12"), |ctx| {
            amount(income_breakdown(&ctx.form.income).interest)
        }),
        FieldMapping::required(irs_field(1, "f1_13"), |ctx| {
            amount(income_breakdown(&ctx.form.income).other)
        }),
        FieldMapping::required(irs_field(1, "f1_14"), |ctx| {
            amount(income_breakdown(&ctx.form.income).total)
        }),
        FieldMapping::required(irs_field(1, "f1_15"), |ctx| {
            amount(income_breakdown(&ctx.form.income).total)
        }),
        // Tax and credits
        FieldMapping::required(irs_field(2, "f2_01"), |ctx| amount(ctx.tax.federal.deduction)),
        FieldMapping::required(irs_field(2, "f2_02"), |ctx| amount(ctx.tax.federal.deduction)),
        FieldMapping::required(irs_field(2, "f2_03"), |ctx| {
            amount(ctx.tax.federal.taxable_income)
        }),
        FieldMapping::required(irs_field(2, "f2_04"), |ctx| amount(ctx.tax.federal.tax_owed())),
        FieldMapping::required(irs_field(2, "f2_05"), |ctx| amount(ctx.tax.federal.tax_owed())),
        FieldMapping::required(irs_field(2, "f2_06"), |ctx| amount(ctx.tax.federal.tax_owed())),
        FieldMapping::required(irs_field(2, "f2_07"), |ctx| amount(ctx.tax.federal.tax_owed())),
        // Payments
        FieldMapping::required(irs_field(2, "f2_08"), |ctx| {
            amount(federal_withholding(&ctx.form.income).w2)
        }),
        FieldMapping::required(irs_field(2, "f2_09"), |ctx| {
            amount(federal_withholding(&ctx.form.income).form_1099)
        }),
        FieldMapping::required(irs_field(2, "f2_10"), |ctx| {
            amount(federal_withholding(&ctx.form.income).total)
        }),
        FieldMapping::required(irs_field(2, "f2_11"), |ctx| {
            amount(ctx.tax.federal.settlement.withheld)
        }),
        // Refund
        FieldMapping::required(irs_field(2, "f2_12"), |ctx| amount(ctx.tax.federal.refund())),
        FieldMapping::required(irs_field(2, "f2_13"), |ctx| amount(ctx.tax.federal.refund())),
        FieldMapping::cosmetic(irs_field(2, "f2_14"), |ctx| {
            FieldValue::text(
                refund_account(ctx)
                    .map(|bank| bank.routing_number.clone())
                    .unwrap_or_default(),
            )
        }),
        FieldMapping::cosmetic(irs_box(2, "c2_1", 0), |ctx| {
            FieldValue::Checkbox(
                refund_account(ctx).is_some_and(|bank| bank.account_type == AccountType::Checking),
            )
        }),
        FieldMapping::cosmetic(irs_box(2, "c2_1", 1), |ctx| {
            FieldValue::Checkbox(
                refund_account(ctx).is_some_and(|bank| bank.account_type == AccountType::Savings),
            )
        }),
        FieldMapping::cosmetic(irs_field(2, "f2_15"), |ctx| {
            FieldValue::text(
                refund_account(ctx)
                    .map(|bank| bank.account_number.clone())
                    .unwrap_or_default(),
            )
        }),
        // Amount you owe
        FieldMapping::required(irs_field(2, "f2_16"), |ctx| {
            amount(ctx.tax.federal.amount_owed())
        }),
        // Sign here
        FieldMapping::fixed(irs_field(2, "f2_17"), FieldValue::text("Student")),
        FieldMapping::cosmetic(irs_field(2, "f2_18"), |ctx| {
            FieldValue::text(ctx.form.personal.phone.trim())
        }),
        FieldMapping::cosmetic(irs_field(2, "f2_19"), |ctx| {
            FieldValue::text(ctx.form.personal.email.trim())
        }),
    ];

    // Digital assets: no.
    fields.extend(irs_yes_no(1, "c1_2", |_| false));
    fields
}
