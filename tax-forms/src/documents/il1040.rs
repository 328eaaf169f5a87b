//! Form IL-1040, Illinois Individual Income Tax Return. Whole dollars.
//!
//! Fixed answers: nonresident (Step 2 residency), single filing status,
//! Schedule NR and Schedule IL-WIT attached. Line 25 is the Schedule IL-WIT
//! total, so the two documents always agree.

use rust_decimal::Decimal;
use tax_core::calculations::aggregate::{illinois_withholding_total, income_breakdown};
use tax_core::{AccountType, BankDetails};

use super::DocumentKind;
use crate::context::FillContext;
use crate::format;
use crate::mapping::FieldMapping;
use crate::value::FieldValue;

fn amount(value: Decimal) -> FieldValue {
    FieldValue::text(DocumentKind::Il1040.currency_style().format(value))
}

fn refund_account(ctx: &FillContext) -> Option<&BankDetails> {
    (ctx.tax.state.refund() > Decimal::ZERO)
        .then_some(ctx.form.income.bank_details.as_ref())
        .flatten()
}

pub fn field_mappings() -> Vec<FieldMapping> {
    vec![
        // Step 1: personal information
        FieldMapping::required("step1.first_name", |ctx| {
            FieldValue::text(ctx.form.personal.first_name.trim())
        }),
        FieldMapping::cosmetic("step1.middle_initial", |ctx| {
            FieldValue::text(
                ctx.form
                    .personal
                    .middle_initial
                    .as_deref()
                    .unwrap_or_default()
                    .trim(),
            )
        }),
        FieldMapping::required("step1.last_name", |ctx| {
            FieldValue::text(ctx.form.personal.last_name.trim())
        }),
        FieldMapping::required("step1.ssn", |ctx| FieldValue::text(format::ssn(ctx.ssn()))),
        FieldMapping::cosmetic("step1.date_of_birth", |ctx| {
            FieldValue::text(format::optional_date(ctx.form.personal.date_of_birth))
        }),
        FieldMapping::required("step1.street", |ctx| {
            FieldValue::text(ctx.form.personal.us_address.street_line())
        }),
        FieldMapping::required("step1.city", |ctx| {
            FieldValue::text(ctx.form.personal.us_address.city.trim())
        }),
        FieldMapping::required("step1.state", |ctx| {
            FieldValue::text(ctx.form.personal.us_address.state.trim())
        }),
        FieldMapping::required("step1.zip", |ctx| {
            FieldValue::text(ctx.form.personal.us_address.zip.trim())
        }),
        FieldMapping::cosmetic("step1.email", |ctx| {
            FieldValue::text(ctx.form.personal.email.trim())
        }),
        FieldMapping::cosmetic("step1.phone", |ctx| {
            FieldValue::text(ctx.form.personal.phone.trim())
        }),
        // Step 2: residency and filing status
        FieldMapping::fixed("step2.residency", FieldValue::Radio("nonresident".to_string())),
        FieldMapping::fixed("step2.filing_status", FieldValue::Radio("single".to_string())),
        // Step 3: income
        FieldMapping::required("line1", |ctx| amount(income_breakdown(&ctx.form.income).total)),
        FieldMapping::required("line9", |ctx| amount(income_breakdown(&ctx.form.income).total)),
        // Step 4: exemptions and net income
        FieldMapping::required("line10", |ctx| amount(ctx.tax.state.exemption)),
        FieldMapping::required("line11", |ctx| amount(ctx.tax.state.taxable_income)),
        // Step 5: tax
        FieldMapping::required("line12", |ctx| amount(ctx.tax.state.tax_owed())),
        FieldMapping::required("line14", |ctx| amount(ctx.tax.state.tax_owed())),
        FieldMapping::required("line24", |ctx| amount(ctx.tax.state.tax_owed())),
        // Step 8: payments
        FieldMapping::required("line25", |ctx| {
            amount(illinois_withholding_total(&ctx.form.income))
        }),
        FieldMapping::required("line31", |ctx| amount(ctx.tax.state.settlement.withheld)),
        // Step 10: refund or amount owed
        FieldMapping::required("line32", |ctx| amount(ctx.tax.state.refund())),
        FieldMapping::required("line36", |ctx| amount(ctx.tax.state.refund())),
        FieldMapping::cosmetic("line37.routing_number", |ctx| {
            FieldValue::text(
                refund_account(ctx)
                    .map(|bank| bank.routing_number.clone())
                    .unwrap_or_default(),
            )
        }),
        FieldMapping::cosmetic("line37.account_number", |ctx| {
            FieldValue::text(
                refund_account(ctx)
                    .map(|bank| bank.account_number.clone())
                    .unwrap_or_default(),
            )
        }),
        FieldMapping::cosmetic("line37.account_type", |ctx| {
            FieldValue::Radio(
                refund_account(ctx)
                    .map(|bank| match bank.account_type {
                        AccountType::Checking => "checking",
                        AccountType::Savings => "savings",
                    })
                    .unwrap_or_default()
                    .to_string(),
            )
        }),
        FieldMapping::required("line38", |ctx| amount(ctx.tax.state.amount_owed())),
        // Attachments
        FieldMapping::fixed("attach.schedule_nr", FieldValue::Checkbox(true)),
        FieldMapping::fixed("attach.schedule_il_wit", FieldValue::Checkbox(true)),
    ]
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::mapping::evaluate_table;
    use crate::test_support::sample_context;

    #[test]
    fn lines_follow_the_state_result() {
        let values = evaluate_table(&field_mappings(), &sample_context());
        let line = |name: &str| values[name].to_string();

        assert_eq!(line("line1"), "34120");
        assert_eq!(line("line9"), "34120");
        assert_eq!(line("line10"), "2850");
        assert_eq!(line("line11"), "31270");
        assert_eq!(line("line12"), "1547");
        assert_eq!(line("line24"), "1547");
        assert_eq!(line("line25"), "1520");
        assert_eq!(line("line31"), "1520");
        assert_eq!(line("line36"), "0");
        assert_eq!(line("line38"), "27");
    }

    #[test]
    fn no_bank_details_when_tax_is_owed() {
        let values = evaluate_table(&field_mappings(), &sample_context());

        assert_eq!(values["line37.routing_number"], FieldValue::text(""));
        assert_eq!(values["line37.account_type"], FieldValue::Radio(String::new()));
    }

    #[test]
    fn fixed_status_answers() {
        let values = evaluate_table(&field_mappings(), &sample_context());

        assert_eq!(values["step2.residency"], FieldValue::Radio("nonresident".to_string()));
        assert_eq!(values["step2.filing_status"], FieldValue::Radio("single".to_string()));
        assert_eq!(values["step1.street"], FieldValue::text("1010 W Green St, Apt 4B"));
        assert_eq!(values["step1.date_of_birth"], FieldValue::text("04/12/2000"));
    }
}
