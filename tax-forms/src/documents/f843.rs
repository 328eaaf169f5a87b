//! Form 843, Claim for Refund and Request for Abatement, filed once per
//! employer that withheld FICA in error. Amounts in dollars and cents.
//!
//! Fixed answers: employment tax (line 3), no interest claim (line 5a), return
//! type 941 (line 6). Line 7 is a generated explanation naming the exemption,
//! the employer and the amounts, followed by the list of attachments.

use rust_decimal::Decimal;
use tax_core::calculations::aggregate::FicaClaim;

use super::{DocumentKind, irs_box, irs_field, irs_yes_no};
use crate::context::FillContext;
use crate::format;
use crate::mapping::FieldMapping;
use crate::value::FieldValue;

const ATTACHMENTS: &str = "Form W-2, Form 8316, copy of visa, Form I-94, Form I-20";

fn money(value: Decimal) -> String {
    DocumentKind::F843.currency_style().format(value)
}

pub fn field_mappings(claim: &FicaClaim) -> Vec<FieldMapping> {
    let total = claim.total();
    let narrative_claim = claim.clone();

    let mut fields = vec![
        FieldMapping::required(irs_field(1, "f1_01"), |ctx| {
            FieldValue::text(ctx.form.personal.full_name())
        }),
        FieldMapping::required(irs_field(1, "f1_02"), |ctx| {
            FieldValue::text(format::ssn(ctx.ssn()))
        }),
        FieldMapping::required(irs_field(1, "f1_04"), |ctx| {
            FieldValue::text(ctx.form.personal.us_address.street_line())
        }),
        FieldMapping::required(irs_field(1, "f1_05"), |ctx| {
            FieldValue::text(ctx.form.personal.us_address.city_state_zip())
        }),
        FieldMapping::cosmetic(irs_field(1, "f1_06"), |ctx| {
            FieldValue::text(ctx.form.personal.phone.trim())
        }),
        // Line 1: period
        FieldMapping::required(irs_field(1, "f1_07"), |ctx| {
            FieldValue::text(format!("01/01/{}", ctx.tax_year()))
        }),
        FieldMapping::required(irs_field(1, "f1_08"), |ctx| {
            FieldValue::text(format!("12/31/{}", ctx.tax_year()))
        }),
        // Line 2: amount to be refunded
        FieldMapping::fixed(irs_field(1, "f1_09"), FieldValue::text(money(total))),
        // Line 3: employment tax
        FieldMapping::fixed(irs_box(1, "c1_1", 0), FieldValue::Checkbox(true)),
        // Line 6: Form 941
        FieldMapping::fixed(irs_box(1, "c1_3", 0), FieldValue::Checkbox(true)),
        // Line 7
        FieldMapping::required(irs_field(1, "f1_10"), move |ctx| {
            FieldValue::text(explanation(ctx, &narrative_claim))
        }),
    ];
    fields.extend(irs_yes_no(1, "c1_2", |_| false));
    fields
}

/// Line 7 text.
pub fn explanation(
    ctx: &FillContext,
    claim: &FicaClaim,
) -> String {
    let residency = &ctx.form.residency;
    let visa = residency
        .current_visa()
        .map(|visa| visa.as_str())
        .unwrap_or("nonimmigrant");

    let mut employer = claim.employer_name.trim().to_string();
    let ein = format::ein(&claim.ein);
    if !ein.is_empty() {
        employer.push_str(&format!(" (EIN {ein})"));
    }
    if !claim.employer_address.trim().is_empty() {
        employer.push_str(&format!(", {}", claim.employer_address.trim()));
    }

    format!(
        "I am a nonresident alien student in {visa} status. Wages paid to me as a student are \
         exempt from social security and Medicare taxes under IRC section 3121(b)(19). \
         {employer} withheld ${ss} of social security tax and ${medicare} of Medicare tax \
         from my {year} wages, a total of ${total}. I have been in the United States since \
         {arrived}. The employer did not refund the tax withheld in error. Attached: \
         {ATTACHMENTS}.",
        ss = money(claim.social_security),
        medicare = money(claim.medicare),
        year = ctx.tax_year(),
        total = money(claim.total()),
        arrived = format::date(residency.date_of_first_visit),
    )
}
