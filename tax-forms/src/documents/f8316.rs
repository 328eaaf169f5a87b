//! Form 8316, Information Regarding Request for Refund of Social Security Tax
//! Erroneously Withheld on Wages Received by a Nonresident Alien on an F, J, or
//! M Type Visa. One per employer, attached to the matching Form 843. Amounts in
//! dollars and cents.
//!
//! The entry date is printed MM/DD/YY as the form asks. The "employer refused
//! to refund" answer is fixed to Yes.

use chrono::NaiveDate;
use tax_core::calculations::aggregate::FicaClaim;

use super::{DocumentKind, irs_field, irs_yes_no};
use crate::context::FillContext;
use crate::format;
use crate::mapping::FieldMapping;
use crate::value::FieldValue;

pub fn field_mappings(claim: &FicaClaim) -> Vec<FieldMapping> {
    let amount = DocumentKind::F8316.currency_style().format(claim.total());

    let mut fields = vec![
        FieldMapping::required(irs_field(1, "f1_01"), |ctx| {
            FieldValue::text(ctx.form.personal.full_name())
        }),
        FieldMapping::required(irs_field(1, "f1_02"), |ctx| {
            FieldValue::text(format::ssn(ctx.ssn()))
        }),
        FieldMapping::required(irs_field(1, "f1_03"), |ctx| {
            FieldValue::text(ctx.form.personal.us_address.one_line())
        }),
        FieldMapping::required(irs_field(1, "f1_04"), |ctx| {
            FieldValue::text(
                ctx.form
                    .residency
                    .current_visa()
                    .map(|visa| visa.as_str())
                    .unwrap_or_default(),
            )
        }),
        FieldMapping::required(irs_field(1, "f1_05"), |ctx| {
            FieldValue::text(format::date_short(entry_date(ctx)))
        }),
        FieldMapping::fixed(irs_field(1, "f1_06"), FieldValue::text(claim.employer_name.trim())),
        FieldMapping::fixed(
            irs_field(1, "f1_07"),
            FieldValue::text(claim.employer_address.trim()),
        ),
        FieldMapping::fixed(irs_field(1, "f1_08"), FieldValue::text(amount)),
    ];
    fields.extend(irs_yes_no(1, "c1_1", |ctx| ctx.form.residency.visa_changed()));
    fields.extend(irs_yes_no(1, "c1_2", |_| true));
    fields
}

/// First entry under the visa currently held, or the first arrival when no
/// visit records one.
fn entry_date(ctx: &FillContext) -> NaiveDate {
    let residency = &ctx.form.residency;
    residency
        .current_visa()
        .and_then(|current| {
            residency
                .visits
                .iter()
                .filter(|visit| visit.visa_type == current)
                .filter_map(|visit| visit.entry_date)
                .min()
        })
        .unwrap_or(residency.date_of_first_visit)
}
