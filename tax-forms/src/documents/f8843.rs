//! Form 8843, Statement for Exempt Individuals and Individuals With a Medical
//! Condition.
//!
//! Every F-1 student files it, with or without income. Only Part I and Part III
//! (students) are filled.
//!
//! | Line | Source |
//! |------|--------|
//! | 1a   | visa and entry date of the latest visit |
//! | 1b   | current visa, with the date it took effect when the visa changed |
//! | 4a   | days present in the tax year and the two years before |
//! | 4b   | days excludable: all days of the tax year under F, J, M or Q status |
//! | 11   | visa held in each of the six prior years |
//! | 12   | fixed "No": not present as a student for more than five years |
//! | 13   | fixed "No": no application for permanent residence |

use super::{irs_field, irs_yes_no};
use crate::context::FillContext;
use crate::format;
use crate::mapping::FieldMapping;
use crate::value::FieldValue;

const VISA_HISTORY_YEARS: i32 = 6;
const VISA_HISTORY_FIELDS: [&str; 6] = ["f2_03", "f2_04", "f2_05", "f2_06", "f2_07", "f2_08"];

pub fn field_mappings() -> Vec<FieldMapping> {
    let mut fields = vec![
        FieldMapping::required(irs_field(1, "f1_01"), |ctx| {
            FieldValue::text(ctx.form.personal.first_and_initial())
        }),
        FieldMapping::required(irs_field(1, "f1_02"), |ctx| {
            FieldValue::text(ctx.form.personal.last_name.trim())
        }),
        FieldMapping::cosmetic(irs_field(1, "f1_03"), |ctx| {
            FieldValue::text(format::ssn(ctx.ssn()))
        }),
        FieldMapping::required(irs_field(1, "f1_04"), |ctx| {
            FieldValue::text(ctx.form.personal.foreign_address.one_line())
        }),
        FieldMapping::required(irs_field(1, "f1_05"), |ctx| {
            FieldValue::text(ctx.form.personal.us_address.one_line())
        }),
        // Part I
        FieldMapping::required(irs_field(1, "f1_06"), |ctx| FieldValue::text(line_1a(ctx))),
        FieldMapping::required(irs_field(1, "f1_07"), |ctx| FieldValue::text(line_1b(ctx))),
        FieldMapping::required(irs_field(1, "f1_08"), |ctx| {
            FieldValue::text(ctx.form.personal.country_of_citizenship.trim())
        }),
        FieldMapping::required(irs_field(1, "f1_09"), |ctx| {
            FieldValue::text(ctx.form.personal.passport_country.trim())
        }),
        FieldMapping::required(irs_field(1, "f1_10"), |ctx| {
            FieldValue::text(ctx.form.personal.passport_number.trim())
        }),
        FieldMapping::required(irs_field(1, "f1_11"), |ctx| days_present(ctx, 0)),
        FieldMapping::required(irs_field(1, "f1_12"), |ctx| days_present(ctx, 1)),
        FieldMapping::required(irs_field(1, "f1_13"), |ctx| days_present(ctx, 2)),
        FieldMapping::required(irs_field(1, "f1_14"), |ctx| {
            FieldValue::text(days_excludable(ctx).to_string())
        }),
        // Part III
        FieldMapping::required(irs_field(2, "f2_01"), |ctx| {
            let academic = &ctx.form.academic;
            FieldValue::text(join_nonempty(&[
                &academic.institution_name,
                &academic.institution_address,
                &academic.institution_phone,
            ]))
        }),
        FieldMapping::required(irs_field(2, "f2_02"), |ctx| {
            let academic = &ctx.form.academic;
            FieldValue::text(join_nonempty(&[
                &academic.director_name,
                &academic.director_address,
                &academic.director_phone,
            ]))
        }),
    ];

    for (offset, field) in (0..VISA_HISTORY_YEARS).zip(VISA_HISTORY_FIELDS) {
        fields.push(FieldMapping::required(irs_field(2, field), move |ctx| {
            let year = ctx.tax_year() - VISA_HISTORY_YEARS + offset;
            FieldValue::text(
                ctx.form
                    .residency
                    .visa_held_in_year(year)
                    .map(|visa| visa.as_str())
                    .unwrap_or_default(),
            )
        }));
    }

    fields.extend(irs_yes_no(2, "c2_1", |_| false));
    fields.extend(irs_yes_no(2, "c2_2", |_| false));
    fields
}

fn line_1a(ctx: &FillContext) -> String {
    match ctx.form.residency.latest_visit() {
        Some(visit) => match visit.entry_date {
            Some(entry) => format!("{}, {}", visit.visa_type, format::date(entry)),
            None => visit.visa_type.to_string(),
        },
        None => String::new(),
    }
}

fn line_1b(ctx: &FillContext) -> String {
    let residency = &ctx.form.residency;
    let Some(visit) = residency.latest_visit() else {
        return String::new();
    };
    match (residency.visa_changed(), visit.entry_date) {
        (true, Some(entry)) => format!("{}, changed {}", visit.visa_type, format::date(entry)),
        _ => visit.visa_type.to_string(),
    }
}

/// Days present `years_back` years before the tax year.
fn days_present(
    ctx: &FillContext,
    years_back: usize,
) -> FieldValue {
    FieldValue::text(ctx.presence()[years_back].days.to_string())
}

/// Exempt individuals exclude every day of the tax year spent under an F, J,
/// M or Q visa.
pub fn days_excludable(ctx: &FillContext) -> u32 {
    let residency = &ctx.form.residency;
    let exempt = residency
        .visa_held_in_year(ctx.tax_year())
        .is_some_and(|visa| visa.is_student_or_exchange());
    if exempt { ctx.presence()[0].days } else { 0 }
}

fn join_nonempty(parts: &[&String]) -> String {
    parts
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}
