//! Schedule OI (Form 1040-NR), Other Information.
//!
//! Fixed "No" answers: C (green card application), D1 (U.S. citizen), D2
//! (green card holder). Item G lists the visits that touch the tax year, one
//! row per visit; the template has room for six.

use chrono::Datelike;
use tax_core::calculations::Country;

use super::{irs_field, irs_yes_no};
use crate::context::FillContext;
use crate::format;
use crate::mapping::FieldMapping;
use crate::value::FieldValue;

pub const VISIT_ROWS: usize = 6;

pub fn field_mappings() -> Vec<FieldMapping> {
    let mut fields = vec![
        FieldMapping::required(irs_field(1, "f1_01"), |ctx| {
            FieldValue::text(ctx.form.personal.full_name())
        }),
        FieldMapping::required(irs_field(1, "f1_02"), |ctx| {
            FieldValue::text(format::ssn(ctx.ssn()))
        }),
        // A, B
        FieldMapping::required(irs_field(1, "f1_03"), |ctx| {
            FieldValue::text(ctx.form.personal.country_of_citizenship.trim())
        }),
        FieldMapping::required(irs_field(1, "f1_04"), |ctx| {
            FieldValue::text(ctx.form.personal.foreign_address.country.trim())
        }),
        // E
        FieldMapping::required(irs_field(1, "f1_05"), |ctx| {
            FieldValue::text(
                ctx.form
                    .residency
                    .visa_held_in_year(ctx.tax_year())
                    .map(|visa| visa.as_str())
                    .unwrap_or_default(),
            )
        }),
        // F
        FieldMapping::required(irs_field(1, "f1_06"), |ctx| {
            FieldValue::text(visa_change_explanation(ctx))
        }),
    ];
    fields.extend(irs_yes_no(1, "c1_1", |_| false));
    fields.extend(irs_yes_no(1, "c1_2", |_| false));
    fields.extend(irs_yes_no(1, "c1_3", |_| false));
    fields.extend(irs_yes_no(1, "c1_4", |ctx| {
        ctx.form.residency.visa_changed()
    }));

    // G
    for row in 0..VISIT_ROWS {
        let entry_field = format!("f1_{:02}", 7 + 2 * row);
        let exit_field = format!("f1_{:02}", 8 + 2 * row);
        fields.push(FieldMapping::required(irs_field(1, &entry_field), move |ctx| {
            FieldValue::text(visit_dates(ctx, row).0)
        }));
        fields.push(FieldMapping::required(irs_field(1, &exit_field), move |ctx| {
            FieldValue::text(visit_dates(ctx, row).1)
        }));
    }

    // H
    for (years_back, field) in ["f1_19", "f1_20", "f1_21"].into_iter().enumerate() {
        fields.push(FieldMapping::required(irs_field(1, field), move |ctx| {
            FieldValue::text(ctx.presence()[years_back].days.to_string())
        }));
    }

    // I
    fields.extend(irs_yes_no(1, "c1_5", |ctx| {
        ctx.form.residency.has_filed_tax_return_before
    }));
    fields.push(FieldMapping::required(irs_field(1, "f1_22"), |ctx| {
        FieldValue::text(prior_return(ctx))
    }));

    // L
    fields.push(FieldMapping::required(irs_field(2, "f2_01"), |ctx| {
        FieldValue::text(treaty_country(ctx).map(|c| c.as_str()).unwrap_or_default())
    }));
    fields.push(FieldMapping::required(irs_field(2, "f2_02"), |ctx| {
        FieldValue::text(
            treaty_country(ctx)
                .map(|c| c.treaty_article())
                .unwrap_or_default(),
        )
    }));
    fields
}

fn treaty_country(ctx: &FillContext) -> Option<Country> {
    ctx.form.personal.country_of_citizenship.parse().ok()
}

/// Visa types in the order they were held, e.g. "F-1 to J-1". Empty when the
/// visa never changed.
fn visa_change_explanation(ctx: &FillContext) -> String {
    let residency = &ctx.form.residency;
    if !residency.visa_changed() {
        return String::new();
    }

    let mut visits: Vec<_> = residency.visits.iter().collect();
    visits.sort_by_key(|visit| visit.entry_date);

    let mut sequence: Vec<&str> = Vec::new();
    for visit in visits {
        let visa = visit.visa_type.as_str();
        if sequence.last() != Some(&visa) {
            sequence.push(visa);
        }
    }
    sequence.join(" to ")
}

/// Entry and exit dates for row `row` of item G. The exit is blank while the
/// filer was still present at the end of the tax year.
fn visit_dates(
    ctx: &FillContext,
    row: usize,
) -> (String, String) {
    let year = ctx.tax_year();
    let visits = ctx.form.residency.visits_in_year(year);
    let Some(visit) = visits.get(row) else {
        return (String::new(), String::new());
    };

    let exit = visit.exit_date.filter(|exit| exit.year() == year);
    (format::optional_date(visit.entry_date), format::optional_date(exit))
}

fn prior_return(ctx: &FillContext) -> String {
    let residency = &ctx.form.residency;
    if !residency.has_filed_tax_return_before {
        return String::new();
    }
    let year = residency.year_filed.map(|y| y.to_string());
    let form = residency
        .form_used
        .as_deref()
        .map(str::trim)
        .filter(|form| !form.is_empty())
        .map(str::to_string);
    year.into_iter()
        .chain(form)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tax_core::{VisaType, Visit};

    use super::*;
    use crate::documents::irs_box;
    use crate::mapping::evaluate_table;
    use crate::test_support::{date, sample_context};

    #[test]
    fn fills_identity_treaty_and_presence() {
        let values = evaluate_table(&field_mappings(), &sample_context());

        assert_eq!(values[&irs_field(1, "f1_01")], FieldValue::text("Asha K Rao"));
        assert_eq!(values[&irs_field(1, "f1_03")], FieldValue::text("India"));
        assert_eq!(values[&irs_field(1, "f1_05")], FieldValue::text("F-1"));
        assert_eq!(values[&irs_field(1, "f1_19")], FieldValue::text("365"));
        assert_eq!(values[&irs_field(1, "f1_20")], FieldValue::text("282"));
        assert_eq!(values[&irs_field(1, "f1_21")], FieldValue::text("144"));
        assert_eq!(values[&irs_field(2, "f2_01")], FieldValue::text("India"));
        assert_eq!(values[&irs_field(2, "f2_02")], FieldValue::text("21(2)"));
    }

    #[test]
    fn lists_only_visits_touching_the_tax_year() {
        let values = evaluate_table(&field_mappings(), &sample_context());

        assert_eq!(values[&irs_field(1, "f1_07")], FieldValue::text("08/12/2024"));
        assert_eq!(values[&irs_field(1, "f1_08")], FieldValue::text(""));
        assert_eq!(values[&irs_field(1, "f1_09")], FieldValue::text(""));
    }

    #[test]
    fn prior_return_and_fixed_answers() {
        let values = evaluate_table(&field_mappings(), &sample_context());

        assert_eq!(values[&irs_box(1, "c1_5", 0)], FieldValue::Checkbox(true));
        assert_eq!(values[&irs_field(1, "f1_22")], FieldValue::text("2024, 1040-NR"));
        for group in ["c1_1", "c1_2", "c1_3", "c1_4"] {
            assert_eq!(values[&irs_box(1, group, 1)], FieldValue::Checkbox(true), "{group}");
        }
    }

    #[test]
    fn visa_change_is_explained() {
        let mut ctx = sample_context();
        ctx.form.residency.visits[1] = Visit {
            visa_type: VisaType::J1,
            entry_date: Some(date(2024, 8, 12)),
            exit_date: Some(date(2025, 6, 30)),
        };

        let values = evaluate_table(&field_mappings(), &ctx);

        assert_eq!(values[&irs_box(1, "c1_4", 0)], FieldValue::Checkbox(true));
        assert_eq!(values[&irs_field(1, "f1_06")], FieldValue::text("F-1 to J-1"));
        assert_eq!(values[&irs_field(1, "f1_08")], FieldValue::text("06/30/2025"));
    }
}
