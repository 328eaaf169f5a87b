//! Schedule IL-WIT, Illinois Income Tax Withholding. Whole dollars.
//!
//! One row per income entry with Illinois withholding. The total is
//! [`illinois_withholding_total`], the same figure as IL-1040 line 25. The
//! template has ten rows; entries past the tenth are not printed, although the
//! total still includes them.

use rust_decimal::Decimal;
use tax_core::calculations::aggregate::{
    IllinoisWithholdingLine, illinois_withholding_lines, illinois_withholding_total,
};

use super::DocumentKind;
use crate::context::FillContext;
use crate::format;
use crate::mapping::FieldMapping;
use crate::value::FieldValue;

pub const ROWS: usize = 10;

fn amount(value: Decimal) -> FieldValue {
    FieldValue::text(DocumentKind::IlScheduleIlWit.currency_style().format(value))
}

fn row_value(
    ctx: &FillContext,
    row: usize,
    read: fn(&IllinoisWithholdingLine) -> FieldValue,
) -> FieldValue {
    illinois_withholding_lines(&ctx.form.income)
        .get(row)
        .map(read)
        .unwrap_or_else(|| FieldValue::text(""))
}

pub fn field_mappings() -> Vec<FieldMapping> {
    let mut fields = vec![
        FieldMapping::required("wit.name", |ctx| FieldValue::text(ctx.form.personal.full_name())),
        FieldMapping::required("wit.ssn", |ctx| FieldValue::text(format::ssn(ctx.ssn()))),
    ];

    for row in 0..ROWS {
        let n = row + 1;
        fields.push(FieldMapping::required(format!("row{n}.payer_id"), move |ctx| {
            row_value(ctx, row, |line| {
                FieldValue::text(line.payer_id.as_deref().map(format::ein).unwrap_or_default())
            })
        }));
        fields.push(FieldMapping::required(format!("row{n}.payer_name"), move |ctx| {
            row_value(ctx, row, |line| FieldValue::text(line.payer_name.trim()))
        }));
        fields.push(FieldMapping::required(format!("row{n}.form"), move |ctx| {
            row_value(ctx, row, |line| FieldValue::text(line.kind.source_form()))
        }));
        fields.push(FieldMapping::required(format!("row{n}.income"), move |ctx| {
            row_value(ctx, row, |line| amount(line.income))
        }));
        fields.push(FieldMapping::required(format!("row{n}.withheld"), move |ctx| {
            row_value(ctx, row, |line| amount(line.withheld))
        }));
    }

    fields.push(FieldMapping::required("total.withheld", |ctx| {
        amount(illinois_withholding_total(&ctx.form.income))
    }));
    fields
}
