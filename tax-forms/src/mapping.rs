//! Declarative field tables and the template filler.
//!
//! A document is described by a `Vec<FieldMapping>`: each entry names one
//! template field and carries the function that computes its value. Filling
//! walks the table against the field namespace of a loaded template.

use std::fmt;

use serde::Serialize;
use tracing::warn;

use crate::context::FillContext;
use crate::documents::DocumentKind;
use crate::value::{FieldKind, FieldValue, FieldValues, TemplateNamespace};

/// Whether a field's absence from the template breaks the filing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldClass {
    /// Carries a figure or answer the return depends on.
    Required,
    /// Contact details and other fields the filer can fill in by hand.
    Cosmetic,
}

pub type Extractor = Box<dyn Fn(&FillContext) -> FieldValue + Send + Sync>;

pub struct FieldMapping {
    pub field: String,
    pub class: FieldClass,
    extract: Extractor,
}

impl FieldMapping {
    pub fn new(
        field: impl Into<String>,
        class: FieldClass,
        extract: impl Fn(&FillContext) -> FieldValue + Send + Sync + 'static,
    ) -> Self {
        Self {
            field: field.into(),
            class,
            extract: Box::new(extract),
        }
    }

    pub fn required(
        field: impl Into<String>,
        extract: impl Fn(&FillContext) -> FieldValue + Send + Sync + 'static,
    ) -> Self {
        Self::new(field, FieldClass::Required, extract)
    }

    pub fn cosmetic(
        field: impl Into<String>,
        extract: impl Fn(&FillContext) -> FieldValue + Send + Sync + 'static,
    ) -> Self {
        Self::new(field, FieldClass::Cosmetic, extract)
    }

    /// A field whose value is the same for every filer.
    pub fn fixed(
        field: impl Into<String>,
        value: FieldValue,
    ) -> Self {
        Self::new(field, FieldClass::Required, move |_| value.clone())
    }

    pub fn evaluate(
        &self,
        ctx: &FillContext,
    ) -> FieldValue {
        (self.extract)(ctx)
    }
}

impl fmt::Debug for FieldMapping {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("FieldMapping")
            .field("field", &self.field)
            .field("class", &self.class)
            .finish_non_exhaustive()
    }
}

/// A table entry that could not be written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldWarning {
    MissingRequiredField {
        document: DocumentKind,
        field: String,
    },
    MissingCosmeticField {
        document: DocumentKind,
        field: String,
    },
    KindMismatch {
        document: DocumentKind,
        field: String,
        expected: FieldKind,
        found: FieldKind,
    },
}

impl FieldWarning {
    pub fn is_required(&self) -> bool {
        !matches!(self, Self::MissingCosmeticField { .. })
    }
}

impl fmt::Display for FieldWarning {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::MissingRequiredField { document, field } => {
                write!(f, "{document}: required field '{field}' not in template")
            }
            Self::MissingCosmeticField { document, field } => {
                write!(f, "{document}: field '{field}' not in template")
            }
            Self::KindMismatch {
                document,
                field,
                expected,
                found,
            } => write!(
                f,
                "{document}: field '{field}' is {found:?} in template, mapped as {expected:?}"
            ),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FillOutcome {
    pub values: FieldValues,
    pub warnings: Vec<FieldWarning>,
}

/// Evaluates every entry of `mappings` without a template.
pub fn evaluate_table(
    mappings: &[FieldMapping],
    ctx: &FillContext,
) -> FieldValues {
    mappings
        .iter()
        .map(|mapping| (mapping.field.clone(), mapping.evaluate(ctx)))
        .collect()
}

/// Evaluates `mappings` against the fields `namespace` declares.
///
/// Entries whose field is missing from the namespace, or declared with a
/// different kind, are skipped and reported as warnings; filling carries on.
pub fn fill_template(
    document: DocumentKind,
    mappings: &[FieldMapping],
    namespace: &TemplateNamespace,
    ctx: &FillContext,
) -> FillOutcome {
    let mut outcome = FillOutcome::default();

    for mapping in mappings {
        let value = mapping.evaluate(ctx);
        let warning = match namespace.get(&mapping.field) {
            Some(kind) if *kind == value.kind() => {
                outcome.values.insert(mapping.field.clone(), value);
                continue;
            }
            Some(kind) => FieldWarning::KindMismatch {
                document,
                field: mapping.field.clone(),
                expected: value.kind(),
                found: *kind,
            },
            None if mapping.class == FieldClass::Required => FieldWarning::MissingRequiredField {
                document,
                field: mapping.field.clone(),
            },
            None => FieldWarning::MissingCosmeticField {
                document,
                field: mapping.field.clone(),
            },
        };

        warn!(%document, field = %mapping.field, required = warning.is_required(), "{warning}");
        outcome.warnings.push(warning);
    }

    outcome
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use tax_core::{
        FormData, IncomeRecord, PersonalInfo, ResidencyRecord, TaxResult,
    };

    use super::*;

    fn ctx() -> FillContext {
        let form = FormData {
            tax_year: 2025,
            personal: PersonalInfo {
                first_name: "Asha".to_string(),
                last_name: "Rao".to_string(),
                ..Default::default()
            },
            academic: Default::default(),
            residency: ResidencyRecord {
                date_of_first_visit: NaiveDate::from_ymd_opt(2024, 8, 12).unwrap(),
                visits: Vec::new(),
                has_filed_tax_return_before: false,
                year_filed: None,
                form_used: None,
            },
            income: IncomeRecord::default(),
        };
        FillContext::as_of(
            form,
            TaxResult::default(),
            NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
        )
    }

    fn table() -> Vec<FieldMapping> {
        vec![
            FieldMapping::required("name", |ctx| {
                FieldValue::text(ctx.form.personal.full_name())
            }),
            FieldMapping::fixed("single", FieldValue::Checkbox(true)),
            FieldMapping::cosmetic("phone", |ctx| FieldValue::text(&ctx.form.personal.phone)),
        ]
    }

    #[test]
    fn fills_fields_present_in_namespace() {
        let namespace = TemplateNamespace::from([
            ("name".to_string(), FieldKind::Text),
            ("single".to_string(), FieldKind::Checkbox),
            ("phone".to_string(), FieldKind::Text),
        ]);

        let outcome = fill_template(DocumentKind::F8843, &table(), &namespace, &ctx());

        assert_eq!(outcome.warnings, Vec::new());
        assert_eq!(outcome.values["name"], FieldValue::text("Asha Rao"));
        assert_eq!(outcome.values["single"], FieldValue::Checkbox(true));
    }

    #[test]
    fn missing_fields_are_warnings_split_by_class() {
        let namespace = TemplateNamespace::from([("single".to_string(), FieldKind::Text)]);

        let outcome = fill_template(DocumentKind::F8843, &table(), &namespace, &ctx());

        assert!(outcome.values.is_empty());
        assert_eq!(
            outcome.warnings,
            vec![
                FieldWarning::MissingRequiredField {
                    document: DocumentKind::F8843,
                    field: "name".to_string(),
                },
                FieldWarning::KindMismatch {
                    document: DocumentKind::F8843,
                    field: "single".to_string(),
                    expected: FieldKind::Checkbox,
                    found: FieldKind::Text,
                },
                FieldWarning::MissingCosmeticField {
                    document: DocumentKind::F8843,
                    field: "phone".to_string(),
                },
            ]
        );
        assert!(!outcome.warnings[2].is_required());
    }

    #[test]
    fn evaluate_table_ignores_namespace() {
        let values = evaluate_table(&table(), &ctx());

        assert_eq!(values.len(), 3);
        assert_eq!(values["phone"], FieldValue::text(""));
    }
}
