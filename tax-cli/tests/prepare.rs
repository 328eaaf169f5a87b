//! End to end: filing data in, PDF packages out, against one-page AcroForm
//! templates generated from each document's field table.

use std::path::Path;

use chrono::NaiveDate;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};
use pretty_assertions::assert_eq;
use tax_cli::commands::{self, Prepared};
use tax_cli::config::AppConfig;
use tax_core::calculations::aggregate::fica_claims;
use tax_core::{FormData, Product, compute_tax_result};
use tax_forms::{FieldValue, FillContext, FormTarget, evaluate_table};
use tax_pdf::acroform::{collect_fields, decode_text};

const FILER: &str = include_str!("fixtures/filer.json");

fn form() -> FormData {
    serde_json::from_str(FILER).expect("fixture should deserialize")
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
}

fn states(
    doc: &mut Document,
    on: &str,
) -> Dictionary {
    let mut normal = Dictionary::new();
    for state in [on, "Off"] {
        let id = doc.add_object(Stream::new(dictionary! {}, Vec::new()));
        normal.set(state.as_bytes().to_vec(), Object::Reference(id));
    }
    dictionary! { "N" => normal }
}

fn widget(page: ObjectId) -> Dictionary {
    dictionary! {
        "Type" => "Annot",
        "Subtype" => "Widget",
        "P" => page,
        "Rect" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(10),
            Object::Integer(10),
        ],
    }
}

/// A one-page template declaring every field `target` writes, each with the
/// kind of the value written to it.
fn template_pdf(
    target: &FormTarget,
    ctx: &FillContext,
) -> Vec<u8> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();
    let page_id = doc.new_object_id();
    let mut fields = Vec::new();
    let mut annots = Vec::new();

    for (name, value) in evaluate_table(&target.field_mappings(), ctx) {
        let mut field = widget(page_id);
        field.set("T", Object::string_literal(name));
        match value {
            FieldValue::Text(_) => field.set("FT", "Tx"),
            FieldValue::Checkbox(_) => {
                field.set("FT", "Btn");
                field.set("AP", states(&mut doc, "Yes"));
            }
            FieldValue::Radio(option) => {
                let field_id = doc.new_object_id();
                let mut kids = Vec::new();
                let selected = if option.is_empty() { "unset" } else { option.as_str() };
                for state in [selected, "other"] {
                    let mut kid = widget(page_id);
                    kid.set("Parent", field_id);
                    kid.set("AP", states(&mut doc, state));
                    let kid_id = doc.add_object(kid);
                    kids.push(Object::Reference(kid_id));
                    annots.push(Object::Reference(kid_id));
                }
                field.remove(b"Type");
                field.remove(b"Subtype");
                field.set("FT", "Btn");
                field.set("Ff", Object::Integer(1 << 15));
                field.set("Kids", kids);
                doc.objects.insert(field_id, Object::Dictionary(field));
                fields.push(Object::Reference(field_id));
                continue;
            }
        }
        let id = doc.add_object(field);
        fields.push(Object::Reference(id));
        annots.push(Object::Reference(id));
    }

    doc.objects.insert(
        page_id,
        Object::Dictionary(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(612),
                Object::Integer(792),
            ],
            "Annots" => annots,
        }),
    );
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![Object::Reference(page_id)],
            "Count" => Object::Integer(1),
        }),
    );
    let form_id = doc.add_object(dictionary! { "Fields" => fields });
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
        "AcroForm" => form_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

fn write_templates(dir: &Path) {
    let form = form();
    let tax = compute_tax_result(&form).unwrap();
    let ctx = FillContext::as_of(form, tax, today());
    let claim = fica_claims(&ctx.form.income).remove(0);
    let targets = [
        FormTarget::F8843,
        FormTarget::F1040Nr,
        FormTarget::F1040NrScheduleOi,
        FormTarget::Il1040,
        FormTarget::IlScheduleNr,
        FormTarget::IlScheduleIlWit,
        FormTarget::F843(claim.clone()),
        FormTarget::F8316(claim),
    ];
    for target in &targets {
        let path = dir.join(target.kind().template_file());
        std::fs::write(path, template_pdf(target, &ctx)).unwrap();
    }
}

fn config(
    templates: &Path,
    output: &Path,
) -> AppConfig {
    AppConfig {
        templates_dir: templates.to_path_buf(),
        output_dir: output.to_path_buf(),
        ..AppConfig::default()
    }
}

fn text_field(
    doc: &Document,
    name: &str,
) -> String {
    let field = collect_fields(doc)
        .unwrap()
        .into_iter()
        .find(|field| field.name == name)
        .unwrap_or_else(|| panic!("no field {name}"));
    let dict = doc.get_dictionary(field.id).unwrap();
    decode_text(dict.get(b"V").unwrap().as_str().unwrap())
}

fn written(prepared: &Prepared) -> (Product, &Path, usize) {
    match prepared {
        Prepared::Written {
            product,
            path,
            pages,
            degraded,
            warnings,
        } => {
            assert!(degraded.is_empty(), "{product}: degraded {degraded:?}");
            assert!(warnings.is_empty(), "{product}: warnings {warnings:?}");
            (*product, path.as_path(), *pages)
        }
        other => panic!("not written: {other:?}"),
    }
}

// =============================================================================
// Packages
// =============================================================================

#[tokio::test]
async fn prepares_every_applicable_product() {
    let templates = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_templates(templates.path());

    let prepared = commands::prepare(form(), &[], &config(templates.path(), output.path()), today())
        .await
        .unwrap();

    let summary: Vec<(Product, usize)> = prepared
        .iter()
        .map(written)
        .map(|(product, _, pages)| (product, pages))
        .collect();
    assert_eq!(
        summary,
        vec![
            (Product::Federal, 4),
            (Product::State, 4),
            (Product::FicaRefund, 3),
            (Product::Form8843Only, 2),
        ]
    );

    for entry in &prepared {
        let (product, path, pages) = written(entry);
        assert_eq!(path, output.path().join(format!("{product}-2025.pdf")));
        let doc = Document::load_mem(&std::fs::read(path).unwrap()).unwrap();
        assert_eq!(doc.get_pages().len(), pages);
    }
}

#[tokio::test]
async fn state_package_carries_withholding_on_both_schedules() {
    let templates = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_templates(templates.path());

    let prepared = commands::prepare(
        form(),
        &[Product::State],
        &config(templates.path(), output.path()),
        today(),
    )
    .await
    .unwrap();

    let (_, path, _) = written(&prepared[0]);
    let doc = Document::load_mem(&std::fs::read(path).unwrap()).unwrap();
    // d1 is the instruction sheet
    assert_eq!(text_field(&doc, "d2_line25"), "1000");
    assert_eq!(text_field(&doc, "d2_line11"), "27150");
    assert_eq!(text_field(&doc, "d4_total.withheld"), "1000");
}

#[tokio::test]
async fn refused_products_are_reported_not_written() {
    let templates = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    write_templates(templates.path());
    let mut form = form();
    for w2 in &mut form.income.w2_entries {
        w2.federal_tax_withheld = Default::default();
    }

    let prepared = commands::prepare(
        form,
        &[Product::Federal, Product::FicaRefund],
        &config(templates.path(), output.path()),
        today(),
    )
    .await
    .unwrap();

    assert!(matches!(
        &prepared[0],
        Prepared::Refused {
            product: Product::Federal,
            ..
        }
    ));
    assert_eq!(written(&prepared[1]).0, Product::FicaRefund);
    assert!(!output.path().join("federal-2025.pdf").exists());
}

#[tokio::test]
async fn missing_templates_fail_the_run() {
    let templates = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();

    let err = commands::prepare(
        form(),
        &[Product::Form8843Only],
        &config(templates.path(), output.path()),
        today(),
    )
    .await
    .unwrap_err();

    assert_eq!(err.to_string(), "Failed to prepare 8843-only package");
}
