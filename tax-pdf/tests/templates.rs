//! Filling, merging and loading AcroForm templates built in memory.

use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};
use pretty_assertions::assert_eq;
use tax_forms::{
    DocumentKind, DocumentRenderer, FieldKind, FieldValue, FieldValues, FormTemplate,
    TemplateError, TemplateNamespace, TemplateStore,
};
use tax_pdf::acroform::{collect_fields, decode_text, read_namespace};
use tax_pdf::{DirectoryTemplateStore, LopdfRenderer};

const RADIO: i64 = 1 << 15;

fn appearance(
    doc: &mut Document,
    on: &str,
) -> Dictionary {
    let on_id = doc.add_object(Stream::new(dictionary! {}, Vec::new()));
    let off_id = doc.add_object(Stream::new(dictionary! {}, Vec::new()));
    let mut states = Dictionary::new();
    states.set(on.as_bytes().to_vec(), Object::Reference(on_id));
    states.set("Off", Object::Reference(off_id));
    dictionary! { "N" => states }
}

fn widget(page: ObjectId) -> Dictionary {
    dictionary! {
        "Type" => "Annot",
        "Subtype" => "Widget",
        "P" => page,
        "Rect" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Integer(100),
            Object::Integer(20),
        ],
    }
}

/// One page with a text field, a checkbox, a two-option radio group and a
/// field nested the way IRS templates nest theirs.
fn template_pdf() -> Vec<u8> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();
    let page_id = doc.new_object_id();

    let mut name = widget(page_id);
    name.set("FT", "Tx");
    name.set("T", Object::string_literal("name"));
    let name_id = doc.add_object(name);

    let mut agree = widget(page_id);
    agree.set("FT", "Btn");
    agree.set("T", Object::string_literal("agree"));
    agree.set("AP", appearance(&mut doc, "Yes"));
    let agree_id = doc.add_object(agree);

    let status_id = doc.new_object_id();
    let mut options = Vec::new();
    for option in ["single", "married"] {
        let mut kid = widget(page_id);
        kid.set("Parent", status_id);
        kid.set("AP", appearance(&mut doc, option));
        options.push(Object::Reference(doc.add_object(kid)));
    }
    doc.objects.insert(
        status_id,
        Object::Dictionary(dictionary! {
            "FT" => "Btn",
            "Ff" => Object::Integer(RADIO),
            "T" => Object::string_literal("status"),
            "Kids" => options.clone(),
        }),
    );

    let subform_id = doc.new_object_id();
    let page1_id = doc.new_object_id();
    let mut line = widget(page_id);
    line.set("FT", "Tx");
    line.set("T", Object::string_literal("f1_01[0]"));
    line.set("Parent", page1_id);
    let line_id = doc.add_object(line);
    doc.objects.insert(
        page1_id,
        Object::Dictionary(dictionary! {
            "T" => Object::string_literal("Page1[0]"),
            "Parent" => subform_id,
            "Kids" => vec![Object::Reference(line_id)],
        }),
    );
    doc.objects.insert(
        subform_id,
        Object::Dictionary(dictionary! {
            "T" => Object::string_literal("topmostSubform[0]"),
            "Kids" => vec![Object::Reference(page1_id)],
        }),
    );

    let mut annots = vec![
        Object::Reference(name_id),
        Object::Reference(agree_id),
        Object::Reference(line_id),
    ];
    annots.extend(options);
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
    let form_id = doc.add_object(dictionary! {
        "Fields" => vec![
            Object::Reference(name_id),
            Object::Reference(agree_id),
            Object::Reference(status_id),
            Object::Reference(subform_id),
        ],
        "DA" => Object::string_literal("/Helv 0 Tf 0 g"),
    });
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

fn template(kind: DocumentKind) -> FormTemplate {
    let bytes = template_pdf();
    FormTemplate {
        kind,
        fields: read_namespace(&bytes).unwrap(),
        bytes,
    }
}

fn field_dict<'a>(
    doc: &'a Document,
    name: &str,
) -> &'a Dictionary {
    let field = collect_fields(doc)
        .unwrap()
        .into_iter()
        .find(|field| field.name == name)
        .unwrap_or_else(|| panic!("no field {name}"));
    doc.get_dictionary(field.id).unwrap()
}

fn name_value(
    dict: &Dictionary,
    key: &[u8],
) -> String {
    String::from_utf8(dict.get(key).unwrap().as_name().unwrap().to_vec()).unwrap()
}

fn text_value(dict: &Dictionary) -> String {
    decode_text(dict.get(b"V").unwrap().as_str().unwrap())
}

// =============================================================================
// Namespace
// =============================================================================

#[test]
fn namespace_uses_fully_qualified_names() {
    let namespace = read_namespace(&template_pdf()).unwrap();

    assert_eq!(
        namespace,
        TemplateNamespace::from([
            ("agree".to_string(), FieldKind::Checkbox),
            ("name".to_string(), FieldKind::Text),
            ("status".to_string(), FieldKind::Radio),
            ("topmostSubform[0].Page1[0].f1_01[0]".to_string(), FieldKind::Text),
        ])
    );
}

// =============================================================================
// Filling
// =============================================================================

#[test]
fn fill_writes_every_kind() {
    let values = FieldValues::from([
        ("name".to_string(), FieldValue::text("Priya Sharma")),
        ("agree".to_string(), FieldValue::Checkbox(true)),
        ("status".to_string(), FieldValue::Radio("married".to_string())),
        (
            "topmostSubform[0].Page1[0].f1_01[0]".to_string(),
            FieldValue::text("18370"),
        ),
    ]);

    let rendered = LopdfRenderer::new()
        .fill(&template(DocumentKind::F8843), &values)
        .unwrap();

    assert_eq!(rendered.page_count, 1);
    let doc = Document::load_mem(&rendered.bytes).unwrap();
    assert_eq!(text_value(field_dict(&doc, "name")), "Priya Sharma");
    assert_eq!(
        text_value(field_dict(&doc, "topmostSubform[0].Page1[0].f1_01[0]")),
        "18370"
    );

    let agree = field_dict(&doc, "agree");
    assert_eq!(name_value(agree, b"V"), "Yes");
    assert_eq!(name_value(agree, b"AS"), "Yes");

    let status = field_dict(&doc, "status");
    assert_eq!(name_value(status, b"V"), "married");
    let states: Vec<String> = status
        .get(b"Kids")
        .unwrap()
        .as_array()
        .unwrap()
        .iter()
        .map(|kid| name_value(doc.get_dictionary(kid.as_reference().unwrap()).unwrap(), b"AS"))
        .collect();
    assert_eq!(states, vec!["Off", "married"]);
}

#[test]
fn fill_skips_values_of_the_wrong_kind() {
    let values = FieldValues::from([
        ("name".to_string(), FieldValue::Checkbox(true)),
        ("agree".to_string(), FieldValue::Checkbox(false)),
    ]);

    let rendered = LopdfRenderer::new()
        .fill(&template(DocumentKind::F8843), &values)
        .unwrap();

    let doc = Document::load_mem(&rendered.bytes).unwrap();
    assert!(field_dict(&doc, "name").get(b"V").is_err());
    assert_eq!(name_value(field_dict(&doc, "agree"), b"V"), "Off");
}

#[test]
fn malformed_template_is_a_fill_error() {
    let broken = FormTemplate {
        kind: DocumentKind::Il1040,
        fields: TemplateNamespace::new(),
        bytes: b"not a pdf".to_vec(),
    };

    let err = LopdfRenderer::new()
        .fill(&broken, &FieldValues::new())
        .unwrap_err();

    assert!(err.to_string().starts_with("il-1040: "), "{err}");
}

// =============================================================================
// Merging
// =============================================================================

#[test]
fn merge_keeps_pages_and_separates_field_names() {
    let renderer = LopdfRenderer::new();
    let values = FieldValues::from([("name".to_string(), FieldValue::text("Priya Sharma"))]);
    let first = renderer.fill(&template(DocumentKind::F843), &values).unwrap();
    let second = renderer.fill(&template(DocumentKind::F843), &FieldValues::new()).unwrap();
    let sheet = renderer
        .text_page("Instructions", &["Sign both forms.".to_string()])
        .unwrap();

    let merged = renderer.merge(vec![sheet, first, second]).unwrap();

    assert_eq!(merged.page_count, 3);
    let doc = Document::load_mem(&merged.bytes).unwrap();
    assert_eq!(doc.get_pages().len(), 3);
    let names: Vec<String> = collect_fields(&doc)
        .unwrap()
        .into_iter()
        .map(|field| field.name)
        .filter(|name| name.ends_with("name"))
        .collect();
    assert_eq!(names, vec!["d2_name", "d3_name"]);
    assert_eq!(text_value(field_dict(&doc, "d2_name")), "Priya Sharma");
}

#[test]
fn merging_nothing_is_an_error() {
    assert!(LopdfRenderer::new().merge(Vec::new()).is_err());
}

// =============================================================================
// Directory store
// =============================================================================

#[tokio::test]
async fn directory_store_reads_template_and_namespace() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("f8843.pdf"), template_pdf()).unwrap();
    let store = DirectoryTemplateStore::new(dir.path());

    let template = store.load(DocumentKind::F8843).await.unwrap();

    assert_eq!(template.kind, DocumentKind::F8843);
    assert_eq!(template.fields.len(), 4);
    assert_eq!(template.fields.get("status"), Some(&FieldKind::Radio));
}

#[tokio::test]
async fn directory_store_reports_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let store = DirectoryTemplateStore::new(dir.path());

    let err = store.load(DocumentKind::F1040Nr).await.unwrap_err();

    match err {
        TemplateError::NotFound { kind, path } => {
            assert_eq!(kind, DocumentKind::F1040Nr);
            assert_eq!(path, dir.path().join("f1040nr.pdf"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn directory_store_rejects_garbage() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("il1040.pdf"), b"garbage").unwrap();
    let store = DirectoryTemplateStore::new(dir.path());

    let err = store.load(DocumentKind::Il1040).await.unwrap_err();

    assert!(matches!(err, TemplateError::Malformed { .. }));
}
