//! AcroForm field discovery and filling.
//!
//! Fields are addressed by their fully qualified name: the partial names
//! (`/T`) from the root field down, joined with `.`. A node whose kids carry
//! no `/T` is terminal; its kids, or the node itself, are the widgets.

use lopdf::{Dictionary, Document, Object, ObjectId, StringFormat};
use tax_forms::{FieldKind, FieldValue, FieldValues, TemplateNamespace};

const FLAG_RADIO: i64 = 1 << 15;
const FLAG_PUSHBUTTON: i64 = 1 << 16;
const OFF: &[u8] = b"Off";

/// A terminal field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: String,
    pub id: ObjectId,
    pub kind: FieldKind,
}

fn resolve<'a>(
    doc: &'a Document,
    object: &'a Object,
) -> lopdf::Result<&'a Object> {
    match object {
        Object::Reference(id) => doc.get_object(*id),
        other => Ok(other),
    }
}

fn acroform(doc: &Document) -> lopdf::Result<Option<&Dictionary>> {
    match doc.catalog()?.get(b"AcroForm") {
        Ok(object) => resolve(doc, object)?.as_dict().map(Some),
        Err(_) => Ok(None),
    }
}

/// References in the AcroForm `/Fields` array.
pub fn root_fields(doc: &Document) -> lopdf::Result<Vec<ObjectId>> {
    let Some(form) = acroform(doc)? else {
        return Ok(Vec::new());
    };
    let Ok(fields) = form.get(b"Fields") else {
        return Ok(Vec::new());
    };
    resolve(doc, fields)?
        .as_array()?
        .iter()
        .map(Object::as_reference)
        .collect()
}

pub fn collect_fields(doc: &Document) -> lopdf::Result<Vec<FormField>> {
    let mut fields = Vec::new();
    for id in root_fields(doc)? {
        walk(doc, id, None, None, 0, &mut fields)?;
    }
    Ok(fields)
}

/// The field namespace of a PDF template.
pub fn read_namespace(bytes: &[u8]) -> lopdf::Result<TemplateNamespace> {
    let doc = Document::load_mem(bytes)?;
    Ok(collect_fields(&doc)?
        .into_iter()
        .map(|field| (field.name, field.kind))
        .collect())
}

fn kid_ids(dict: &Dictionary) -> Vec<ObjectId> {
    dict.get(b"Kids")
        .and_then(Object::as_array)
        .map(|kids| kids.iter().filter_map(|kid| kid.as_reference().ok()).collect())
        .unwrap_or_default()
}

fn walk(
    doc: &Document,
    id: ObjectId,
    parent_name: Option<&str>,
    inherited_type: Option<&[u8]>,
    inherited_flags: i64,
    out: &mut Vec<FormField>,
) -> lopdf::Result<()> {
    let dict = doc.get_dictionary(id)?;
    let Some(partial) = dict.get(b"T").and_then(Object::as_str).ok().map(decode_text) else {
        return Ok(());
    };
    let name = match parent_name {
        Some(parent) => format!("{parent}.{partial}"),
        None => partial,
    };
    let field_type = dict
        .get(b"FT")
        .and_then(Object::as_name)
        .ok()
        .or(inherited_type);
    let flags = dict
        .get(b"Ff")
        .and_then(Object::as_i64)
        .unwrap_or(inherited_flags);

    let named_kids: Vec<ObjectId> = kid_ids(dict)
        .into_iter()
        .filter(|kid| doc.get_dictionary(*kid).is_ok_and(|kid| kid.has(b"T")))
        .collect();

    if named_kids.is_empty() {
        if let Some(kind) = field_kind(field_type, flags) {
            out.push(FormField { name, id, kind });
        }
        return Ok(());
    }
    for kid in named_kids {
        walk(doc, kid, Some(&name), field_type, flags, out)?;
    }
    Ok(())
}

fn field_kind(
    field_type: Option<&[u8]>,
    flags: i64,
) -> Option<FieldKind> {
    match field_type? {
        b"Tx" | b"Ch" => Some(FieldKind::Text),
        b"Btn" if flags & FLAG_PUSHBUTTON != 0 => None,
        b"Btn" if flags & FLAG_RADIO != 0 => Some(FieldKind::Radio),
        b"Btn" => Some(FieldKind::Checkbox),
        _ => None,
    }
}

/// Widget annotations of a terminal field.
fn widget_ids(
    doc: &Document,
    field: ObjectId,
) -> lopdf::Result<Vec<ObjectId>> {
    let kids = kid_ids(doc.get_dictionary(field)?);
    Ok(if kids.is_empty() { vec![field] } else { kids })
}

/// Names of the normal appearance states a widget declares, `Off` excluded.
fn on_states(
    doc: &Document,
    widget: ObjectId,
) -> Vec<Vec<u8>> {
    let states = doc
        .get_dictionary(widget)
        .and_then(|dict| dict.get(b"AP"))
        .and_then(|ap| resolve(doc, ap))
        .and_then(Object::as_dict)
        .and_then(|ap| ap.get(b"N"))
        .and_then(|normal| resolve(doc, normal))
        .and_then(Object::as_dict);
    match states {
        Ok(states) => states
            .iter()
            .map(|(name, _)| name.clone())
            .filter(|name| name != OFF)
            .collect(),
        Err(_) => Vec::new(),
    }
}

/// Writes every value whose field exists with a matching kind. Returns the
/// number of fields written.
pub fn fill_fields(
    doc: &mut Document,
    values: &FieldValues,
) -> lopdf::Result<usize> {
    let mut written = 0;
    for field in collect_fields(doc)? {
        let Some(value) = values.get(&field.name) else {
            continue;
        };
        if value.kind() != field.kind {
            continue;
        }
        match value {
            FieldValue::Text(text) => {
                doc.get_dictionary_mut(field.id)?.set("V", pdf_text(text));
            }
            FieldValue::Checkbox(checked) => set_checkbox(doc, field.id, *checked)?,
            FieldValue::Radio(option) => set_radio(doc, field.id, option)?,
        }
        written += 1;
    }
    set_need_appearances(doc)?;
    Ok(written)
}

fn set_checkbox(
    doc: &mut Document,
    field: ObjectId,
    checked: bool,
) -> lopdf::Result<()> {
    let mut value = OFF.to_vec();
    for widget in widget_ids(doc, field)? {
        let state = if checked {
            on_states(doc, widget)
                .into_iter()
                .next()
                .unwrap_or_else(|| b"Yes".to_vec())
        } else {
            OFF.to_vec()
        };
        value = state.clone();
        doc.get_dictionary_mut(widget)?.set("AS", Object::Name(state));
    }
    doc.get_dictionary_mut(field)?.set("V", Object::Name(value));
    Ok(())
}

fn set_radio(
    doc: &mut Document,
    field: ObjectId,
    option: &str,
) -> lopdf::Result<()> {
    let option = option.as_bytes();
    let mut selected = false;
    for widget in widget_ids(doc, field)? {
        let matches = !option.is_empty()
            && on_states(doc, widget)
                .iter()
                .any(|state| state.as_slice() == option);
        selected |= matches;
        let state = if matches { option.to_vec() } else { OFF.to_vec() };
        doc.get_dictionary_mut(widget)?.set("AS", Object::Name(state));
    }
    let value = if selected { option.to_vec() } else { OFF.to_vec() };
    doc.get_dictionary_mut(field)?.set("V", Object::Name(value));
    Ok(())
}

/// Asks viewers to regenerate field appearances from the new values.
pub fn set_need_appearances(doc: &mut Document) -> lopdf::Result<()> {
    let root = doc.trailer.get(b"Root")?.as_reference()?;
    let form_ref = match doc.get_dictionary(root)?.get(b"AcroForm") {
        Ok(Object::Reference(id)) => Some(*id),
        Ok(_) => None,
        Err(_) => return Ok(()),
    };
    let form = match form_ref {
        Some(id) => doc.get_dictionary_mut(id)?,
        None => doc
            .get_dictionary_mut(root)?
            .get_mut(b"AcroForm")?
            .as_dict_mut()?,
    };
    form.set("NeedAppearances", Object::Boolean(true));
    Ok(())
}

/// A PDF text string: literal for ASCII, UTF-16BE with a byte order mark
/// otherwise.
pub fn pdf_text(text: &str) -> Object {
    if text.is_ascii() {
        return Object::string_literal(text);
    }
    let mut bytes = vec![0xFE, 0xFF];
    bytes.extend(text.encode_utf16().flat_map(u16::to_be_bytes));
    Object::String(bytes, StringFormat::Hexadecimal)
}

pub fn decode_text(bytes: &[u8]) -> String {
    match bytes {
        [0xFE, 0xFF, rest @ ..] => {
            let units: Vec<u16> = rest
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16_lossy(&units)
        }
        _ => bytes.iter().map(|&byte| char::from(byte)).collect(),
    }
}
