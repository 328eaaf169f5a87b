//! Concatenates documents into one, keeping every page and every form field.
//!
//! Objects of each part are renumbered past the previous part and copied
//! across. Pages are re-parented under a single page tree. Root field names
//! get a per-part prefix (`d1_`, `d2_`, ...) so that two copies of the same
//! form keep separate values.

use lopdf::{Dictionary, Document, Object, ObjectId, dictionary};

use crate::acroform;

const INHERITABLE: [&[u8]; 4] = [b"MediaBox", b"Resources", b"CropBox", b"Rotate"];
const MAX_TREE_DEPTH: usize = 32;

/// Merges `parts` in order. Returns the saved bytes and the page count.
pub fn merge_documents<I>(parts: I) -> lopdf::Result<(Vec<u8>, usize)>
where
    I: IntoIterator<Item = Vec<u8>>,
{
    let mut merged = Document::with_version("1.7");
    let pages_id = merged.new_object_id();
    let mut kids: Vec<ObjectId> = Vec::new();
    let mut fields: Vec<ObjectId> = Vec::new();
    let mut form_defaults: Option<Dictionary> = None;

    for (index, bytes) in parts.into_iter().enumerate() {
        let mut part = Document::load_mem(&bytes)?;
        part.renumber_objects_with(merged.max_id + 1);
        if let Some(&(last, _)) = part.objects.keys().next_back() {
            merged.max_id = merged.max_id.max(last);
        }

        let page_ids: Vec<ObjectId> = part.get_pages().into_values().collect();
        for page_id in &page_ids {
            inherit_page_attributes(&mut part, *page_id)?;
        }

        let roots = acroform::root_fields(&part)?;
        for root in &roots {
            prefix_field_name(&mut part, *root, index)?;
        }
        if form_defaults.is_none() {
            form_defaults = form_resources(&part);
        }

        merged.objects.extend(part.objects);
        for page_id in &page_ids {
            merged.get_dictionary_mut(*page_id)?.set("Parent", pages_id);
        }
        kids.extend(page_ids);
        fields.extend(roots);
    }

    let page_count = kids.len();
    merged.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids.into_iter().map(Object::Reference).collect::<Vec<_>>(),
            "Count" => Object::Integer(page_count as i64),
        }),
    );

    let mut catalog = dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    };
    if !fields.is_empty() {
        let mut form = form_defaults.unwrap_or_default();
        form.set(
            "Fields",
            fields.into_iter().map(Object::Reference).collect::<Vec<_>>(),
        );
        form.set("NeedAppearances", Object::Boolean(true));
        catalog.set("AcroForm", merged.add_object(form));
    }
    let catalog_id = merged.add_object(catalog);
    merged.trailer.set("Root", catalog_id);
    merged.prune_objects();

    let mut bytes = Vec::new();
    merged.save_to(&mut bytes)?;
    Ok((bytes, page_count))
}

/// Copies attributes a page inherits from its ancestors onto the page, since
/// its ancestors are dropped.
fn inherit_page_attributes(
    doc: &mut Document,
    page_id: ObjectId,
) -> lopdf::Result<()> {
    for key in INHERITABLE {
        if doc.get_dictionary(page_id)?.has(key) {
            continue;
        }
        if let Some(value) = inherited(doc, page_id, key) {
            doc.get_dictionary_mut(page_id)?.set(key.to_vec(), value);
        }
    }
    Ok(())
}

fn inherited(
    doc: &Document,
    page_id: ObjectId,
    key: &[u8],
) -> Option<Object> {
    let mut node = doc.get_dictionary(page_id).ok()?;
    for _ in 0..MAX_TREE_DEPTH {
        let parent = node.get(b"Parent").and_then(Object::as_reference).ok()?;
        node = doc.get_dictionary(parent).ok()?;
        if let Ok(value) = node.get(key) {
            return Some(value.clone());
        }
    }
    None
}

fn prefix_field_name(
    doc: &mut Document,
    field: ObjectId,
    index: usize,
) -> lopdf::Result<()> {
    let dict = doc.get_dictionary_mut(field)?;
    let Ok(name) = dict.get(b"T").and_then(Object::as_str) else {
        return Ok(());
    };
    let prefixed = format!("d{}_{}", index + 1, acroform::decode_text(name));
    dict.set("T", acroform::pdf_text(&prefixed));
    Ok(())
}

/// Default appearance and resources of a part's AcroForm, reused for the
/// merged form.
fn form_resources(doc: &Document) -> Option<Dictionary> {
    let catalog = doc.catalog().ok()?;
    let form = match catalog.get(b"AcroForm").ok()? {
        Object::Reference(id) => doc.get_dictionary(*id).ok()?,
        Object::Dictionary(dict) => dict,
        _ => return None,
    };
    let mut defaults = Dictionary::new();
    for key in [b"DA".as_slice(), b"DR".as_slice()] {
        if let Ok(value) = form.get(key) {
            defaults.set(key.to_vec(), value.clone());
        }
    }
    (!defaults.is_empty()).then_some(defaults)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::text::text_document;

    #[test]
    fn merges_pages_in_order() {
        let (first, _) = text_document("First", &["a".to_string()]).unwrap();
        let lines: Vec<String> = (0..60).map(|n| n.to_string()).collect();
        let (second, _) = text_document("Second", &lines).unwrap();

        let (bytes, pages) = merge_documents([first, second]).unwrap();

        assert_eq!(pages, 3);
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 3);
        assert!(doc.catalog().unwrap().get(b"AcroForm").is_err());
    }

    #[test]
    fn pages_keep_inherited_media_box() {
        let (bytes, _) = text_document("Only", &[]).unwrap();

        let (merged, _) = merge_documents([bytes]).unwrap();

        let doc = Document::load_mem(&merged).unwrap();
        let page = doc.get_pages().into_values().next().unwrap();
        assert!(doc.get_dictionary(page).unwrap().has(b"MediaBox"));
    }
}
