//! Plain text pages in Helvetica on US Letter paper.

use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};

pub const LINES_PER_PAGE: usize = 46;

const PAGE_WIDTH: i64 = 612;
const PAGE_HEIGHT: i64 = 792;
const MARGIN: i64 = 56;
const TITLE_SIZE: i64 = 14;
const BODY_SIZE: i64 = 10;
const LEADING: i64 = 14;

/// WinAnsi bytes for `text`; characters outside Latin-1 become `?`.
fn latin1(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}

fn page_operations(
    title: &str,
    lines: &[String],
) -> Vec<Operation> {
    let mut ops = vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), TITLE_SIZE.into()]),
        Operation::new("Td", vec![MARGIN.into(), (PAGE_HEIGHT - MARGIN).into()]),
        Operation::new("Tj", vec![Object::string_literal(latin1(title))]),
        Operation::new("Tf", vec!["F1".into(), BODY_SIZE.into()]),
        Operation::new("TL", vec![LEADING.into()]),
        Operation::new("T*", vec![]),
        Operation::new("T*", vec![]),
    ];
    for line in lines {
        ops.push(Operation::new("Tj", vec![Object::string_literal(latin1(line))]));
        ops.push(Operation::new("T*", vec![]));
    }
    ops.push(Operation::new("ET", vec![]));
    ops
}

/// A document holding `lines` under `title`, continued onto as many pages as
/// needed. Returns the saved bytes and the page count.
pub fn text_document(
    title: &str,
    lines: &[String],
) -> lopdf::Result<(Vec<u8>, usize)> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let chunks: Vec<&[String]> = if lines.is_empty() {
        vec![lines]
    } else {
        lines.chunks(LINES_PER_PAGE).collect()
    };

    let mut kids = Vec::with_capacity(chunks.len());
    for (index, chunk) in chunks.iter().enumerate() {
        let heading = if index == 0 {
            title.to_string()
        } else {
            format!("{title} (continued)")
        };
        let content = Content {
            operations: page_operations(&heading, chunk),
        };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(PAGE_WIDTH),
                Object::Integer(PAGE_HEIGHT),
            ],
        });
        kids.push(Object::Reference(page_id));
    }

    let page_count = kids.len();
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => Object::Integer(page_count as i64),
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)?;
    Ok((bytes, page_count))
}
