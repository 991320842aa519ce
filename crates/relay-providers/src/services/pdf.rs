//! PDF rendering with lopdf
//!
//! Generated documents use the standard Helvetica font and are paginated on
//! US Letter pages. Stamped text uses Courier-Bold. Both fonts are limited
//! to WinAnsi characters; anything outside that set is dropped.

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat, dictionary};
use relay_domain::error::{Error, Result};
use relay_domain::ports::DocumentRenderer;

use crate::constants::{
    BODY_FONT_SIZE, BODY_LINE_HEIGHT, BODY_WRAP_COLUMNS, PAGE_MARGIN, PAGE_SIZE, STAMP_COLOR,
    STAMP_FONT_SIZE, STAMP_POSITION,
};

/// Resource name of the stamp font added to edited pages
const STAMP_FONT_RESOURCE: &str = "RelayStampF1";

/// Maximum depth followed when resolving inherited page resources
const MAX_INHERITANCE_DEPTH: usize = 32;

/// [`DocumentRenderer`] backed by lopdf
#[derive(Debug, Default, Clone, Copy)]
pub struct LopdfRenderer;

impl LopdfRenderer {
    /// Create a renderer
    pub fn new() -> Self {
        Self
    }
}

fn pdf_error(context: &str, err: lopdf::Error) -> Error {
    Error::Infrastructure {
        message: format!("{context}: {err}"),
        source: Some(Box::new(err)),
    }
}

fn literal(text: &str) -> Object {
    Object::String(encode_win_ansi(text), StringFormat::Literal)
}

/// Encode text for a WinAnsi standard font, dropping unsupported characters
fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .filter_map(|ch| match ch {
            '\t' => Some(b' '),
            ch if ch.is_control() => None,
            ch => u8::try_from(u32::from(ch)).ok(),
        })
        .collect()
}

/// Hard-wrap text at word boundaries
fn wrap_lines(text: &str, columns: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for raw in text.lines() {
        let mut current = String::new();
        for word in raw.split_whitespace() {
            let needed = if current.is_empty() {
                word.chars().count()
            } else {
                current.chars().count() + 1 + word.chars().count()
            };
            if needed > columns && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
        lines.push(current);
    }
    lines
}

fn encode_content(operations: Vec<Operation>) -> Result<Vec<u8>> {
    Content { operations }
        .encode()
        .map_err(|e| pdf_error("Failed to encode page content", e))
}

fn save(doc: &mut Document) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| Error::Io {
            message: format!("Failed to write PDF: {e}"),
            source: Some(Box::new(e)),
        })?;
    Ok(buffer)
}

/// Resolve a dictionary that may be given inline or by reference
fn deref_dict(doc: &Document, object: &Object) -> Result<Dictionary> {
    match object {
        Object::Reference(id) => doc
            .get_object(*id)
            .and_then(Object::as_dict)
            .cloned()
            .map_err(|e| pdf_error("Invalid resource reference", e)),
        Object::Dictionary(dict) => Ok(dict.clone()),
        _ => Ok(Dictionary::new()),
    }
}

/// Resources in effect for a page, following `Parent` inheritance
fn effective_resources(doc: &Document, page_id: ObjectId) -> Result<Dictionary> {
    let mut current = page_id;
    for _ in 0..MAX_INHERITANCE_DEPTH {
        let node = doc
            .get_object(current)
            .and_then(Object::as_dict)
            .map_err(|e| pdf_error("Invalid page tree", e))?;
        if let Ok(resources) = node.get(b"Resources") {
            return deref_dict(doc, resources);
        }
        match node.get(b"Parent") {
            Ok(Object::Reference(parent)) => current = *parent,
            _ => break,
        }
    }
    Ok(Dictionary::new())
}

/// Existing content stream references of a page
fn page_contents(doc: &Document, page_id: ObjectId) -> Result<Vec<Object>> {
    let page = doc
        .get_object(page_id)
        .and_then(Object::as_dict)
        .map_err(|e| pdf_error("Invalid page", e))?;
    Ok(match page.get(b"Contents") {
        Ok(Object::Reference(id)) => match doc.get_object(*id) {
            Ok(Object::Array(items)) => items.clone(),
            _ => vec![Object::Reference(*id)],
        },
        Ok(Object::Array(items)) => items.clone(),
        _ => Vec::new(),
    })
}

impl DocumentRenderer for LopdfRenderer {
    fn render_text(&self, text: &str) -> Result<Vec<u8>> {
        let (width, height) = PAGE_SIZE;
        let mut doc = Document::with_version("1.5");
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

        let lines = wrap_lines(text, BODY_WRAP_COLUMNS);
        let per_page = usize::try_from((height - 2 * PAGE_MARGIN) / BODY_LINE_HEIGHT)
            .unwrap_or(1)
            .max(1);
        let mut kids = Vec::new();
        for chunk in lines.chunks(per_page) {
            let mut operations = vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), BODY_FONT_SIZE.into()]),
                Operation::new("TL", vec![BODY_LINE_HEIGHT.into()]),
                Operation::new("Td", vec![PAGE_MARGIN.into(), (height - PAGE_MARGIN).into()]),
            ];
            for line in chunk {
                operations.push(Operation::new("Tj", vec![literal(line)]));
                operations.push(Operation::new("T*", vec![]));
            }
            operations.push(Operation::new("ET", vec![]));

            let content_id = doc.add_object(Stream::new(dictionary! {}, encode_content(operations)?));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(Object::Reference(page_id));
        }

        let count = i64::try_from(kids.len()).unwrap_or(i64::MAX);
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), width.into(), height.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        save(&mut doc)
    }

    fn stamp_text(&self, document: &[u8], text: &str) -> Result<Vec<u8>> {
        let mut doc = Document::load_mem(document)
            .map_err(|e| Error::invalid_argument(format!("Not a readable PDF document: {e}")))?;
        let page_id = doc
            .get_pages()
            .values()
            .next()
            .copied()
            .ok_or_else(|| Error::invalid_argument("PDF document has no pages"))?;

        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier-Bold",
            "Encoding" => "WinAnsiEncoding",
        });
        let mut resources = effective_resources(&doc, page_id)?;
        let mut fonts = match resources.get(b"Font") {
            Ok(fonts) => deref_dict(&doc, fonts)?,
            Err(_) => Dictionary::new(),
        };
        fonts.set(STAMP_FONT_RESOURCE, font_id);
        resources.set("Font", fonts);

        let (x, y) = STAMP_POSITION;
        let (r, g, b) = STAMP_COLOR;
        let save_state = doc.add_object(Stream::new(
            dictionary! {},
            encode_content(vec![Operation::new("q", vec![])])?,
        ));
        let stamp = doc.add_object(Stream::new(
            dictionary! {},
            encode_content(vec![
                Operation::new("Q", vec![]),
                Operation::new("q", vec![]),
                Operation::new("BT", vec![]),
                Operation::new("rg", vec![r.into(), g.into(), b.into()]),
                Operation::new("Tf", vec![STAMP_FONT_RESOURCE.into(), STAMP_FONT_SIZE.into()]),
                Operation::new("Td", vec![x.into(), y.into()]),
                Operation::new("Tj", vec![literal(text)]),
                Operation::new("ET", vec![]),
                Operation::new("Q", vec![]),
            ])?,
        ));

        let mut contents = vec![Object::Reference(save_state)];
        contents.extend(page_contents(&doc, page_id)?);
        contents.push(Object::Reference(stamp));

        let page = doc
            .get_object_mut(page_id)
            .and_then(Object::as_dict_mut)
            .map_err(|e| pdf_error("Invalid page", e))?;
        page.set("Resources", resources);
        page.set("Contents", contents);

        save(&mut doc)
    }
}
