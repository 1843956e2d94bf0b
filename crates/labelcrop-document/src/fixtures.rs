// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-memory PDF builders for tests and benches.

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};

/// US Letter, the size most label exports come in.
const LETTER: (f32, f32) = (612.0, 792.0);

/// One page of a fixture document.
#[derive(Debug, Clone)]
pub struct FixturePage {
    pub width: f32,
    pub height: f32,
    /// Content stream operations; `F1` is Helvetica. Empty means no
    /// `/Contents` at all.
    pub content: Vec<Operation>,
}

impl FixturePage {
    pub fn sized(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            content: Vec::new(),
        }
    }

    /// A single line of Helvetica text near the top-left corner.
    pub fn with_text(self, text: &str) -> Self {
        self.with_fragments(&[text])
    }

    /// Several strings in one text object, each shown with its own `Tj` and
    /// moved right of the previous one, the way table cells are laid out.
    pub fn with_fragments(self, fragments: &[&str]) -> Self {
        let mut operations = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), Object::Integer(12)]),
            Operation::new(
                "Td",
                vec![Object::Real(36.0), Object::Real(self.height - 48.0)],
            ),
        ];
        for (index, fragment) in fragments.iter().enumerate() {
            if index > 0 {
                operations.push(Operation::new(
                    "Td",
                    vec![Object::Real(120.0), Object::Real(0.0)],
                ));
            }
            operations.push(Operation::new("Tj", vec![Object::string_literal(*fragment)]));
        }
        operations.push(Operation::new("ET", vec![]));
        self.with_content(operations)
    }

    /// Raw content stream operations.
    pub fn with_content(mut self, operations: Vec<Operation>) -> Self {
        self.content = operations;
        self
    }
}

/// A document with the given pages, each carrying its own media box.
pub fn pdf_with_pages(pages: &[FixturePage]) -> Vec<u8> {
    build(pages, None)
}

/// `count` empty Letter pages.
pub fn blank_pdf(count: usize) -> Vec<u8> {
    pdf_with_pages(&vec![FixturePage::sized(LETTER.0, LETTER.1); count])
}

/// Letter pages with one line of text each.
pub fn pdf_with_texts(texts: &[&str]) -> Vec<u8> {
    let pages: Vec<FixturePage> = texts
        .iter()
        .map(|text| FixturePage::sized(LETTER.0, LETTER.1).with_text(text))
        .collect();
    pdf_with_pages(&pages)
}

/// `count` empty pages whose media box lives only on the `/Pages` node.
pub fn pdf_with_inherited_media_box(count: usize, width: f32, height: f32) -> Vec<u8> {
    build(
        &vec![FixturePage::sized(width, height); count],
        Some((width, height)),
    )
}

fn build(pages: &[FixturePage], inherited_size: Option<(f32, f32)>) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let pages_id = doc.new_object_id();

    let kids: Vec<Object> = pages
        .iter()
        .map(|page| {
            let page_id = add_page(&mut doc, page, pages_id, font_id, inherited_size.is_none());
            Object::Reference(page_id)
        })
        .collect();

    let mut pages_dict = dictionary! {
        "Type" => "Pages",
        "Count" => Object::Integer(kids.len() as i64),
        "Kids" => kids,
    };
    if let Some((width, height)) = inherited_size {
        pages_dict.set("MediaBox", media_box(width, height));
    }
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buf = Vec::new();
    doc.save_to(&mut buf).expect("fixture PDF serializes");
    buf
}

fn add_page(
    doc: &mut Document,
    page: &FixturePage,
    pages_id: ObjectId,
    font_id: ObjectId,
    own_media_box: bool,
) -> ObjectId {
    let mut page_dict = dictionary! {
        "Type" => "Page",
        "Parent" => Object::Reference(pages_id),
        "Resources" => dictionary! {
            "Font" => dictionary! { "F1" => Object::Reference(font_id) },
        },
    };
    if own_media_box {
        page_dict.set("MediaBox", media_box(page.width, page.height));
    }
    if !page.content.is_empty() {
        let content = Content {
            operations: page.content.clone(),
        };
        let data = content.encode().expect("fixture content encodes");
        let content_id = doc.add_object(Stream::new(Dictionary::new(), data));
        page_dict.set("Contents", Object::Reference(content_id));
    }
    doc.add_object(page_dict)
}

fn media_box(width: f32, height: f32) -> Object {
    Object::Array(vec![
        Object::Integer(0),
        Object::Integer(0),
        Object::Real(width),
        Object::Real(height),
    ])
}
