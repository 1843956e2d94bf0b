// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text stamping onto existing pages.
//
// The page's own content is wrapped in `q ... Q` so whatever graphics state it
// leaves behind (transforms, colours) cannot move or hide the stamp. The stamp
// goes in its own content stream appended after the original ones.

use labelcrop_core::config::StampStyle;
use labelcrop_core::error::{LabelcropError, Result};
use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, dictionary};

use super::copy::resolve;
use super::geometry::{page_dict, page_dict_mut};

/// Resource name the stamp font is registered under on every stamped page.
pub const STAMP_FONT_NAME: &str = "LcStampF1";

/// Add a non-embedded standard 14 font (e.g. Helvetica) and return its id.
pub(crate) fn add_standard_font(document: &mut Document, base_font: &str) -> ObjectId {
    document.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => Object::Name(base_font.as_bytes().to_vec()),
        "Encoding" => "WinAnsiEncoding",
    })
}

/// Draw `text` with its baseline starting at `position` (user space), black
/// fill, in the font `font_id`.
pub(crate) fn draw_text(
    document: &mut Document,
    page_id: ObjectId,
    font_id: ObjectId,
    position: (f32, f32),
    text: &str,
    style: &StampStyle,
) -> Result<()> {
    let resources = resources_with_font(document, page_id, font_id)?;
    let existing = existing_contents(document, page_id)?;

    let save_state = Content {
        operations: vec![Operation::new("q", vec![])],
    };
    let stamp = Content {
        operations: vec![
            Operation::new("Q", vec![]),
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![
                    Object::Name(STAMP_FONT_NAME.as_bytes().to_vec()),
                    Object::Real(style.font_size),
                ],
            ),
            Operation::new(
                "rg",
                vec![Object::Real(0.0), Object::Real(0.0), Object::Real(0.0)],
            ),
            Operation::new("Td", vec![Object::Real(position.0), Object::Real(position.1)]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ],
    };

    let mut save_data = encode(&save_state)?;
    save_data.push(b'\n');
    let save_id = document.add_object(Stream::new(Dictionary::new(), save_data));
    // Leading newline: the preceding stream may end mid-token.
    let mut stamp_data = b"\n".to_vec();
    stamp_data.extend(encode(&stamp)?);
    let stamp_id = document.add_object(Stream::new(Dictionary::new(), stamp_data));

    let mut contents = Vec::with_capacity(existing.len() + 2);
    contents.push(Object::Reference(save_id));
    contents.extend(existing);
    contents.push(Object::Reference(stamp_id));

    let page = page_dict_mut(document, page_id)?;
    page.set("Resources", Object::Dictionary(resources));
    page.set("Contents", Object::Array(contents));
    Ok(())
}

fn encode(content: &Content) -> Result<Vec<u8>> {
    content.encode().map_err(|err| {
        LabelcropError::SerializationFailure(format!("cannot encode stamp content: {}", err))
    })
}

/// The page's resources as an inline dictionary with the stamp font added.
///
/// Shared resource dictionaries are copied rather than edited so other pages
/// are not touched.
fn resources_with_font(document: &Document, page_id: ObjectId, font_id: ObjectId) -> Result<Dictionary> {
    let page = page_dict(document, page_id)?;
    let mut resources = match page.get(b"Resources") {
        Ok(value) => resolve(document, value)?
            .as_dict()
            .cloned()
            .map_err(|err| {
                LabelcropError::MalformedDocument(format!("page {:?} /Resources: {}", page_id, err))
            })?,
        Err(_) => Dictionary::new(),
    };

    let mut fonts = match resources.get(b"Font") {
        Ok(value) => resolve(document, value)?
            .as_dict()
            .cloned()
            .map_err(|err| {
                LabelcropError::MalformedDocument(format!("page {:?} /Font: {}", page_id, err))
            })?,
        Err(_) => Dictionary::new(),
    };
    fonts.set(STAMP_FONT_NAME, Object::Reference(font_id));
    resources.set("Font", Object::Dictionary(fonts));
    Ok(resources)
}

/// The page's content streams as a list of references.
fn existing_contents(document: &Document, page_id: ObjectId) -> Result<Vec<Object>> {
    let page = page_dict(document, page_id)?;
    Ok(match page.get(b"Contents") {
        Ok(Object::Reference(id)) => match document.get_object(*id) {
            // An indirect array of streams.
            Ok(Object::Array(streams)) => streams.clone(),
            _ => vec![Object::Reference(*id)],
        },
        Ok(Object::Array(streams)) => streams.clone(),
        Ok(Object::Stream(stream)) => {
            // Inline streams are invalid PDF but harmless to carry over.
            vec![Object::Stream(stream.clone())]
        }
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{self, FixturePage};
    use crate::pdf::PageSource;
    use crate::pdf::loader::SourceDocument;
    use crate::pdf::output::OutputDocument;

    fn text_operations(document: &Document, page_id: ObjectId) -> Vec<Operation> {
        let data = document.get_page_content(page_id).expect("page content");
        Content::decode(&data).expect("decode content").operations
    }

    #[test]
    fn stamp_is_drawn_at_offset_from_visible_origin() {
        let bytes = fixtures::pdf_with_pages(&[FixturePage::sized(400.0, 600.0).with_text("hello")]);
        let source = SourceDocument::from_bytes(&bytes).expect("load");
        let mut output = OutputDocument::new();
        output.append_all(&source).expect("append");
        output
            .set_page_box(
                0,
                &labelcrop_core::types::PageBox {
                    x: 50.0,
                    y: 120.0,
                    width: 200.0,
                    height: 300.0,
                },
            )
            .expect("set box");
        output
            .stamp_page(0, "SKU: ABC-123", &StampStyle::default())
            .expect("stamp");

        let page_id = output.page_ids()[0];
        let operations = text_operations(output.document(), page_id);

        let tj = operations
            .iter()
            .rfind(|op| op.operator == "Tj")
            .expect("stamp Tj");
        assert_eq!(tj.operands[0].as_str().expect("string"), b"SKU: ABC-123");

        let td = operations
            .iter()
            .rfind(|op| op.operator == "Td")
            .expect("stamp Td");
        assert_eq!(td.operands[0].as_float().expect("x"), 60.0);
        assert_eq!(td.operands[1].as_float().expect("y"), 130.0);

        // Original content is wrapped so its state cannot leak into the stamp.
        assert_eq!(operations.first().map(|op| op.operator.as_str()), Some("q"));
        let restore = operations
            .iter()
            .position(|op| op.operator == "Q")
            .expect("Q");
        let stamp_bt = operations
            .iter()
            .rposition(|op| op.operator == "BT")
            .expect("BT");
        assert!(restore < stamp_bt);
    }

    #[test]
    fn stamp_font_is_registered_in_page_resources() {
        let bytes = fixtures::pdf_with_pages(&[FixturePage::sized(300.0, 300.0).with_text("x")]);
        let source = SourceDocument::from_bytes(&bytes).expect("load");
        let mut output = OutputDocument::new();
        output.append_all(&source).expect("append");
        output
            .stamp_page(0, "SKU: Z9", &StampStyle::default())
            .expect("stamp");

        let page_id = output.page_ids()[0];
        let page = page_dict(output.document(), page_id).expect("page");
        let resources = page
            .get(b"Resources")
            .and_then(Object::as_dict)
            .expect("inline resources");
        let fonts = resources
            .get(b"Font")
            .and_then(Object::as_dict)
            .expect("fonts");
        assert!(fonts.has(STAMP_FONT_NAME.as_bytes()));
        // The page's own font is still there.
        assert!(fonts.has(b"F1"));
    }

    #[test]
    fn page_without_contents_can_be_stamped() {
        let bytes = fixtures::pdf_with_pages(&[FixturePage::sized(300.0, 300.0)]);
        let source = SourceDocument::from_bytes(&bytes).expect("load");
        let mut output = OutputDocument::new();
        output.append_all(&source).expect("append");
        output
            .stamp_page(0, "SKU: 1", &StampStyle::default())
            .expect("stamp");

        let page_id = output.page_ids()[0];
        let text = output.document().extract_text(&[1]).expect("extract");
        assert!(text.contains("SKU: 1"));
        assert!(!text_operations(output.document(), page_id).is_empty());
    }
}
