// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Read-only text view of a PDF, decoded independently of the page document
// that gets edited.

use std::collections::BTreeMap;

use labelcrop_core::error::{LabelcropError, Result};
use lopdf::content::Content;
use lopdf::{Document, Encoding, Object, ObjectId};
use tracing::{debug, instrument};

/// A `TJ` adjustment below this (thousandths of text space, negative moves
/// right) is a gap between words rather than kerning.
const TJ_WORD_GAP: f32 = -200.0;

/// A PDF decoded only to read the text of its pages.
pub struct TextDocument {
    document: Document,
    page_ids: Vec<ObjectId>,
}

impl TextDocument {
    /// Decode `data`. Any failure is reported as [`LabelcropError::TextLayerUnavailable`].
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn decode(data: &[u8]) -> Result<Self> {
        let document = Document::load_mem(data).map_err(|err| {
            LabelcropError::TextLayerUnavailable(format!("cannot decode text view: {}", err))
        })?;
        let page_ids: Vec<ObjectId> = document.get_pages().into_values().collect();
        debug!(page_count = page_ids.len(), "text view decoded");
        Ok(Self { document, page_ids })
    }

    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// All text of page `index` (zero-based): every shown string is one
    /// fragment, fragments are joined by single spaces in content order.
    ///
    /// A missing page, a failed extraction and a page with no text at all are
    /// each [`LabelcropError::TextLayerUnavailable`].
    pub fn page_text(&self, index: usize) -> Result<String> {
        let page_id = *self.page_ids.get(index).ok_or_else(|| {
            LabelcropError::TextLayerUnavailable(format!(
                "no page {} in text view of {} pages",
                index + 1,
                self.page_count()
            ))
        })?;
        let fragments = self.fragments(page_id).map_err(|err| {
            LabelcropError::TextLayerUnavailable(format!("page {}: {}", index + 1, err))
        })?;

        let text = fragments
            .iter()
            .flat_map(|fragment| fragment.split_whitespace())
            .collect::<Vec<_>>()
            .join(" ");
        if text.is_empty() {
            return Err(LabelcropError::TextLayerUnavailable(format!(
                "page {} has no text layer",
                index + 1
            )));
        }
        Ok(text)
    }

    /// Shown strings of one page, decoded through the current font's encoding.
    fn fragments(&self, page_id: ObjectId) -> lopdf::Result<Vec<String>> {
        let encodings: BTreeMap<Vec<u8>, Encoding> = self
            .document
            .get_page_fonts(page_id)?
            .into_iter()
            .filter_map(|(name, font)| {
                font.get_font_encoding(&self.document)
                    .ok()
                    .map(|encoding| (name, encoding))
            })
            .collect();
        let content = Content::decode(&self.page_content(page_id))?;

        let mut encoding = None;
        let mut fragments = Vec::new();
        for operation in &content.operations {
            let operands = &operation.operands;
            match operation.operator.as_str() {
                "Tf" => {
                    encoding = operands
                        .first()
                        .and_then(|name| name.as_name().ok())
                        .and_then(|name| encodings.get(name));
                }
                "Tj" | "'" => push_shown(&mut fragments, encoding, operands.first()),
                "\"" => push_shown(&mut fragments, encoding, operands.get(2)),
                "TJ" => {
                    let Some(Object::Array(items)) = operands.first() else {
                        continue;
                    };
                    let mut word = String::new();
                    for item in items {
                        match item {
                            Object::String(bytes, _) => word.push_str(&decode(encoding, bytes)),
                            other => {
                                if other.as_float().is_ok_and(|gap| gap < TJ_WORD_GAP) {
                                    fragments.push(std::mem::take(&mut word));
                                }
                            }
                        }
                    }
                    fragments.push(word);
                }
                _ => {}
            }
        }
        Ok(fragments)
    }

    /// The page's content streams, newline-separated so the last token of one
    /// stream cannot run into the first token of the next.
    fn page_content(&self, page_id: ObjectId) -> Vec<u8> {
        let mut data = Vec::new();
        for stream_id in self.document.get_page_contents(page_id) {
            if let Ok(stream) = self.document.get_object(stream_id).and_then(Object::as_stream) {
                match stream.decompressed_content() {
                    Ok(plain) => data.extend(plain),
                    Err(_) => data.extend_from_slice(&stream.content),
                }
                data.push(b'\n');
            }
        }
        data
    }
}

fn push_shown(fragments: &mut Vec<String>, encoding: Option<&Encoding>, operand: Option<&Object>) {
    if let Some(Object::String(bytes, _)) = operand {
        fragments.push(decode(encoding, bytes));
    }
}

/// Unknown fonts fall back to a lossy byte view rather than dropping text.
fn decode(encoding: Option<&Encoding>, bytes: &[u8]) -> String {
    encoding
        .and_then(|encoding| Document::decode_text(encoding, bytes).ok())
        .unwrap_or_else(|| String::from_utf8_lossy(bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{self, FixturePage};
    use lopdf::content::Operation;

    #[test]
    fn reads_each_page_in_order() {
        let bytes = fixtures::pdf_with_texts(&["Order 1 SKU: A-1", "Order 2   SKU: B_2"]);
        let text = TextDocument::decode(&bytes).expect("decode");
        assert_eq!(text.page_count(), 2);
        assert_eq!(text.page_text(0).expect("page 1"), "Order 1 SKU: A-1");
        assert_eq!(text.page_text(1).expect("page 2"), "Order 2 SKU: B_2");
    }

    #[test]
    fn fragments_in_one_text_object_are_separated() {
        let bytes = fixtures::pdf_with_pages(&[
            FixturePage::sized(612.0, 792.0).with_fragments(&["SKU: ABC-123", "Qty", "1"]),
        ]);
        let text = TextDocument::decode(&bytes).expect("decode");
        assert_eq!(text.page_text(0).expect("page 1"), "SKU: ABC-123 Qty 1");
        assert_eq!(
            crate::sku::find_sku(&text.page_text(0).expect("page 1")),
            Some("ABC-123")
        );
    }

    #[test]
    fn tj_arrays_split_on_word_gaps_only() {
        let shown = Object::Array(vec![
            Object::string_literal("SK"),
            Object::Integer(-15),
            Object::string_literal("U: X-9"),
            Object::Integer(-900),
            Object::string_literal("Qty"),
        ]);
        let page = FixturePage::sized(612.0, 792.0).with_content(vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), Object::Integer(10)]),
            Operation::new("TJ", vec![shown]),
            Operation::new("'", vec![Object::string_literal("next line")]),
            Operation::new("ET", vec![]),
        ]);
        let bytes = fixtures::pdf_with_pages(&[page]);
        let text = TextDocument::decode(&bytes).expect("decode");
        assert_eq!(text.page_text(0).expect("page 1"), "SKU: X-9 Qty next line");
    }

    #[test]
    fn page_without_text_is_unavailable() {
        let bytes = fixtures::pdf_with_pages(&[FixturePage::sized(300.0, 300.0)]);
        let text = TextDocument::decode(&bytes).expect("decode");
        assert!(matches!(
            text.page_text(0),
            Err(LabelcropError::TextLayerUnavailable(_))
        ));
    }

    #[test]
    fn out_of_range_page_is_unavailable() {
        let bytes = fixtures::pdf_with_texts(&["only"]);
        let text = TextDocument::decode(&bytes).expect("decode");
        assert!(matches!(
            text.page_text(1),
            Err(LabelcropError::TextLayerUnavailable(_))
        ));
    }

    #[test]
    fn undecodable_bytes_are_unavailable_not_malformed() {
        assert!(matches!(
            TextDocument::decode(b"%%garbage"),
            Err(LabelcropError::TextLayerUnavailable(_))
        ));
    }
}
