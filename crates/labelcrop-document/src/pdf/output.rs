// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Output document: a fresh page tree that pages are copied into, page by
// page, and that is serialized once at the end of a run.

use labelcrop_core::config::{OutputOptions, StampStyle};
use labelcrop_core::error::{LabelcropError, Result};
use labelcrop_core::types::PageBox;
use lopdf::{Document, Object, ObjectId, dictionary};
use tracing::{debug, instrument};

use super::PageSource;
use super::copy::PageCopier;
use super::{geometry, stamp};

/// PDF version of a freshly created output until [`OutputOptions`] say otherwise.
const DEFAULT_PDF_VERSION: &str = "1.7";

/// The document a run builds.
pub struct OutputDocument {
    document: Document,
    /// The `/Pages` root every copied page hangs off.
    pages_id: ObjectId,
    /// Page object ids in output order.
    page_ids: Vec<ObjectId>,
    /// For each output page, its index in the document it was copied from.
    copied_from: Vec<usize>,
    /// Stamp font, added on first use.
    stamp_font: Option<ObjectId>,
}

impl OutputDocument {
    /// An empty document with a catalog and an empty page tree.
    pub fn new() -> Self {
        let mut document = Document::with_version(DEFAULT_PDF_VERSION);
        let pages_id = document.add_object(dictionary! {
            "Type" => "Pages",
            "Kids" => Vec::<Object>::new(),
            "Count" => Object::Integer(0),
        });
        let catalog_id = document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => Object::Reference(pages_id),
        });
        document.trailer.set("Root", Object::Reference(catalog_id));

        Self {
            document,
            pages_id,
            page_ids: Vec::new(),
            copied_from: Vec::new(),
            stamp_font: None,
        }
    }

    /// Copy every page of `source`, in order. Returns the number of pages
    /// appended.
    pub fn append_all(&mut self, source: &impl PageSource) -> Result<usize> {
        self.append_where(source, |_| true)
    }

    /// Copy the pages of `source` whose zero-based index satisfies `keep`,
    /// preserving their relative order. Returns the number of pages appended.
    #[instrument(skip_all, fields(source_pages = source.page_count()))]
    pub fn append_where(
        &mut self,
        source: &impl PageSource,
        keep: impl Fn(usize) -> bool,
    ) -> Result<usize> {
        let mut copier = PageCopier::new(source.document());
        let mut appended = 0;
        for (index, page_id) in source.page_ids().into_iter().enumerate() {
            if !keep(index) {
                continue;
            }
            let new_id = copier.copy_page(&mut self.document, page_id)?;
            self.link_page(new_id)?;
            self.copied_from.push(index);
            appended += 1;
        }
        debug!(appended, total = self.page_ids.len(), "pages appended");
        Ok(appended)
    }

    /// Add a page to the /Kids of the page tree and point it at its parent.
    fn link_page(&mut self, page_id: ObjectId) -> Result<()> {
        let pages_id = self.pages_id;
        let pages_dict = geometry::page_dict_mut(&mut self.document, pages_id)?;
        match pages_dict.get_mut(b"Kids") {
            Ok(Object::Array(kids)) => kids.push(Object::Reference(page_id)),
            _ => {
                return Err(LabelcropError::SerializationFailure(
                    "output page tree lost its /Kids array".to_string(),
                ));
            }
        }
        pages_dict.set("Count", Object::Integer(self.page_ids.len() as i64 + 1));

        geometry::page_dict_mut(&mut self.document, page_id)?
            .set("Parent", Object::Reference(pages_id));
        self.page_ids.push(page_id);
        Ok(())
    }

    /// Index, in the document it was copied from, of output page `index`.
    pub fn source_index(&self, index: usize) -> Option<usize> {
        self.copied_from.get(index).copied()
    }

    pub(crate) fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    fn page_id(&self, index: usize) -> Result<ObjectId> {
        self.page_ids.get(index).copied().ok_or_else(|| {
            LabelcropError::MalformedDocument(format!(
                "page index {} out of range (document has {} pages)",
                index,
                self.page_ids.len()
            ))
        })
    }

    // -- Page-level operations ------------------------------------------------

    pub fn media_box(&self, index: usize) -> Result<PageBox> {
        geometry::media_box(&self.document, self.page_id(index)?)
    }

    pub fn crop_box(&self, index: usize) -> Result<PageBox> {
        geometry::crop_box(&self.document, self.page_id(index)?)
    }

    /// Set the media box and crop box of output page `index`.
    pub fn set_page_box(&mut self, index: usize, page_box: &PageBox) -> Result<()> {
        let page_id = self.page_id(index)?;
        geometry::set_boxes(&mut self.document, page_id, page_box)
    }

    /// Draw `text` on output page `index`, `style.offset_x`/`offset_y` points
    /// from the lower-left corner of the page's visible region.
    pub fn stamp_page(&mut self, index: usize, text: &str, style: &StampStyle) -> Result<()> {
        let page_id = self.page_id(index)?;
        let anchor = geometry::crop_box(&self.document, page_id)?;
        let font_id = match self.stamp_font {
            Some(font_id) => font_id,
            None => {
                let font_id = stamp::add_standard_font(&mut self.document, &style.base_font);
                self.stamp_font = Some(font_id);
                font_id
            }
        };
        stamp::draw_text(
            &mut self.document,
            page_id,
            font_id,
            (anchor.x + style.offset_x, anchor.y + style.offset_y),
            text,
            style,
        )
    }

    // -- Serialization --------------------------------------------------------

    /// Serialize a copy of the document as it stands, e.g. to decode a text
    /// view of it.
    pub fn snapshot(&self) -> Result<Vec<u8>> {
        let mut document = self.document.clone();
        save(&mut document)
    }

    /// Serialize the finished document. Terminal: consumes the output.
    #[instrument(skip_all, fields(pages = self.page_ids.len()))]
    pub fn into_bytes(mut self, options: &OutputOptions) -> Result<Vec<u8>> {
        self.document.version = options.pdf_version.clone();
        if options.compress {
            self.document.compress();
        }
        let bytes = save(&mut self.document)?;
        debug!(output_bytes = bytes.len(), "output serialized");
        Ok(bytes)
    }
}

impl Default for OutputDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl PageSource for OutputDocument {
    fn document(&self) -> &Document {
        &self.document
    }

    fn page_ids(&self) -> Vec<ObjectId> {
        self.page_ids.clone()
    }

    fn page_count(&self) -> usize {
        self.page_ids.len()
    }
}

fn save(document: &mut Document) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    document.save_to(&mut output).map_err(|err| {
        LabelcropError::SerializationFailure(format!("failed to serialise PDF: {}", err))
    })?;
    Ok(output)
}
