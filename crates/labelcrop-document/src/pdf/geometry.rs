// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Reading and writing page boundary boxes.

use labelcrop_core::error::{LabelcropError, Result};
use labelcrop_core::types::{CropRegion, PageBox};
use lopdf::{Dictionary, Document, Object, ObjectId};

use super::copy::{inherited_attribute, resolve};

/// The page's `/MediaBox`, looked up on its ancestors when the page does not
/// carry one.
pub fn media_box(document: &Document, page_id: ObjectId) -> Result<PageBox> {
    read_box(document, page_id, b"MediaBox")?.ok_or_else(|| {
        LabelcropError::MalformedDocument(format!("page {:?} has no /MediaBox", page_id))
    })
}

/// The page's visible region: `/CropBox`, defaulting to the media box.
pub fn crop_box(document: &Document, page_id: ObjectId) -> Result<PageBox> {
    match read_box(document, page_id, b"CropBox")? {
        Some(page_box) => Ok(page_box),
        None => media_box(document, page_id),
    }
}

/// Rewrite the page's boundary to the region, measured against the page's own
/// media box height. Both `/MediaBox` and `/CropBox` get the same rectangle:
/// printers size the sheet from the media box, viewers clip to the crop box.
pub fn apply_crop(document: &mut Document, page_id: ObjectId, region: &CropRegion) -> Result<PageBox> {
    let page_height = media_box(document, page_id)?.height;
    let page_box = region.to_page_box(page_height);
    set_boxes(document, page_id, &page_box)?;
    Ok(page_box)
}

/// Set `/MediaBox` and `/CropBox` to `page_box`.
pub fn set_boxes(document: &mut Document, page_id: ObjectId, page_box: &PageBox) -> Result<()> {
    let page = page_dict_mut(document, page_id)?;
    page.set("MediaBox", rect_object(page_box));
    page.set("CropBox", rect_object(page_box));
    Ok(())
}

fn rect_object(page_box: &PageBox) -> Object {
    Object::Array(page_box.corners().into_iter().map(Object::Real).collect())
}

fn read_box(document: &Document, page_id: ObjectId, key: &[u8]) -> Result<Option<PageBox>> {
    let page = page_dict(document, page_id)?;
    let value = match page.get(key) {
        Ok(value) => value,
        Err(_) => match inherited_attribute(document, page, key) {
            Some(value) => value,
            None => return Ok(None),
        },
    };

    let values = resolve(document, value)?.as_array().map_err(|err| {
        LabelcropError::MalformedDocument(format!("page {:?} /{}: {}", page_id, key_name(key), err))
    })?;
    if values.len() != 4 {
        return Err(LabelcropError::MalformedDocument(format!(
            "page {:?} /{} has {} entries, expected 4",
            page_id,
            key_name(key),
            values.len()
        )));
    }

    let mut corners = [0.0_f32; 4];
    for (slot, value) in corners.iter_mut().zip(values) {
        *slot = resolve(document, value)?.as_float().map_err(|err| {
            LabelcropError::MalformedDocument(format!(
                "page {:?} /{} is not numeric: {}",
                page_id,
                key_name(key),
                err
            ))
        })?;
    }
    Ok(Some(PageBox::from_corners(corners)))
}

fn key_name(key: &[u8]) -> String {
    String::from_utf8_lossy(key).into_owned()
}

pub(crate) fn page_dict(document: &Document, page_id: ObjectId) -> Result<&Dictionary> {
    document
        .get_object(page_id)
        .and_then(Object::as_dict)
        .map_err(|err| {
            LabelcropError::MalformedDocument(format!("cannot read page {:?}: {}", page_id, err))
        })
}

pub(crate) fn page_dict_mut(document: &mut Document, page_id: ObjectId) -> Result<&mut Dictionary> {
    document
        .get_object_mut(page_id)
        .and_then(Object::as_dict_mut)
        .map_err(|err| {
            LabelcropError::MalformedDocument(format!("cannot edit page {:?}: {}", page_id, err))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{self, FixturePage};
    use crate::pdf::loader::SourceDocument;
    use crate::pdf::PageSource;

    #[test]
    fn crop_box_defaults_to_media_box() {
        let bytes = fixtures::pdf_with_pages(&[FixturePage::sized(400.0, 600.0)]);
        let source = SourceDocument::from_bytes(&bytes).expect("load");
        let page_id = source.page_ids()[0];
        let media = media_box(source.document(), page_id).expect("media box");
        assert_eq!(media.corners(), [0.0, 0.0, 400.0, 600.0]);
        assert_eq!(crop_box(source.document(), page_id).expect("crop box"), media);
    }

    #[test]
    fn media_box_is_read_from_ancestors() {
        let bytes = fixtures::pdf_with_inherited_media_box(2, 288.0, 432.0);
        let source = SourceDocument::from_bytes(&bytes).expect("load");
        for page_id in source.page_ids() {
            let media = media_box(source.document(), page_id).expect("media box");
            assert_eq!(media.width, 288.0);
            assert_eq!(media.height, 432.0);
        }
    }

    #[test]
    fn apply_crop_uses_each_page_height() {
        let bytes = fixtures::pdf_with_pages(&[
            FixturePage::sized(595.0, 842.0),
            FixturePage::sized(612.0, 792.0),
        ]);
        let source = SourceDocument::from_bytes(&bytes).expect("load");
        let mut document = source.document().clone();
        let region = CropRegion::new(188.0, 28.0, 407.0, 381.0);

        for (page_id, height) in source.page_ids().into_iter().zip([842.0_f32, 792.0]) {
            let page_box = apply_crop(&mut document, page_id, &region).expect("crop");
            assert_eq!(page_box.y, height - 381.0);
            assert_eq!(media_box(&document, page_id).expect("media"), page_box);
            assert_eq!(crop_box(&document, page_id).expect("crop"), page_box);
            assert_eq!(CropRegion::from_page_box(&page_box, height), region);
        }
    }
}
