// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Cropper: copy the selected pages and rewrite their boundary boxes.

use labelcrop_core::error::Result;
use labelcrop_core::types::{CropRegion, PageSelection};
use lopdf::ObjectId;
use tracing::{debug, info, instrument};

use super::PageSource;
use super::geometry;
use super::output::OutputDocument;

/// A new document holding the pages `keep` selects, each cropped to `region`.
///
/// The region is measured from the top of each page's own media box, so
/// documents mixing page sizes crop consistently.
#[instrument(skip_all, fields(pages = source.page_count(), keep = ?keep))]
pub fn crop_pages(
    source: &impl PageSource,
    region: &CropRegion,
    keep: PageSelection,
) -> Result<OutputDocument> {
    let mut output = OutputDocument::new();
    output.append_where(source, |index| keep.keeps(index))?;

    let page_ids: Vec<ObjectId> = output.page_ids();
    for (index, page_id) in page_ids.into_iter().enumerate() {
        let page_box = geometry::apply_crop(output.document_mut(), page_id, region)?;
        debug!(index, ?page_box, "page cropped");
    }

    info!(
        cropped = output.page_count(),
        width = region.width(),
        height = region.height(),
        "Pages cropped"
    );
    Ok(output)
}
