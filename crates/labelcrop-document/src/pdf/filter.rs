// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page filter: keep pages by position, geometry untouched.

use labelcrop_core::error::Result;
use labelcrop_core::types::PageSelection;
use tracing::{info, instrument};

use super::PageSource;
use super::output::OutputDocument;

/// A new document holding the pages `keep` selects, in their original order.
#[instrument(skip_all, fields(pages = source.page_count(), keep = ?keep))]
pub fn filter_pages(source: &impl PageSource, keep: PageSelection) -> Result<OutputDocument> {
    let mut output = OutputDocument::new();
    let kept = output.append_where(source, |index| keep.keeps(index))?;
    info!(kept, "Pages filtered");
    Ok(output)
}
