// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page merger: concatenate the pages of several PDFs into one document.

use labelcrop_core::error::{LabelcropError, Result};
use tracing::{debug, info, instrument};

use super::PageSource;
use super::loader::SourceDocument;
use super::output::OutputDocument;

/// Append every page of every source, in input order then page order.
/// Nothing is dropped, reordered or deduplicated.
#[instrument(skip_all, fields(sources = sources.len()))]
pub fn merge_sources(sources: &[SourceDocument]) -> Result<OutputDocument> {
    if sources.is_empty() {
        return Err(LabelcropError::EmptyInput);
    }

    info!(
        total_pages = sources.iter().map(PageSource::page_count).sum::<usize>(),
        "Merging PDFs"
    );

    let mut output = OutputDocument::new();
    for (position, source) in sources.iter().enumerate() {
        let appended = output.append_all(source)?;
        debug!(position, name = source.name(), appended, "source appended");
    }
    Ok(output)
}

/// Load each buffer and merge the results.
///
/// Any unparseable buffer aborts the whole merge; the error names its
/// one-based position.
#[instrument(skip_all, fields(buffers = buffers.len()))]
pub fn merge_documents(buffers: &[&[u8]]) -> Result<OutputDocument> {
    let sources = buffers
        .iter()
        .enumerate()
        .map(|(index, bytes)| {
            SourceDocument::from_bytes(bytes).map_err(|err| match err {
                LabelcropError::MalformedDocument(detail) => LabelcropError::MalformedDocument(
                    format!("input #{}: {}", index + 1, detail),
                ),
                other => other,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    merge_sources(&sources)
}
