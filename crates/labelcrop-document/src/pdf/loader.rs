// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Document loader: decode raw PDF bytes into an immutable page document
// using the `lopdf` crate.

use labelcrop_core::error::{LabelcropError, Result};
use lopdf::Document;
use tracing::{debug, instrument};

use super::PageSource;

/// A decoded input PDF.
///
/// Never edited after load: pages are copied out of it into an
/// [`OutputDocument`](super::output::OutputDocument).
pub struct SourceDocument {
    document: Document,
    /// Input name, if the caller supplied one (useful for diagnostics).
    name: Option<String>,
}

impl SourceDocument {
    /// Decode raw PDF bytes already in memory.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let document = Document::load_mem(data).map_err(|err| {
            LabelcropError::MalformedDocument(format!("failed to load PDF from memory: {}", err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded from bytes");

        Ok(Self {
            document,
            name: None,
        })
    }

    /// Decode an input and remember its name; the name is added to any error.
    pub fn named(name: &str, data: &[u8]) -> Result<Self> {
        let mut source = Self::from_bytes(data).map_err(|err| match err {
            LabelcropError::MalformedDocument(detail) => {
                LabelcropError::MalformedDocument(format!("{name}: {detail}"))
            }
            other => other,
        })?;
        source.name = Some(name.to_string());
        Ok(source)
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl PageSource for SourceDocument {
    fn document(&self) -> &Document {
        &self.document
    }
}
