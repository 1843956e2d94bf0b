// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// labelcrop-document: Page-level PDF operations for labelcrop.
//
// Loads PDFs with `lopdf`, copies pages into fresh output documents (merge,
// filter, crop), reads page text, and stamps SKU codes onto pages.

pub mod pdf;
pub mod sku;
pub mod text;

#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;

pub use pdf::{OutputDocument, PageSource, SourceDocument};
pub use sku::find_sku;
pub use text::TextDocument;
