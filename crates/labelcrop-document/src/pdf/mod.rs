// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module: loading, merging, filtering, cropping, and stamping pages.

mod copy;
pub mod crop;
pub mod filter;
pub mod geometry;
pub mod loader;
pub mod merge;
pub mod output;
pub mod stamp;

use lopdf::{Document, ObjectId};

pub use crop::crop_pages;
pub use filter::filter_pages;
pub use loader::SourceDocument;
pub use merge::{merge_documents, merge_sources};
pub use output::OutputDocument;

/// A document whose pages can be read in order.
pub trait PageSource {
    fn document(&self) -> &Document;

    /// Page object ids in page order.
    fn page_ids(&self) -> Vec<ObjectId> {
        self.document().get_pages().into_values().collect()
    }

    fn page_count(&self) -> usize {
        self.page_ids().len()
    }
}
