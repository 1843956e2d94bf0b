// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the crop path in the labelcrop-document crate.

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use labelcrop_core::types::{CropRegion, PageSelection};
use labelcrop_document::SourceDocument;
use labelcrop_document::fixtures;
use labelcrop_document::pdf::crop_pages;

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Load a 50-page label export, crop every page, and serialize the result.
fn bench_crop_document(c: &mut Criterion) {
    let texts: Vec<String> = (0..50).map(|i| format!("Order {i} SKU: BENCH-{i}")).collect();
    let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
    let bytes = fixtures::pdf_with_texts(&refs);
    let region = CropRegion::new(188.0, 28.0, 407.0, 381.0);
    let options = labelcrop_core::config::OutputOptions::default();

    c.bench_function("crop_pages (50 pages)", |b| {
        b.iter(|| {
            let source = SourceDocument::from_bytes(black_box(&bytes)).expect("load");
            let output = crop_pages(&source, &region, PageSelection::All).expect("crop");
            black_box(output.into_bytes(&options).expect("serialize"));
        });
    });
}

criterion_group!(benches, bench_crop_document);
criterion_main!(benches);
