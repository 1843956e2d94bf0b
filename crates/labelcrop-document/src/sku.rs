// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// SKU lookup in page text.

use once_cell::sync::Lazy;
use regex::Regex;

/// `SKU`, any case, an optional colon and optional whitespace, then the code.
static SKU_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)SKU:?\s*([A-Za-z0-9\-_]+)").expect("Invalid SKU regex")
});

/// The first SKU code in `text`, if any.
pub fn find_sku(text: &str) -> Option<&str> {
    SKU_PATTERN
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|code| code.as_str())
}

/// Text drawn on a page for `code`.
pub fn stamp_text(prefix: &str, code: &str) -> String {
    format!("{prefix}{code}")
}
