// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Runtime configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Settings that shape pipeline output. The platform table itself is static;
/// see [`crate::registry`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelcropConfig {
    /// How extracted SKUs are drawn onto label pages.
    pub stamp: StampStyle,
    /// Serialization of the final document.
    pub output: OutputOptions,
}

/// Position and font of the SKU stamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StampStyle {
    /// Distance right of the page's lower-left origin, in points.
    pub offset_x: f32,
    /// Distance up from the page's lower-left origin, in points.
    pub offset_y: f32,
    pub font_size: f32,
    /// One of the PDF standard 14 fonts; never embedded.
    pub base_font: String,
    /// Text placed before the extracted token.
    pub prefix: String,
}

impl Default for StampStyle {
    fn default() -> Self {
        Self {
            offset_x: 10.0,
            offset_y: 10.0,
            font_size: 10.0,
            base_font: "Helvetica".into(),
            prefix: "SKU: ".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputOptions {
    /// PDF header version written to the output.
    pub pdf_version: String,
    /// Flate-compress uncompressed streams before saving.
    pub compress: bool,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            pdf_version: "1.7".into(),
            compress: true,
        }
    }
}

impl LabelcropConfig {
    /// Parse a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from a JSON file, or fall back to defaults when it does not exist.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        match std::fs::read_to_string(path.as_ref()) {
            Ok(json) => Self::from_json(&json),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(err.into()),
        }
    }
}
