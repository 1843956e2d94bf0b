// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for labelcrop: page geometry, page selections, run
// requests and run reports.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

/// A crop rectangle in top-left-origin page space (y grows downward), the way
/// a person marks a crop on a rendered page image. Units are PDF points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropRegion {
    /// Top-left x.
    pub tlx: f32,
    /// Top-left y.
    pub tly: f32,
    /// Bottom-right x.
    pub brx: f32,
    /// Bottom-right y.
    pub bry: f32,
}

impl CropRegion {
    pub const fn new(tlx: f32, tly: f32, brx: f32, bry: f32) -> Self {
        Self { tlx, tly, brx, bry }
    }

    pub fn width(&self) -> f32 {
        self.brx - self.tlx
    }

    pub fn height(&self) -> f32 {
        self.bry - self.tly
    }

    /// Whether the region encloses a positive area.
    pub fn is_degenerate(&self) -> bool {
        !(self.width() > 0.0 && self.height() > 0.0)
    }

    /// Translate into the bottom-left-origin box of a page whose media box is
    /// `page_height` points tall.
    ///
    /// `x = tlx`, `y = page_height - bry`, `width = brx - tlx`,
    /// `height = bry - tly`.
    pub fn to_page_box(&self, page_height: f32) -> PageBox {
        PageBox {
            x: self.tlx,
            y: page_height - self.bry,
            width: self.width(),
            height: self.height(),
        }
    }

    /// Inverse of [`CropRegion::to_page_box`].
    ///
    /// Exact when every coordinate is representable in binary (whole or
    /// half points). Otherwise the `f32` rounding done by `to_page_box` is
    /// not undone and each coordinate may differ from the original region by
    /// about one `f32` step at `page_height` scale (below 1e-4 pt on a
    /// 1008 pt page). Sums are taken in `f64` so no second rounding is added.
    pub fn from_page_box(page_box: &PageBox, page_height: f32) -> Self {
        let height = f64::from(page_height);
        let (x, y) = (f64::from(page_box.x), f64::from(page_box.y));
        Self {
            tlx: page_box.x,
            tly: (height - (y + f64::from(page_box.height))) as f32,
            brx: (x + f64::from(page_box.width)) as f32,
            bry: (height - y) as f32,
        }
    }
}

/// A page boundary rectangle in PDF user space (bottom-left origin), as stored
/// in `/MediaBox` and `/CropBox`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl PageBox {
    /// Build from a PDF rectangle array `[llx lly urx ury]`. PDF allows the
    /// corners in any order, so they are normalised here.
    pub fn from_corners(corners: [f32; 4]) -> Self {
        let [ax, ay, bx, by] = corners;
        let (x0, x1) = if ax <= bx { (ax, bx) } else { (bx, ax) };
        let (y0, y1) = if ay <= by { (ay, by) } else { (by, ay) };
        Self {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
        }
    }

    /// `[llx lly urx ury]`, the layout PDF rectangles use.
    pub fn corners(&self) -> [f32; 4] {
        [self.x, self.y, self.x + self.width, self.y + self.height]
    }
}

// ---------------------------------------------------------------------------
// Page selection
// ---------------------------------------------------------------------------

/// Page parity in human (1-based) numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageParity {
    /// 1st, 3rd, 5th... (zero-based indices 0, 2, 4...).
    Odd,
    /// 2nd, 4th, 6th... (zero-based indices 1, 3, 5...).
    Even,
}

/// Which pages of a document survive a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageSelection {
    #[default]
    All,
    Parity(PageParity),
}

impl PageSelection {
    /// Whether the page at zero-based `index` is kept.
    pub fn keeps(&self, index: usize) -> bool {
        match self {
            Self::All => true,
            Self::Parity(PageParity::Odd) => index % 2 == 0,
            Self::Parity(PageParity::Even) => index % 2 == 1,
        }
    }

    /// Combine two selections so a page must satisfy both. Returns `None`
    /// when the two can never both hold (odd and even).
    pub fn intersect(self, other: Self) -> Option<Self> {
        match (self, other) {
            (Self::All, sel) | (sel, Self::All) => Some(sel),
            (Self::Parity(a), Self::Parity(b)) if a == b => Some(self),
            _ => None,
        }
    }

    /// Number of pages kept out of `page_count`.
    pub fn kept_count(&self, page_count: usize) -> usize {
        match self {
            Self::All => page_count,
            Self::Parity(PageParity::Odd) => page_count.div_ceil(2),
            Self::Parity(PageParity::Even) => page_count / 2,
        }
    }
}

// ---------------------------------------------------------------------------
// Run action
// ---------------------------------------------------------------------------

/// What a run does to the working document once a platform is selected.
/// Chosen once per run from the resolved configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunAction {
    /// Rewrite page boxes to `region`, keeping only pages `keep` selects.
    Crop {
        region: CropRegion,
        keep: PageSelection,
    },
    /// Drop pages by position; page geometry untouched.
    Filter { keep: PageSelection },
    /// Crop is disabled and no filter was chosen.
    Passthrough,
}

impl RunAction {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Crop { .. } => "crop",
            Self::Filter { .. } => "filter",
            Self::Passthrough => "passthrough",
        }
    }
}

// ---------------------------------------------------------------------------
// Run request
// ---------------------------------------------------------------------------

/// Unique identifier for a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(pub Uuid);

impl RunId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How the inputs are combined before cropping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Crop a single document. Several inputs still get merged first.
    #[default]
    SingleCrop,
    /// Always go through the merge path, even for one input.
    MergeAndCrop,
}

/// One input file handed over by the front end.
#[derive(Debug, Clone)]
pub struct InputDocument {
    /// Display name (file name); only used for logs and reports.
    pub name: String,
    pub bytes: Vec<u8>,
}

impl InputDocument {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// Everything one pipeline run needs.
#[derive(Debug, Clone, Default)]
pub struct RunRequest {
    pub inputs: Vec<InputDocument>,
    pub mode: Mode,
    /// `None` skips crop and filter entirely.
    pub platform: Option<String>,
    pub variant: Option<String>,
    pub extract_sku: bool,
    pub options: BTreeSet<String>,
}

impl RunRequest {
    pub fn new(inputs: Vec<InputDocument>) -> Self {
        Self {
            inputs,
            ..Self::default()
        }
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    pub fn with_variant(mut self, variant: impl Into<String>) -> Self {
        self.variant = Some(variant.into());
        self
    }

    pub fn with_option(mut self, option: impl Into<String>) -> Self {
        self.options.insert(option.into());
        self
    }

    pub fn with_sku_extraction(mut self, enabled: bool) -> Self {
        self.extract_sku = enabled;
        self
    }

    /// Whether the merge path runs.
    pub fn needs_merge(&self) -> bool {
        self.mode == Mode::MergeAndCrop || self.inputs.len() > 1
    }
}

// ---------------------------------------------------------------------------
// Run state and report
// ---------------------------------------------------------------------------

/// Lifecycle states of a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RunState {
    #[default]
    Idle,
    Loading,
    Merging,
    Filtering,
    Cropping,
    Stamping,
    Serializing,
    Done,
    Failed,
}

/// Per-run outcome of best-effort SKU stamping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SkuSummary {
    /// Pages that received a stamp.
    pub stamped: usize,
    /// Pages whose text held no SKU token.
    pub no_match: usize,
    /// Pages whose text could not be extracted or stamped.
    pub unavailable: usize,
}

/// What happened during a completed run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: RunId,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// SHA-256 of each input, in input order.
    pub input_fingerprints: Vec<String>,
    /// SHA-256 of the serialized output.
    pub output_fingerprint: String,
    pub merged: bool,
    /// `None` when no platform was selected.
    pub action: Option<RunAction>,
    pub input_pages: usize,
    pub output_pages: usize,
    /// `None` when SKU extraction was not requested.
    pub sku: Option<SkuSummary>,
}
