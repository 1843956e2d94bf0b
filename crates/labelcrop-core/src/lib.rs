// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// labelcrop: Core types, errors, configuration, and the platform registry
// shared across all crates.

pub mod config;
pub mod error;
pub mod human_errors;
pub mod registry;
pub mod types;

pub use config::{LabelcropConfig, OutputOptions, StampStyle};
pub use error::LabelcropError;
pub use registry::{LabelConfig, PageFilter, Registry, Variant};
pub use types::*;
