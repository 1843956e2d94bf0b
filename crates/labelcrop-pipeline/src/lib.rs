// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// labelcrop-pipeline: Runs one label job end to end: validate the selection,
// load or merge the inputs, filter or crop, stamp SKUs, serialize.

pub mod integrity;
pub mod orchestrator;

pub use integrity::hash_bytes;
pub use orchestrator::{Pipeline, RunOutput};
