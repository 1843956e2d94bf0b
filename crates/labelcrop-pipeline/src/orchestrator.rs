// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pipeline orchestrator: sequences one run:
//
//   Idle -> Loading -> (Merging) -> (Filtering | Cropping) -> (Stamping)
//        -> Serializing -> Done | Failed
//
// The selection is validated before any document is decoded. A pipeline runs
// at most one request at a time.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::Utc;
use labelcrop_core::config::{LabelcropConfig, StampStyle};
use labelcrop_core::error::{LabelcropError, Result};
use labelcrop_core::registry::Registry;
use labelcrop_core::types::{
    InputDocument, RunAction, RunId, RunReport, RunRequest, RunState, SkuSummary,
};
use labelcrop_document::pdf::{
    OutputDocument, PageSource, SourceDocument, crop_pages, filter_pages, merge_sources,
};
use labelcrop_document::sku::{find_sku, stamp_text};
use labelcrop_document::text::TextDocument;
use tracing::{debug, info, instrument, warn};

use crate::integrity::hash_bytes;

/// The serialized document and what happened while producing it.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub bytes: Vec<u8>,
    pub report: RunReport,
}

/// Runs label jobs against a validated platform registry.
pub struct Pipeline {
    registry: Registry,
    config: LabelcropConfig,
    busy: AtomicBool,
    state: Mutex<RunState>,
}

impl Pipeline {
    pub fn new(registry: Registry, config: LabelcropConfig) -> Self {
        Self {
            registry,
            config,
            busy: AtomicBool::new(false),
            state: Mutex::new(RunState::Idle),
        }
    }

    /// A pipeline over the built-in marketplace table.
    pub fn builtin(config: LabelcropConfig) -> Result<Self> {
        Ok(Self::new(Registry::builtin()?, config))
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn config(&self) -> &LabelcropConfig {
        &self.config
    }

    /// State of the current or most recent run.
    pub fn state(&self) -> RunState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Run one request to completion on the calling thread.
    ///
    /// Returns [`LabelcropError::RunInProgress`] without doing anything when
    /// another run on this pipeline has not finished.
    #[instrument(skip_all, fields(
        inputs = request.inputs.len(),
        platform = request.platform.as_deref().unwrap_or("-"),
        mode = ?request.mode,
    ))]
    pub fn run(&self, request: RunRequest) -> Result<RunOutput> {
        let _busy = BusyGuard::acquire(&self.busy)?;

        match self.execute(&request) {
            Ok(output) => {
                self.transition(RunState::Done);
                info!(
                    run_id = %output.report.run_id,
                    output_pages = output.report.output_pages,
                    output_bytes = output.bytes.len(),
                    "Run complete"
                );
                Ok(output)
            }
            Err(err) => {
                self.transition(RunState::Failed);
                warn!(error = %err, "Run failed");
                Err(err)
            }
        }
    }

    /// [`Pipeline::run`] on tokio's blocking thread pool.
    pub async fn run_async(self: Arc<Self>, request: RunRequest) -> Result<RunOutput> {
        tokio::task::spawn_blocking(move || self.run(request))
            .await
            .map_err(|err| LabelcropError::Worker(err.to_string()))?
    }

    fn transition(&self, next: RunState) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        debug!(from = ?*state, to = ?next, "run state");
        *state = next;
    }

    fn execute(&self, request: &RunRequest) -> Result<RunOutput> {
        let run_id = RunId::new();
        let started_at = Utc::now();

        if request.inputs.is_empty() {
            return Err(LabelcropError::EmptyInput);
        }
        let action = self.registry.resolve_action(
            request.platform.as_deref(),
            request.variant.as_deref(),
            &request.options,
        )?;
        debug!(%run_id, action = action.map(|a| a.name()).unwrap_or("none"), "selection resolved");

        self.transition(RunState::Loading);
        let input_fingerprints = request
            .inputs
            .iter()
            .map(|input| hash_bytes(&input.bytes))
            .collect();
        let sources = load_inputs(&request.inputs)?;
        let input_pages = sources.iter().map(PageSource::page_count).sum();

        let merged = request.needs_merge();
        let working = if merged {
            self.transition(RunState::Merging);
            merge_sources(&sources)?
        } else {
            let source = sources.first().ok_or(LabelcropError::EmptyInput)?;
            let mut working = OutputDocument::new();
            working.append_all(source)?;
            working
        };
        drop(sources);

        // Text is read from the working document so page indices line up.
        let stamping = request.extract_sku && action.is_some();
        let text = stamping.then(|| text_view(&working));

        let (mut output, origins) = match action {
            Some(RunAction::Crop { region, keep }) => {
                self.transition(RunState::Cropping);
                let output = crop_pages(&working, &region, keep)?;
                let origins = origins_of(&output);
                (output, origins)
            }
            Some(RunAction::Filter { keep }) => {
                self.transition(RunState::Filtering);
                let output = filter_pages(&working, keep)?;
                let origins = origins_of(&output);
                (output, origins)
            }
            Some(RunAction::Passthrough) | None => {
                let origins = (0..working.page_count()).collect();
                (working, origins)
            }
        };

        let sku = match text {
            Some(text) => {
                self.transition(RunState::Stamping);
                Some(stamp_skus(
                    &mut output,
                    &origins,
                    text.as_ref(),
                    &self.config.stamp,
                ))
            }
            None => None,
        };

        self.transition(RunState::Serializing);
        let output_pages = output.page_count();
        let bytes = output.into_bytes(&self.config.output)?;

        let report = RunReport {
            run_id,
            started_at,
            finished_at: Utc::now(),
            input_fingerprints,
            output_fingerprint: hash_bytes(&bytes),
            merged,
            action,
            input_pages,
            output_pages,
            sku,
        };
        Ok(RunOutput { bytes, report })
    }
}

/// Decode every input. A bad input fails the run and is named by position.
fn load_inputs(inputs: &[InputDocument]) -> Result<Vec<SourceDocument>> {
    inputs
        .iter()
        .enumerate()
        .map(|(index, input)| {
            SourceDocument::named(&input.name, &input.bytes).map_err(|err| match err {
                LabelcropError::MalformedDocument(detail) => {
                    LabelcropError::MalformedDocument(format!("input #{}: {}", index + 1, detail))
                }
                other => other,
            })
        })
        .collect()
}

/// For each output page, its index in the document it was copied from.
fn origins_of(output: &OutputDocument) -> Vec<usize> {
    (0..output.page_count())
        .filter_map(|index| output.source_index(index))
        .collect()
}

fn text_view(working: &OutputDocument) -> Option<TextDocument> {
    match working.snapshot().and_then(|bytes| TextDocument::decode(&bytes)) {
        Ok(text) => Some(text),
        Err(err) => {
            warn!(error = %err, "text layer unavailable, SKU lookup skipped");
            None
        }
    }
}

/// Stamp every page whose text carries a SKU. Never fails the run.
fn stamp_skus(
    output: &mut OutputDocument,
    origins: &[usize],
    text: Option<&TextDocument>,
    style: &StampStyle,
) -> SkuSummary {
    let mut summary = SkuSummary::default();
    let Some(text) = text else {
        summary.unavailable = output.page_count();
        return summary;
    };

    for (index, &origin) in origins.iter().enumerate() {
        let page_text = match text.page_text(origin) {
            Ok(page_text) => page_text,
            Err(err) => {
                debug!(page = index + 1, error = %err, "no text for page");
                summary.unavailable += 1;
                continue;
            }
        };
        let Some(code) = find_sku(&page_text) else {
            summary.no_match += 1;
            continue;
        };
        match output.stamp_page(index, &stamp_text(&style.prefix, code), style) {
            Ok(()) => {
                debug!(page = index + 1, sku = code, "SKU stamped");
                summary.stamped += 1;
            }
            Err(err) => {
                warn!(page = index + 1, error = %err, "SKU stamp failed");
                summary.unavailable += 1;
            }
        }
    }

    info!(
        stamped = summary.stamped,
        no_match = summary.no_match,
        unavailable = summary.unavailable,
        "SKU annotation finished"
    );
    summary
}

/// Holds the single-flight flag for the length of a run.
struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| LabelcropError::RunInProgress)?;
        Ok(Self(flag))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
