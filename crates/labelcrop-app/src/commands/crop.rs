// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// `labelcrop crop`: read label PDFs, run the pipeline, write the result.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use clap::Args;
use labelcrop_core::config::LabelcropConfig;
use labelcrop_core::types::{InputDocument, Mode, RunRequest};
use labelcrop_pipeline::{Pipeline, RunOutput};
use tracing::info;

#[derive(Args, Debug)]
pub struct CropArgs {
    /// Label PDFs, in the order their pages should appear
    #[arg(required = true, value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Marketplace the labels come from (see `labelcrop platforms`)
    #[arg(short, long, value_name = "ID")]
    pub platform: Option<String>,

    /// Platform variant overriding the crop region
    #[arg(long, value_name = "ID")]
    pub variant: Option<String>,

    /// Platform page option, e.g. `order_page` (repeatable)
    #[arg(long = "option", value_name = "ID")]
    pub options: Vec<String>,

    /// Find SKU codes in the page text and print them on each label
    #[arg(long)]
    pub sku: bool,

    /// Merge the inputs even when only one file is given
    #[arg(long)]
    pub merge: bool,

    /// Output file [default: labelcrop-<timestamp>-<first input name>]
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// JSON config file (stamp style, output options)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Print the run report as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: CropArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => LabelcropConfig::load_or_default(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => LabelcropConfig::default(),
    };

    let request = read_request(&args).await?;
    let pipeline = Arc::new(Pipeline::builtin(config)?);
    let RunOutput { bytes, report } = pipeline.run_async(request).await?;

    let path = match &args.output {
        Some(path) => path.clone(),
        None => default_output_path(&args.files[0], Local::now()),
    };
    tokio::fs::write(&path, &bytes)
        .await
        .with_context(|| format!("writing {}", path.display()))?;
    info!(path = %path.display(), bytes = bytes.len(), "output written");

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "Wrote {} ({} of {} pages)",
            path.display(),
            report.output_pages,
            report.input_pages
        );
        if let Some(sku) = report.sku {
            println!(
                "SKU: {} stamped, {} without code, {} unreadable",
                sku.stamped, sku.no_match, sku.unavailable
            );
        }
    }
    Ok(())
}

async fn read_request(args: &CropArgs) -> Result<RunRequest> {
    let mut inputs = Vec::with_capacity(args.files.len());
    for path in &args.files {
        let bytes = tokio::fs::read(path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;
        inputs.push(InputDocument::new(display_name(path), bytes));
    }

    let mut request = RunRequest::new(inputs).with_sku_extraction(args.sku);
    if args.merge {
        request = request.with_mode(Mode::MergeAndCrop);
    }
    if let Some(platform) = &args.platform {
        request = request.with_platform(platform);
    }
    if let Some(variant) = &args.variant {
        request = request.with_variant(variant);
    }
    for option in &args.options {
        request = request.with_option(option);
    }
    Ok(request)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "labels.pdf".to_string())
}

/// `labelcrop-YYYY-MM-DD-HH-MM-SS-<first input name>` in the working directory.
fn default_output_path(first_input: &Path, now: DateTime<Local>) -> PathBuf {
    PathBuf::from(format!(
        "labelcrop-{}-{}",
        now.format("%Y-%m-%d-%H-%M-%S"),
        display_name(first_input)
    ))
}
