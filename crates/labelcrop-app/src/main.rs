// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// labelcrop: Shipping label cropper for thermal printers.
//
// Entry point. Initialises logging, parses the command line, and hands off to
// the subcommand.

mod commands;

use std::process::ExitCode;

use clap::{Parser, Subcommand};

use commands::crop::CropArgs;
use commands::platforms::PlatformsArgs;

#[derive(Parser, Debug)]
#[command(name = "labelcrop")]
#[command(about = "Crop marketplace shipping labels for thermal printers")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Merge, crop, and stamp label PDFs into one printable file
    Crop(CropArgs),
    /// List supported platforms with their variants and options
    Platforms(PlatformsArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Crop(args) => commands::crop::run(args).await,
        Commands::Platforms(args) => commands::platforms::run(&args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("labelcrop failed: {err:#}");
            eprintln!("{}", commands::describe_failure(&err));
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crop_arguments_parse() {
        let cli = Cli::try_parse_from([
            "labelcrop",
            "crop",
            "a.pdf",
            "b.pdf",
            "--platform",
            "MEESHO",
            "--variant",
            "with_invoice",
            "--sku",
            "--merge",
            "-o",
            "out.pdf",
        ])
        .expect("parse");

        let Commands::Crop(args) = cli.command else {
            panic!("expected crop subcommand");
        };
        assert_eq!(args.files.len(), 2);
        assert_eq!(args.platform.as_deref(), Some("MEESHO"));
        assert_eq!(args.variant.as_deref(), Some("with_invoice"));
        assert!(args.sku);
        assert!(args.merge);
        assert_eq!(args.output.as_deref(), Some(std::path::Path::new("out.pdf")));
    }

    #[test]
    fn options_may_repeat() {
        let cli = Cli::try_parse_from([
            "labelcrop", "crop", "a.pdf", "--platform", "AMAZON", "--option", "order_page",
            "--option", "order_page",
        ])
        .expect("parse");
        let Commands::Crop(args) = cli.command else {
            panic!("expected crop subcommand");
        };
        assert_eq!(args.options, ["order_page", "order_page"]);
    }

    #[test]
    fn crop_requires_a_file() {
        assert!(Cli::try_parse_from(["labelcrop", "crop"]).is_err());
    }

    #[test]
    fn platforms_json_flag() {
        let cli = Cli::try_parse_from(["labelcrop", "platforms", "--json"]).expect("parse");
        assert!(matches!(cli.command, Commands::Platforms(PlatformsArgs { json: true })));
    }
}
