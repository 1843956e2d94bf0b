// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// `labelcrop platforms`: list the built-in marketplace table.

use std::fmt::Write as _;

use anyhow::Result;
use clap::Args;
use labelcrop_core::registry::{LabelConfig, Registry};
use labelcrop_core::types::{PageParity, PageSelection};

#[derive(Args, Debug)]
pub struct PlatformsArgs {
    /// Print the table as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: &PlatformsArgs) -> Result<()> {
    let registry = Registry::builtin()?;
    print!("{}", render(&registry, args.json)?);
    Ok(())
}

fn render(registry: &Registry, json: bool) -> Result<String> {
    if json {
        let mut out = serde_json::to_string_pretty(registry.platforms())?;
        out.push('\n');
        return Ok(out);
    }

    let mut out = String::new();
    for platform in registry.platforms() {
        describe(&mut out, platform)?;
    }
    Ok(out)
}

fn describe(out: &mut String, platform: &LabelConfig) -> std::fmt::Result {
    let region = platform.region;
    write!(out, "{:<10} {}", platform.id, platform.label)?;
    if platform.crop_disabled {
        writeln!(out, " (no crop)")?;
    } else {
        writeln!(
            out,
            "  {} x {} pt at ({}, {})",
            region.width(),
            region.height(),
            region.tlx,
            region.tly
        )?;
    }
    for variant in platform.variants {
        writeln!(
            out,
            "    --variant {:<18} {}  {} x {} pt",
            variant.id,
            variant.label,
            variant.region.width(),
            variant.region.height()
        )?;
    }
    for filter in platform.filters {
        let keeps = match filter.keep {
            PageSelection::All => "all pages",
            PageSelection::Parity(PageParity::Odd) => "pages 1, 3, 5...",
            PageSelection::Parity(PageParity::Even) => "pages 2, 4, 6...",
        };
        writeln!(out, "    --option  {:<18} {}  keeps {}", filter.id, filter.label, keeps)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_listing_names_every_platform() {
        let registry = Registry::builtin().expect("registry");
        let text = render(&registry, false).expect("render");
        assert!(text.contains("FLIPKART"));
        assert!(text.contains("219 x 353 pt"));
        assert!(text.contains("--variant without_invoice"));
        assert!(text.contains("--option  order_page"));
        assert!(text.contains("Amazon (no crop)"));
    }

    #[test]
    fn json_listing_round_trips_through_serde_json() {
        let registry = Registry::builtin().expect("registry");
        let json = render(&registry, true).expect("render");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
        let platforms = value.as_array().expect("array");
        assert_eq!(platforms.len(), 3);
        assert_eq!(platforms[1]["id"], "MEESHO");
        assert_eq!(platforms[1]["variants"][0]["region"]["bry"], 358.0);
        assert_eq!(platforms[2]["crop_disabled"], true);
    }
}
