// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform registry: which crop box, variants, and page filters each
// marketplace's label PDFs need.
//
// The registry is plain data. Behaviour lives in the small set of pure
// functions below (`Registry::platform`, `LabelConfig::variant`,
// `LabelConfig::filter`, `Registry::resolve_action`).

use std::collections::BTreeSet;

use serde::Serialize;

use crate::error::{LabelcropError, Result};
use crate::types::{CropRegion, PageParity, PageSelection, RunAction};

/// A named override of a platform's base crop region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Variant {
    pub id: &'static str,
    pub label: &'static str,
    pub region: CropRegion,
}

/// A named page filter offered for a platform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageFilter {
    pub id: &'static str,
    pub label: &'static str,
    pub keep: PageSelection,
}

/// Crop geometry and options for one marketplace.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LabelConfig {
    pub id: &'static str,
    pub label: &'static str,
    /// Icon shown by the front end.
    pub logo: &'static str,
    pub region: CropRegion,
    pub variants: &'static [Variant],
    pub filters: &'static [PageFilter],
    /// Pages pass through with their geometry untouched.
    pub crop_disabled: bool,
}

impl LabelConfig {
    pub fn variant(&self, id: &str) -> Option<&Variant> {
        self.variants.iter().find(|variant| variant.id == id)
    }

    pub fn filter(&self, id: &str) -> Option<&PageFilter> {
        self.filters.iter().find(|filter| filter.id == id)
    }

    /// Effective crop region: a variant replaces the base region wholesale.
    pub fn region_for(&self, variant: Option<&str>) -> Result<CropRegion> {
        match variant {
            None => Ok(self.region),
            Some(id) => self
                .variant(id)
                .map(|variant| variant.region)
                .ok_or_else(|| self.unknown(id)),
        }
    }

    fn unknown(&self, id: &str) -> LabelcropError {
        LabelcropError::UnknownVariantOrOption {
            platform: self.id.to_string(),
            id: id.to_string(),
        }
    }
}

/// Marketplaces supported out of the box. Coordinates are PDF points measured
/// from the top-left corner of the marketplace's label page.
pub static BUILTIN_PLATFORMS: &[LabelConfig] = &[
    LabelConfig {
        id: "FLIPKART",
        label: "Flipkart",
        logo: "./Flipkart.jpg",
        region: CropRegion::new(188.0, 28.0, 407.0, 381.0),
        variants: &[],
        filters: &[],
        crop_disabled: false,
    },
    LabelConfig {
        id: "MEESHO",
        label: "Meesho",
        logo: "./Meesho.jpg",
        region: CropRegion::new(0.0, 0.0, 600.0, 660.0),
        variants: &[
            Variant {
                id: "without_invoice",
                label: "Without Invoice",
                region: CropRegion::new(0.0, 0.0, 600.0, 358.0),
            },
            Variant {
                id: "with_invoice",
                label: "With Invoice",
                region: CropRegion::new(0.0, 0.0, 600.0, 660.0),
            },
        ],
        filters: &[],
        crop_disabled: false,
    },
    LabelConfig {
        id: "AMAZON",
        label: "Amazon",
        logo: "./Amazon.jpg",
        region: CropRegion::new(0.0, 0.0, 210.0, 465.0),
        variants: &[],
        filters: &[PageFilter {
            id: "order_page",
            label: "Select Only Order Page",
            keep: PageSelection::Parity(PageParity::Odd),
        }],
        crop_disabled: true,
    },
];

/// A validated platform table.
#[derive(Debug, Clone, Copy)]
pub struct Registry {
    platforms: &'static [LabelConfig],
}

impl Registry {
    /// Validate and wrap a platform table.
    ///
    /// Every base region and variant region must enclose a positive area;
    /// degenerate regions would produce empty pages.
    pub fn new(platforms: &'static [LabelConfig]) -> Result<Self> {
        for platform in platforms {
            check_region(platform.id, platform.id, &platform.region)?;
            for variant in platform.variants {
                check_region(platform.id, variant.id, &variant.region)?;
            }
        }
        Ok(Self { platforms })
    }

    /// The built-in marketplace table.
    pub fn builtin() -> Result<Self> {
        Self::new(BUILTIN_PLATFORMS)
    }

    pub fn platforms(&self) -> &'static [LabelConfig] {
        self.platforms
    }

    pub fn platform(&self, id: &str) -> Option<&'static LabelConfig> {
        self.platforms.iter().find(|platform| platform.id == id)
    }

    /// Resolve a platform/variant/options selection into the action a run
    /// performs. `Ok(None)` means no platform was selected.
    ///
    /// Rejects unknown ids up front so a mis-cropped label is never produced
    /// by silently falling back to the base region.
    pub fn resolve_action(
        &self,
        platform: Option<&str>,
        variant: Option<&str>,
        options: &BTreeSet<String>,
    ) -> Result<Option<RunAction>> {
        let Some(platform_id) = platform else {
            if let Some(id) = variant.or_else(|| options.iter().next().map(String::as_str)) {
                return Err(LabelcropError::UnknownVariantOrOption {
                    platform: String::new(),
                    id: id.to_string(),
                });
            }
            return Ok(None);
        };

        let config = self
            .platform(platform_id)
            .ok_or_else(|| LabelcropError::UnknownPlatform(platform_id.to_string()))?;

        let region = config.region_for(variant)?;

        let mut keep = PageSelection::All;
        for option in options {
            let filter = config.filter(option).ok_or_else(|| config.unknown(option))?;
            keep = keep.intersect(filter.keep).ok_or_else(|| {
                LabelcropError::ConflictingOptions(format!(
                    "{} cannot be combined with the other selected options",
                    filter.id
                ))
            })?;
        }

        let action = match (config.crop_disabled, keep) {
            (true, PageSelection::All) => RunAction::Passthrough,
            (true, keep) => RunAction::Filter { keep },
            (false, keep) => RunAction::Crop { region, keep },
        };
        Ok(Some(action))
    }
}

fn check_region(platform: &str, id: &str, region: &CropRegion) -> Result<()> {
    if region.is_degenerate() {
        return Err(LabelcropError::InvalidCropRegion {
            platform: platform.to_string(),
            id: id.to_string(),
            reason: format!(
                "width {} and height {} must both be positive",
                region.width(),
                region.height()
            ),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(ids: &[&str]) -> BTreeSet<String> {
        ids.iter().map(|id| id.to_string()).collect()
    }

    #[test]
    fn builtin_table_is_valid() {
        let registry = Registry::builtin().expect("builtin registry");
        assert_eq!(registry.platforms().len(), 3);
        assert!(registry.platform("FLIPKART").is_some());
        assert!(registry.platform("flipkart").is_none());
    }

    #[test]
    fn degenerate_variant_is_rejected() {
        static BROKEN: &[LabelConfig] = &[LabelConfig {
            id: "BROKEN",
            label: "Broken",
            logo: "",
            region: CropRegion::new(0.0, 0.0, 100.0, 100.0),
            variants: &[Variant {
                id: "flat",
                label: "Flat",
                region: CropRegion::new(0.0, 50.0, 100.0, 50.0),
            }],
            filters: &[],
            crop_disabled: false,
        }];
        match Registry::new(BROKEN) {
            Err(LabelcropError::InvalidCropRegion { platform, id, .. }) => {
                assert_eq!(platform, "BROKEN");
                assert_eq!(id, "flat");
            }
            other => panic!("expected InvalidCropRegion, got {other:?}"),
        }
    }

    #[test]
    fn no_platform_means_no_action() {
        let registry = Registry::builtin().expect("builtin registry");
        let action = registry
            .resolve_action(None, None, &BTreeSet::new())
            .expect("resolve");
        assert_eq!(action, None);
    }

    #[test]
    fn variant_without_platform_is_rejected() {
        let registry = Registry::builtin().expect("builtin registry");
        let result = registry.resolve_action(None, Some("with_invoice"), &BTreeSet::new());
        assert!(matches!(
            result,
            Err(LabelcropError::UnknownVariantOrOption { .. })
        ));
    }

    #[test]
    fn flipkart_crops_to_base_region() {
        let registry = Registry::builtin().expect("builtin registry");
        let action = registry
            .resolve_action(Some("FLIPKART"), None, &BTreeSet::new())
            .expect("resolve");
        assert_eq!(
            action,
            Some(RunAction::Crop {
                region: CropRegion::new(188.0, 28.0, 407.0, 381.0),
                keep: PageSelection::All,
            })
        );
    }

    #[test]
    fn variant_replaces_base_region() {
        let registry = Registry::builtin().expect("builtin registry");
        let action = registry
            .resolve_action(Some("MEESHO"), Some("without_invoice"), &BTreeSet::new())
            .expect("resolve");
        match action {
            Some(RunAction::Crop { region, .. }) => {
                assert_eq!(region, CropRegion::new(0.0, 0.0, 600.0, 358.0));
            }
            other => panic!("expected crop, got {other:?}"),
        }
    }

    #[test]
    fn unknown_variant_is_rejected() {
        let registry = Registry::builtin().expect("builtin registry");
        let result = registry.resolve_action(Some("MEESHO"), Some("landscape"), &BTreeSet::new());
        match result {
            Err(LabelcropError::UnknownVariantOrOption { platform, id }) => {
                assert_eq!(platform, "MEESHO");
                assert_eq!(id, "landscape");
            }
            other => panic!("expected UnknownVariantOrOption, got {other:?}"),
        }
    }

    #[test]
    fn option_from_another_platform_is_rejected() {
        let registry = Registry::builtin().expect("builtin registry");
        let result = registry.resolve_action(Some("FLIPKART"), None, &options(&["order_page"]));
        assert!(matches!(
            result,
            Err(LabelcropError::UnknownVariantOrOption { .. })
        ));
    }

    #[test]
    fn unknown_platform_is_rejected() {
        let registry = Registry::builtin().expect("builtin registry");
        let result = registry.resolve_action(Some("EBAY"), None, &BTreeSet::new());
        assert!(matches!(result, Err(LabelcropError::UnknownPlatform(id)) if id == "EBAY"));
    }

    #[test]
    fn amazon_order_page_filters_without_cropping() {
        let registry = Registry::builtin().expect("builtin registry");
        let action = registry
            .resolve_action(Some("AMAZON"), None, &options(&["order_page"]))
            .expect("resolve");
        assert_eq!(
            action,
            Some(RunAction::Filter {
                keep: PageSelection::Parity(PageParity::Odd)
            })
        );

        let plain = registry
            .resolve_action(Some("AMAZON"), None, &BTreeSet::new())
            .expect("resolve");
        assert_eq!(plain, Some(RunAction::Passthrough));
    }

    #[test]
    fn conflicting_parities_are_rejected() {
        static BOTH: &[LabelConfig] = &[LabelConfig {
            id: "BOTH",
            label: "Both",
            logo: "",
            region: CropRegion::new(0.0, 0.0, 100.0, 100.0),
            variants: &[],
            filters: &[
                PageFilter {
                    id: "odd",
                    label: "Odd",
                    keep: PageSelection::Parity(PageParity::Odd),
                },
                PageFilter {
                    id: "even",
                    label: "Even",
                    keep: PageSelection::Parity(PageParity::Even),
                },
            ],
            crop_disabled: false,
        }];
        let registry = Registry::new(BOTH).expect("valid table");
        let result = registry.resolve_action(Some("BOTH"), None, &options(&["odd", "even"]));
        assert!(matches!(result, Err(LabelcropError::ConflictingOptions(_))));

        let crop = registry
            .resolve_action(Some("BOTH"), None, &options(&["even"]))
            .expect("resolve");
        assert_eq!(
            crop,
            Some(RunAction::Crop {
                region: CropRegion::new(0.0, 0.0, 100.0, 100.0),
                keep: PageSelection::Parity(PageParity::Even),
            })
        );
    }
}
