// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Plain-language error messages for sellers printing their labels.
//
// The front end shows one notification per failed run; the technical error
// goes to the log. Severity drives how that notification is presented.

use crate::error::LabelcropError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Wait and try again.
    Transient,
    /// User must change something (pick another file, variant, or option).
    ActionRequired,
    /// Cannot be fixed by retrying; needs a code or config fix.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether resubmitting the same request can succeed.
    pub retriable: bool,
    pub severity: Severity,
}

impl HumanError {
    fn new(message: &str, suggestion: impl Into<String>, retriable: bool, severity: Severity) -> Self {
        Self {
            message: message.into(),
            suggestion: suggestion.into(),
            retriable,
            severity,
        }
    }
}

/// Convert a `LabelcropError` into a `HumanError`.
pub fn humanize_error(err: &LabelcropError) -> HumanError {
    match err {
        // -- Document errors --
        LabelcropError::MalformedDocument(_) => HumanError::new(
            "Failed to process PDF. Please check the file.",
            "The file may be damaged or not a PDF. Download the label again from the marketplace and retry.",
            false,
            Severity::ActionRequired,
        ),

        LabelcropError::TextLayerUnavailable(_) => HumanError::new(
            "We couldn't read the text on some pages.",
            "SKU codes were skipped for those pages. Scanned labels have no text to read.",
            false,
            Severity::Transient,
        ),

        LabelcropError::SerializationFailure(_) => HumanError::new(
            "We couldn't save the cropped labels.",
            "Try again. If this keeps happening, try processing fewer files at once.",
            true,
            Severity::Transient,
        ),

        // -- Request validation --
        LabelcropError::EmptyInput => HumanError::new(
            "No files selected.",
            "Choose at least one label PDF, then try again.",
            false,
            Severity::ActionRequired,
        ),

        LabelcropError::UnknownPlatform(platform) => HumanError::new(
            "That marketplace isn't supported.",
            format!("Pick one of the listed marketplaces. (Requested: {platform})"),
            false,
            Severity::ActionRequired,
        ),

        LabelcropError::UnknownVariantOrOption { platform, id } => HumanError::new(
            "That label layout isn't available for this marketplace.",
            format!("Choose one of the layouts listed for {platform}. (Requested: {id})"),
            false,
            Severity::ActionRequired,
        ),

        LabelcropError::ConflictingOptions(_) => HumanError::new(
            "Those page options can't be used together.",
            "Select only one page option and try again.",
            false,
            Severity::ActionRequired,
        ),

        LabelcropError::InvalidCropRegion { .. } => HumanError::new(
            "This marketplace's crop settings are broken.",
            "Please report this problem; the label size configured for this layout is empty.",
            false,
            Severity::Permanent,
        ),

        // -- Orchestration --
        LabelcropError::RunInProgress => HumanError::new(
            "Your previous labels are still being processed.",
            "Wait for them to finish, then try again.",
            true,
            Severity::Transient,
        ),

        LabelcropError::Worker(_) => HumanError::new(
            "Processing stopped unexpectedly.",
            "Try again. If this keeps happening, please report it.",
            true,
            Severity::Transient,
        ),

        // -- Storage / configuration --
        LabelcropError::Io(io_err) => match io_err.kind() {
            std::io::ErrorKind::NotFound => HumanError::new(
                "The file couldn't be found.",
                "It may have been moved or deleted. Try choosing the file again.",
                false,
                Severity::ActionRequired,
            ),
            std::io::ErrorKind::PermissionDenied => HumanError::new(
                "We don't have permission to use that file.",
                "Check the file permissions, or copy the file somewhere else first.",
                false,
                Severity::ActionRequired,
            ),
            _ => HumanError::new(
                "There was a problem reading or writing a file.",
                "Try again. If this keeps happening, your disk may be full.",
                true,
                Severity::Transient,
            ),
        },

        LabelcropError::Config(_) => HumanError::new(
            "The settings file couldn't be read.",
            "Fix the JSON in the settings file, or delete it to use the defaults.",
            false,
            Severity::ActionRequired,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_pdf_asks_user_to_check_file() {
        let human = humanize_error(&LabelcropError::MalformedDocument("no xref".into()));
        assert_eq!(human.severity, Severity::ActionRequired);
        assert!(!human.retriable);
        assert!(human.message.contains("check the file"));
    }

    #[test]
    fn busy_pipeline_is_retriable() {
        let human = humanize_error(&LabelcropError::RunInProgress);
        assert_eq!(human.severity, Severity::Transient);
        assert!(human.retriable);
    }

    #[test]
    fn unknown_variant_names_platform() {
        let human = humanize_error(&LabelcropError::UnknownVariantOrOption {
            platform: "MEESHO".into(),
            id: "landscape".into(),
        });
        assert!(human.suggestion.contains("MEESHO"));
        assert!(human.suggestion.contains("landscape"));
    }

    #[test]
    fn broken_region_is_permanent() {
        let human = humanize_error(&LabelcropError::InvalidCropRegion {
            platform: "X".into(),
            id: "y".into(),
            reason: "zero width".into(),
        });
        assert_eq!(human.severity, Severity::Permanent);
    }

    #[test]
    fn missing_file_is_action_required() {
        let err = LabelcropError::Io(std::io::Error::from(std::io::ErrorKind::NotFound));
        assert_eq!(humanize_error(&err).severity, Severity::ActionRequired);
    }
}
