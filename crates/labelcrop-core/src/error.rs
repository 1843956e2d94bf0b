// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for labelcrop.

use thiserror::Error;

/// Top-level error type for all labelcrop operations.
#[derive(Debug, Error)]
pub enum LabelcropError {
    // -- Document errors --
    #[error("malformed PDF document: {0}")]
    MalformedDocument(String),

    /// Non-fatal: degrades SKU stamping to a no-op for the affected page(s).
    #[error("text layer unavailable: {0}")]
    TextLayerUnavailable(String),

    #[error("PDF serialization failed: {0}")]
    SerializationFailure(String),

    // -- Request validation --
    #[error("no input documents supplied")]
    EmptyInput,

    #[error("unknown platform: {0}")]
    UnknownPlatform(String),

    #[error("unknown variant or option {id:?} for platform {platform:?}")]
    UnknownVariantOrOption { platform: String, id: String },

    #[error("conflicting page options: {0}")]
    ConflictingOptions(String),

    // -- Registry --
    #[error("invalid crop region {id:?} on platform {platform:?}: {reason}")]
    InvalidCropRegion {
        platform: String,
        id: String,
        reason: String,
    },

    // -- Orchestration --
    #[error("a conversion run is already in progress")]
    RunInProgress,

    #[error("pipeline worker failed: {0}")]
    Worker(String),

    // -- Storage / configuration --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

impl LabelcropError {
    /// Whether this error aborts a run. Text-layer problems only degrade
    /// SKU stamping.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::TextLayerUnavailable(_))
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, LabelcropError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_text_layer_errors_are_non_fatal() {
        assert!(!LabelcropError::TextLayerUnavailable("page 3".into()).is_fatal());
        assert!(LabelcropError::MalformedDocument("bad xref".into()).is_fatal());
        assert!(LabelcropError::SerializationFailure("disk".into()).is_fatal());
        assert!(LabelcropError::RunInProgress.is_fatal());
    }

    #[test]
    fn unknown_variant_message_names_platform() {
        let err = LabelcropError::UnknownVariantOrOption {
            platform: "MEESHO".into(),
            id: "sideways".into(),
        };
        let message = err.to_string();
        assert!(message.contains("MEESHO"));
        assert!(message.contains("sideways"));
    }
}
