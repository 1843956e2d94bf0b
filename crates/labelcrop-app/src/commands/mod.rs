// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Subcommands.

pub mod crop;
pub mod platforms;

use labelcrop_core::error::LabelcropError;
use labelcrop_core::human_errors::humanize_error;

/// What to tell the user when a command fails.
///
/// Pipeline errors get their plain-language message and suggestion; anything
/// else (file I/O, mostly) is shown with its context chain.
pub fn describe_failure(err: &anyhow::Error) -> String {
    match err
        .chain()
        .find_map(|cause| cause.downcast_ref::<LabelcropError>())
    {
        Some(labelcrop_err) => {
            let human = humanize_error(labelcrop_err);
            format!("{}\n{}", human.message, human.suggestion)
        }
        None => format!("error: {err:#}"),
    }
}
