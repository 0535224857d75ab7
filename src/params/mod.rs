// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Parameters for `halopaint` runs.
//!
//! The code here "mirrors" the code within the `cli` module; the idea is that
//! `cli` is unparsed, user-facing code, whereas parameters have been parsed
//! and are ready to be used directly.

mod paint;

pub(crate) use paint::{ModelParams, PaintParams, PaintRunError};

use indicatif::{ProgressBar, ProgressStyle};
use strum_macros::{Display, EnumIter, EnumString};

/// The floating-point precision used for sources and maps.
#[derive(Debug, Display, EnumIter, EnumString, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Precision {
    #[strum(serialize = "single")]
    Single,
    #[strum(serialize = "double")]
    Double,
}

/// The source models that can be painted.
#[derive(Debug, Display, EnumIter, EnumString, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SourceModelType {
    /// The Planck 2013 CIB model.
    #[strum(serialize = "cib")]
    Cib,

    /// FR I and FR II radio galaxies.
    #[strum(serialize = "radio")]
    Radio,
}

/// A progress bar in the style used by every `halopaint` stage.
pub(crate) fn styled_progress_bar(len: u64, unit: &str, message: &'static str) -> ProgressBar {
    let template = format!(
        "{{msg:17}}: [{{wide_bar:.blue}}] {{pos:2}}/{{len:2}} {unit} ({{elapsed_precise}}<{{eta_precise}})"
    );
    let style = ProgressStyle::default_bar()
        .template(&template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ");
    ProgressBar::new(len)
        .with_style(style)
        .with_position(0)
        .with_message(message)
}
