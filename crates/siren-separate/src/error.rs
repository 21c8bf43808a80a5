//! Error types for the source separation crate.

use std::path::PathBuf;

use siren_format::WavError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SeparateError {
    #[error(transparent)]
    Format(#[from] WavError),

    #[error(
        "Isolator '{isolator}' returned {got_frames} frames x {got_channels} channels \
         for label '{label}', expected {expected_frames} x {expected_channels}"
    )]
    ShapeMismatch {
        isolator: String,
        label: String,
        expected_frames: usize,
        expected_channels: usize,
        got_frames: usize,
        got_channels: usize,
    },

    #[error("Label '{0}' cannot be used as an output file name")]
    InvalidLabel(String),

    #[error("Unknown isolator: {0} (available: {available})", available = crate::ISOLATORS.join(", "))]
    UnknownIsolator(String),

    /// First failure under the abort policy. `written` lists the files
    /// completed before the split stopped; they are left on disk.
    #[error("Label '{label}' failed: {source}")]
    LabelFailed {
        label: String,
        #[source]
        source: Box<SeparateError>,
        written: Vec<PathBuf>,
    },
}

pub type Result<T> = std::result::Result<T, SeparateError>;
