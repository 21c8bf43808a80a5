//! # siren-separate
//!
//! Source isolation for decoded WAV containers.
//! Provides a capability trait for isolating one source from a mix and the
//! pipeline that runs it once per requested label:
//! - **identity**: returns the mix unchanged (reference behavior)
//!
//! Isolated matrices are written next to each other as `{label}.wav`, each
//! file sharing the header of the input.

pub mod error;
pub mod identity;
pub mod pipeline;

use siren_format::{SampleMatrix, SourceLabel};

pub use error::{Result, SeparateError};
pub use identity::IdentityIsolation;
pub use pipeline::{
    split, FailurePolicy, LabelOutcome, SplitOptions, SplitReport, Splitter,
};

/// Names accepted by [`create_isolator`].
pub const ISOLATORS: &[&str] = &["identity"];

/// Unified trait for source isolation backends.
///
/// Implementations must be pure: no I/O, no mutation of the input, and the
/// returned matrix must have the same frame count and channel count as
/// `samples`. The pipeline checks the shape and rejects anything else.
pub trait SourceIsolator: Send + Sync {
    /// Return the part of `samples` attributed to `label`.
    fn isolate(&self, samples: &SampleMatrix, label: &SourceLabel) -> Result<SampleMatrix>;

    /// Human-readable isolator name.
    fn name(&self) -> &str;
}

/// Create an isolator by name.
///
/// Returns a boxed [`SourceIsolator`] trait object, or
/// [`SeparateError::UnknownIsolator`] for names not in [`ISOLATORS`].
pub fn create_isolator(name: &str) -> Result<Box<dyn SourceIsolator>> {
    match name.to_lowercase().as_str() {
        "identity" | "passthrough" => Ok(Box::new(IdentityIsolation)),
        _ => Err(SeparateError::UnknownIsolator(name.to_string())),
    }
}
