//! Identity isolation: every label receives the full mix.

use siren_format::{SampleMatrix, SourceLabel};

use crate::error::Result;
use crate::SourceIsolator;

/// Isolator that returns an unchanged copy of its input for every label.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityIsolation;

impl SourceIsolator for IdentityIsolation {
    fn isolate(&self, samples: &SampleMatrix, label: &SourceLabel) -> Result<SampleMatrix> {
        tracing::trace!(%label, frames = samples.frame_count(), "Identity isolation");
        Ok(samples.clone())
    }

    fn name(&self) -> &str {
        "identity"
    }
}
