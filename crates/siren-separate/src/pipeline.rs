//! Splitting pipeline: isolate and encode one output file per source label.
//!
//! The input container is decoded once by the caller and shared read-only
//! across labels. For every label the pipeline:
//!
//! 1. Checks the label is usable as a file stem.
//! 2. Runs the [`SourceIsolator`] on the full sample matrix.
//! 3. Verifies the isolated matrix kept the input's shape.
//! 4. Derives a container carrying the input's header and the new samples.
//! 5. Writes `{output_dir}/{label}.wav`.
//!
//! Files written before a failure are left in place.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;
use siren_format::{Container, SourceLabel, WavError, WavWriter};

use crate::error::{Result, SeparateError};
use crate::identity::IdentityIsolation;
use crate::SourceIsolator;

/// What happens to the remaining labels after one fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop at the first failure and return it.
    #[default]
    Abort,
    /// Keep going and record every failure in the [`SplitReport`].
    Continue,
}

/// Pipeline configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct SplitOptions {
    pub failure_policy: FailurePolicy,
    /// Process labels on the rayon pool instead of one after another.
    pub parallel: bool,
}

/// Result for a single label.
#[derive(Debug)]
pub struct LabelOutcome {
    pub label: SourceLabel,
    /// `Ok` holds the path of the written file.
    pub result: std::result::Result<PathBuf, SeparateError>,
}

impl LabelOutcome {
    pub fn is_written(&self) -> bool {
        self.result.is_ok()
    }
}

/// Per-label outcomes, in the order the labels were requested.
#[derive(Debug, Default)]
pub struct SplitReport {
    pub outcomes: Vec<LabelOutcome>,
}

impl SplitReport {
    /// Paths of every file written.
    pub fn written(&self) -> impl Iterator<Item = &Path> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().ok().map(PathBuf::as_path))
    }

    /// Labels that failed, with their errors.
    pub fn failures(&self) -> impl Iterator<Item = (&SourceLabel, &SeparateError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (&o.label, e)))
    }

    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(LabelOutcome::is_written)
    }
}

/// Runs an isolator over a list of labels and writes one file per label.
pub struct Splitter<'a> {
    isolator: &'a dyn SourceIsolator,
    writer: WavWriter,
    options: SplitOptions,
}

impl<'a> Splitter<'a> {
    pub fn new(isolator: &'a dyn SourceIsolator) -> Self {
        Self {
            isolator,
            writer: WavWriter::new(),
            options: SplitOptions::default(),
        }
    }

    pub fn with_writer(mut self, writer: WavWriter) -> Self {
        self.writer = writer;
        self
    }

    pub fn with_options(mut self, options: SplitOptions) -> Self {
        self.options = options;
        self
    }

    /// Split `container` into `{output_dir}/{label}.wav` for every label.
    ///
    /// # Errors
    ///
    /// - [`WavError::OutputPathInvalid`] (wrapped) if `output_dir` is not an
    ///   existing directory; nothing is written.
    /// - Under [`FailurePolicy::Abort`], [`SeparateError::LabelFailed`] for the
    ///   first label that failed. Under [`FailurePolicy::Continue`] label
    ///   failures are returned inside the report instead.
    pub fn split(
        &self,
        container: &Container,
        output_dir: &Path,
        labels: &[SourceLabel],
    ) -> Result<SplitReport> {
        if !output_dir.is_dir() {
            return Err(WavError::OutputPathInvalid {
                path: output_dir.to_path_buf(),
            }
            .into());
        }

        tracing::info!(
            isolator = self.isolator.name(),
            labels = labels.len(),
            output_dir = %output_dir.display(),
            parallel = self.options.parallel,
            "Splitting"
        );

        let report = if self.options.parallel {
            self.split_parallel(container, output_dir, labels)?
        } else {
            self.split_sequential(container, output_dir, labels)?
        };

        tracing::info!(
            written = report.written().count(),
            failed = report.failures().count(),
            "Split finished"
        );

        Ok(report)
    }

    fn split_sequential(
        &self,
        container: &Container,
        output_dir: &Path,
        labels: &[SourceLabel],
    ) -> Result<SplitReport> {
        let mut report = SplitReport::default();
        for label in labels {
            let result = self.process_label(container, output_dir, label);
            let outcome = self.settle(label, result, || {
                report.written().map(Path::to_path_buf).collect()
            })?;
            report.outcomes.push(outcome);
        }
        Ok(report)
    }

    fn split_parallel(
        &self,
        container: &Container,
        output_dir: &Path,
        labels: &[SourceLabel],
    ) -> Result<SplitReport> {
        let abort = self.options.failure_policy == FailurePolicy::Abort;
        let stop = AtomicBool::new(false);

        // `None` marks labels skipped after another label failed.
        let results: Vec<Option<Result<PathBuf>>> = labels
            .par_iter()
            .map(|label| {
                if stop.load(Ordering::Relaxed) {
                    tracing::debug!(%label, "Skipped after earlier failure");
                    return None;
                }
                let result = self.process_label(container, output_dir, label);
                if abort && result.is_err() {
                    stop.store(true, Ordering::Relaxed);
                }
                Some(result)
            })
            .collect();

        // Labels after the failing one may already have finished.
        let written: Vec<PathBuf> = results
            .iter()
            .filter_map(|r| r.as_ref().and_then(|r| r.as_ref().ok()).cloned())
            .collect();

        let mut report = SplitReport::default();
        for (label, result) in labels.iter().zip(results) {
            if let Some(result) = result {
                let outcome = self.settle(label, result, || written.clone())?;
                report.outcomes.push(outcome);
            }
        }
        Ok(report)
    }

    /// Apply the failure policy to one label's result. `written` is only
    /// consulted when the split aborts.
    fn settle(
        &self,
        label: &SourceLabel,
        result: Result<PathBuf>,
        written: impl FnOnce() -> Vec<PathBuf>,
    ) -> Result<LabelOutcome> {
        match result {
            Err(e) if self.options.failure_policy == FailurePolicy::Abort => {
                tracing::error!(%label, error = %e, "Label failed, aborting");
                Err(SeparateError::LabelFailed {
                    label: label.to_string(),
                    source: Box::new(e),
                    written: written(),
                })
            }
            Err(e) => {
                tracing::warn!(%label, error = %e, "Label failed, continuing");
                Ok(LabelOutcome {
                    label: label.clone(),
                    result: Err(e),
                })
            }
            Ok(path) => Ok(LabelOutcome {
                label: label.clone(),
                result: Ok(path),
            }),
        }
    }

    fn process_label(
        &self,
        container: &Container,
        output_dir: &Path,
        label: &SourceLabel,
    ) -> Result<PathBuf> {
        if !label.is_safe_file_stem() {
            return Err(SeparateError::InvalidLabel(label.to_string()));
        }

        let isolated = self.isolator.isolate(&container.samples, label)?;
        if !isolated.same_shape(&container.samples) {
            return Err(SeparateError::ShapeMismatch {
                isolator: self.isolator.name().to_string(),
                label: label.to_string(),
                expected_frames: container.samples.frame_count(),
                expected_channels: container.samples.channel_count(),
                got_frames: isolated.frame_count(),
                got_channels: isolated.channel_count(),
            });
        }

        let derived = container.with_samples(isolated);
        let path = output_dir.join(label.file_name());
        self.writer.write(&derived, &path)?;

        tracing::debug!(%label, path = %path.display(), "Label written");
        Ok(path)
    }
}

/// Split with identity isolation, default writer, and default options.
pub fn split(
    container: &Container,
    output_dir: &Path,
    labels: &[SourceLabel],
) -> Result<SplitReport> {
    Splitter::new(&IdentityIsolation).split(container, output_dir, labels)
}
