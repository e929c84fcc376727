//! Curation stages.
//!
//! Each stage reads one artifact folder, writes another, and reports what it
//! did in a [`StageReport`]. A file that cannot be processed is logged and
//! counted as failed without stopping the stage.

mod batch;
mod collect;
mod convert;
mod extract;
mod normalise;
mod perturb;

pub use batch::{clean_folder, collect_audio_files, output_path_for};
pub use collect::{CollectState, collect};
pub use convert::convert;
pub use extract::{extract, scratch};
pub use normalise::normalise;
pub use perturb::perturb;

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::Config;
use crate::curate::ClipMeta;
use crate::error::Result;
use crate::pipeline::Stage;

/// Shared inputs of every stage.
#[derive(Debug, Clone, Copy)]
pub struct StageContext<'a> {
    /// Loaded and validated configuration.
    pub config: &'a Config,
    /// Whether to draw progress bars.
    pub progress: bool,
}

impl<'a> StageContext<'a> {
    /// Create a context for `config`.
    #[must_use]
    pub fn new(config: &'a Config, progress: bool) -> Self {
        Self { config, progress }
    }
}

/// One file written by a stage.
#[derive(Debug, Clone, Serialize)]
pub struct OutputRecord {
    /// File the output was derived from.
    pub input: PathBuf,
    /// File that was written.
    pub output: PathBuf,
    /// Provenance of the written clip.
    pub meta: ClipMeta,
}

/// Outcome of a stage run.
#[derive(Debug, Clone, Serialize)]
pub struct StageReport {
    /// Stage that ran.
    pub stage: Stage,
    /// Folder the stage read from.
    pub source: PathBuf,
    /// Folder the stage wrote to.
    pub destination: PathBuf,
    /// Input files that produced output.
    pub processed: usize,
    /// Input files that produced nothing, e.g. no sound above the threshold.
    pub skipped: usize,
    /// Input files that could not be processed.
    pub failed: usize,
    /// Every file written.
    pub outputs: Vec<OutputRecord>,
}

impl StageReport {
    /// Empty report for `stage` moving files from `source` to `destination`.
    #[must_use]
    pub fn new(stage: Stage, source: &Path, destination: &Path) -> Self {
        Self {
            stage,
            source: source.to_path_buf(),
            destination: destination.to_path_buf(),
            processed: 0,
            skipped: 0,
            failed: 0,
            outputs: Vec::new(),
        }
    }

    /// Fold the counts and outputs of `other` into this report.
    pub fn absorb(&mut self, other: Self) {
        self.processed += other.processed;
        self.skipped += other.skipped;
        self.failed += other.failed;
        self.outputs.extend(other.outputs);
    }

    /// Fold only the skipped and failed counts of `other` into this report.
    ///
    /// Used for intermediate steps whose outputs are not part of the stage's
    /// result.
    pub fn absorb_failures(&mut self, other: &Self) {
        self.skipped += other.skipped;
        self.failed += other.failed;
    }
}

/// Run a single stage.
///
/// # Errors
///
/// Returns an error if the stage cannot start, e.g. its source folder is
/// missing or its destination cannot be created.
pub fn run_stage(stage: Stage, ctx: &StageContext<'_>) -> Result<StageReport> {
    match stage {
        Stage::Collect => collect(ctx),
        Stage::Convert => convert(ctx),
        Stage::Normalise => normalise(ctx),
        Stage::Extract => extract(ctx),
        Stage::Scratch => scratch(ctx),
        Stage::Perturb => perturb(ctx),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn report(processed: usize, skipped: usize, failed: usize) -> StageReport {
        let mut report = StageReport::new(Stage::Scratch, Path::new("in"), Path::new("out"));
        report.processed = processed;
        report.skipped = skipped;
        report.failed = failed;
        report
    }

    #[test]
    fn test_absorb_adds_counts() {
        let mut total = report(2, 1, 0);
        total.absorb(report(3, 0, 2));
        assert_eq!((total.processed, total.skipped, total.failed), (5, 1, 2));
    }

    #[test]
    fn test_absorb_failures_keeps_processed_and_outputs() {
        let mut total = report(4, 0, 1);
        let mut intermediate = report(6, 2, 3);
        intermediate.outputs.push(OutputRecord {
            input: PathBuf::from("temp/a.wav"),
            output: PathBuf::from("temp/b.wav"),
            meta: ClipMeta::from_file_name("hiss_000001_001.wav").unwrap(),
        });

        total.absorb_failures(&intermediate);

        assert_eq!(total.processed, 4);
        assert_eq!(total.skipped, 2);
        assert_eq!(total.failed, 4);
        assert!(total.outputs.is_empty());
    }
}
