//! Ordered, validated sequences of curation stages.

mod stage;

pub use stage::{ArtifactKind, Stage};

use std::collections::HashSet;
use std::time::Instant;

use tracing::info;

use crate::config::FoldersConfig;
use crate::error::{Error, Result};
use crate::output::write_manifest;
use crate::stages::{StageContext, StageReport, clean_folder, run_stage};

/// A sequence of stages in which every stage's input is either produced by
/// an earlier stage or read from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    /// Build a pipeline, checking the stage order.
    ///
    /// # Errors
    ///
    /// Returns an error if `stages` is empty, lists a stage twice, or runs a
    /// stage before the stage producing its input.
    pub fn new(stages: Vec<Stage>) -> Result<Self> {
        if stages.is_empty() {
            return Err(Error::EmptyPipeline);
        }

        let mut seen = HashSet::new();
        if let Some(stage) = stages.iter().find(|s| !seen.insert(**s)) {
            return Err(Error::DuplicateStage {
                stage: stage.to_string(),
            });
        }

        for (i, stage) in stages.iter().enumerate() {
            if let Some(producer) = stages[i + 1..]
                .iter()
                .find(|later| later.output() == stage.input())
            {
                return Err(Error::PipelineOrder {
                    stage: stage.to_string(),
                    needs: stage.input().to_string(),
                    producer: producer.to_string(),
                });
            }
        }

        Ok(Self { stages })
    }

    /// Every stage in default order.
    #[must_use]
    pub fn full() -> Self {
        Self {
            stages: Stage::ALL.to_vec(),
        }
    }

    /// Stages in execution order.
    #[must_use]
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Check that inputs not produced within the pipeline exist on disk.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingStageInput`] for the first stage whose input
    /// folder is missing.
    pub fn check_inputs(&self, folders: &FoldersConfig) -> Result<()> {
        for (i, stage) in self.stages.iter().enumerate() {
            let needs = stage.input();
            if self.stages[..i].iter().any(|s| s.output() == needs) {
                continue;
            }

            let path = needs.folder(folders);
            if !path.is_dir() {
                return Err(Error::MissingStageInput {
                    stage: stage.to_string(),
                    needs: needs.to_string(),
                    path,
                });
            }
        }

        Ok(())
    }

    /// Run every stage in order, writing a manifest after each.
    ///
    /// With `clean` set, each destination folder is emptied once, before the
    /// first stage writing to it.
    ///
    /// # Errors
    ///
    /// Returns the first stage-level error. Per-file failures are only
    /// counted in the reports.
    pub fn run(&self, ctx: &StageContext<'_>, clean: bool) -> Result<Vec<StageReport>> {
        let folders = &ctx.config.folders;
        self.check_inputs(folders)?;

        let mut cleaned = HashSet::new();
        let mut reports = Vec::with_capacity(self.stages.len());

        for &stage in &self.stages {
            if clean && cleaned.insert(stage.output()) {
                let dest = stage.output().folder(folders);
                info!("Cleaning {}", dest.display());
                clean_folder(&dest)?;
            }

            info!("Running stage '{stage}': {}", stage.description());
            let start = Instant::now();
            let report = run_stage(stage, ctx)?;
            let manifest = write_manifest(&report)?;

            info!(
                "Stage '{stage}' complete: {} processed, {} skipped, {} failed, {} written in {:.2}s",
                report.processed,
                report.skipped,
                report.failed,
                report.outputs.len(),
                start.elapsed().as_secs_f64()
            );
            info!("Manifest written to {}", manifest.display());

            reports.push(report);
        }

        Ok(reports)
    }
}
