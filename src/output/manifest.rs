//! Per-stage JSON manifests.
//!
//! Every stage leaves a manifest in its destination folder listing what it
//! read and wrote, so a dataset can be traced back to its raw sources.

use std::io::BufWriter;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::constants::{APP_NAME, MANIFEST_SUFFIX};
use crate::error::{Error, Result};
use crate::pipeline::Stage;
use crate::stages::StageReport;

/// Manifest version written into every file.
pub const MANIFEST_VERSION: &str = "1.0";

/// Serialized form of a stage report.
#[derive(Debug, Serialize)]
pub struct Manifest<'a> {
    /// Manifest format version.
    pub version: &'static str,
    /// Version of the tool that wrote it.
    pub tool_version: &'static str,
    /// When the stage finished.
    pub timestamp: DateTime<Utc>,
    /// The stage report.
    #[serde(flatten)]
    pub report: &'a StageReport,
}

impl<'a> Manifest<'a> {
    /// Wrap `report` with the current timestamp.
    #[must_use]
    pub fn new(report: &'a StageReport) -> Self {
        Self {
            version: MANIFEST_VERSION,
            tool_version: env!("CARGO_PKG_VERSION"),
            timestamp: Utc::now(),
            report,
        }
    }
}

/// Path of the manifest `stage` writes into `destination`.
#[must_use]
pub fn manifest_path(destination: &Path, stage: Stage) -> PathBuf {
    destination.join(format!("{APP_NAME}-{stage}-{MANIFEST_SUFFIX}"))
}

/// Write the manifest of `report` into its destination folder.
///
/// # Errors
///
/// Returns an error if the folder cannot be created or the file written.
pub fn write_manifest(report: &StageReport) -> Result<PathBuf> {
    std::fs::create_dir_all(&report.destination).map_err(|e| Error::OutputDirCreateFailed {
        path: report.destination.clone(),
        source: e,
    })?;

    let path = manifest_path(&report.destination, report.stage);
    let file = std::fs::File::create(&path)?;
    serde_json::to_writer_pretty(BufWriter::new(file), &Manifest::new(report)).map_err(|e| {
        Error::ManifestWrite {
            path: path.clone(),
            source: e,
        }
    })?;

    Ok(path)
}
