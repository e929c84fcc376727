//! Stage descriptors.

use std::fmt;
use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::config::FoldersConfig;

/// A kind of artifact a stage consumes or produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    /// Per-source raw data with cleaned `Positive`/`Negative` trees.
    RawSources,
    /// Merged, consistently named clips.
    Collected,
    /// Mono clips at the target sample rate.
    Mono16k,
    /// Peak-normalised clips.
    Normalised,
    /// Clips fitted around the sound of interest.
    Targeted,
    /// Amplitude-perturbed clips.
    Perturbed,
}

impl ArtifactKind {
    /// Folder holding artifacts of this kind.
    #[must_use]
    pub fn folder(self, folders: &FoldersConfig) -> PathBuf {
        let relative = match self {
            Self::RawSources => &folders.raw_data,
            Self::Collected => &folders.collected,
            Self::Mono16k => &folders.mono_16khz,
            Self::Normalised => &folders.amp_normalised,
            Self::Targeted => &folders.targeted,
            Self::Perturbed => &folders.perturbed,
        };
        folders.resolve(relative)
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::RawSources => "raw source",
            Self::Collected => "collected",
            Self::Mono16k => "mono 16 kHz",
            Self::Normalised => "normalised",
            Self::Targeted => "targeted",
            Self::Perturbed => "perturbed",
        };
        write!(f, "{name}")
    }
}

/// A curation stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Merge every source into one consistently named tree.
    Collect,
    /// Downmix to mono and resample.
    Convert,
    /// Peak-normalise.
    Normalise,
    /// Cut the target window from single-event clips.
    Extract,
    /// Cut target windows from scratch recordings in two passes.
    Scratch,
    /// Write gain-shifted copies.
    Perturb,
}

impl Stage {
    /// Every stage in default execution order.
    pub const ALL: [Self; 6] = [
        Self::Collect,
        Self::Convert,
        Self::Normalise,
        Self::Extract,
        Self::Scratch,
        Self::Perturb,
    ];

    /// Command-line name of the stage.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Collect => "collect",
            Self::Convert => "convert",
            Self::Normalise => "normalise",
            Self::Extract => "extract",
            Self::Scratch => "scratch",
            Self::Perturb => "perturb",
        }
    }

    /// One-line description.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Collect => "merge cleaned source data into one numbered tree",
            Self::Convert => "downmix to mono and resample to the target rate",
            Self::Normalise => "scale each clip so its peak sits at the headroom",
            Self::Extract => "cut a 1-2 s window around the sound of interest",
            Self::Scratch => "extract scratch recordings, with a second pass over leftovers",
            Self::Perturb => "write one copy per gain offset",
        }
    }

    /// Artifact kind the stage reads.
    #[must_use]
    pub const fn input(self) -> ArtifactKind {
        match self {
            Self::Collect => ArtifactKind::RawSources,
            Self::Convert => ArtifactKind::Collected,
            Self::Normalise => ArtifactKind::Mono16k,
            Self::Extract | Self::Scratch => ArtifactKind::Normalised,
            Self::Perturb => ArtifactKind::Targeted,
        }
    }

    /// Artifact kind the stage writes.
    #[must_use]
    pub const fn output(self) -> ArtifactKind {
        match self {
            Self::Collect => ArtifactKind::Collected,
            Self::Convert => ArtifactKind::Mono16k,
            Self::Normalise => ArtifactKind::Normalised,
            Self::Extract | Self::Scratch => ArtifactKind::Targeted,
            Self::Perturb => ArtifactKind::Perturbed,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
