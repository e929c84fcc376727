//! Configuration type definitions.

use crate::constants::{
    PERTURB_GAINS_DB, TARGET_SAMPLE_RATE,
    extract::{
        AMPLITUDE_THRESHOLD, LEAD_IN_SECS, MAX_LENGTH_SECS, MIN_LEFTOVER_SECS, MIN_LENGTH_SECS,
        SCRATCH_CATEGORIES,
    },
    layout, normalise,
};
use crate::curate::{ExtractParams, LengthBand};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Folder layout of the dataset.
    pub folders: FoldersConfig,

    /// Mono/sample-rate conversion settings.
    pub convert: ConvertConfig,

    /// Peak normalization settings.
    pub normalise: NormaliseConfig,

    /// Target window extraction settings.
    pub extract: ExtractConfig,

    /// Amplitude perturbation settings.
    pub perturb: PerturbConfig,
}

/// Dataset folders. Relative paths are resolved against `root`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FoldersConfig {
    /// Base directory for all relative folder paths.
    pub root: PathBuf,
    /// Raw data, one sub-folder per source (e.g. `1_Kaggle`).
    pub raw_data: PathBuf,
    /// Name of the cleaned-data folder inside each source folder.
    pub clean_location: String,
    /// Merged, renamed clips from every source.
    pub collected: PathBuf,
    /// Mono, 16 kHz clips.
    pub mono_16khz: PathBuf,
    /// Peak-normalised clips.
    pub amp_normalised: PathBuf,
    /// Clips fitted around the sound of interest.
    pub targeted: PathBuf,
    /// Amplitude-perturbed clips.
    pub perturbed: PathBuf,
    /// Scratch space for second-pass leftovers.
    pub temp: PathBuf,
}

impl Default for FoldersConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            raw_data: PathBuf::from("raw-data"),
            clean_location: "clean".to_string(),
            collected: PathBuf::from("data"),
            mono_16khz: PathBuf::from("transformed-data/mono_16khz"),
            amp_normalised: PathBuf::from("transformed-data/amp_normalised"),
            targeted: PathBuf::from("transformed-data/targeted_1-2s"),
            perturbed: PathBuf::from("transformed-data/amp_perturbed"),
            temp: PathBuf::from("temp"),
        }
    }
}

impl FoldersConfig {
    /// Resolve `path` against the root unless it is absolute.
    #[must_use]
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Folder holding leftover audio awaiting the second pass.
    #[must_use]
    pub fn temp_leftover(&self) -> PathBuf {
        self.resolve(&self.temp).join(layout::TEMP_LEFTOVER)
    }

    /// Folder holding normalised leftover audio.
    #[must_use]
    pub fn temp_normalised(&self) -> PathBuf {
        self.resolve(&self.temp).join(layout::TEMP_NORMALISED)
    }
}

/// Mono/sample-rate conversion settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertConfig {
    /// Output sample rate in Hz.
    pub sample_rate: u32,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            sample_rate: TARGET_SAMPLE_RATE,
        }
    }
}

/// Peak normalization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NormaliseConfig {
    /// dB below full scale the peak is placed at.
    pub headroom_db: f64,
}

impl Default for NormaliseConfig {
    fn default() -> Self {
        Self {
            headroom_db: normalise::HEADROOM_DB,
        }
    }
}

/// Target window extraction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Absolute amplitude a sample must exceed.
    pub threshold: f32,
    /// Margin before and after the exceedance window, in seconds.
    pub lead_in_secs: f64,
    /// Shortest output clip, in seconds.
    pub min_length_secs: f64,
    /// Longest output clip, in seconds.
    pub max_length_secs: f64,
    /// Leftover audio must be longer than this for a second pass, in seconds.
    pub min_leftover_secs: f64,
    /// Categories skipped by `extract` and handled by `scratch` instead.
    pub scratch_categories: Vec<String>,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            threshold: AMPLITUDE_THRESHOLD,
            lead_in_secs: LEAD_IN_SECS,
            min_length_secs: MIN_LENGTH_SECS,
            max_length_secs: MAX_LENGTH_SECS,
            min_leftover_secs: MIN_LEFTOVER_SECS,
            scratch_categories: SCRATCH_CATEGORIES.iter().map(ToString::to_string).collect(),
        }
    }
}

impl ExtractConfig {
    /// Extractor parameters for these settings.
    #[must_use]
    pub fn params(&self) -> ExtractParams {
        ExtractParams {
            threshold: self.threshold,
            lead_in_secs: self.lead_in_secs,
            band: LengthBand::new(self.min_length_secs, self.max_length_secs),
        }
    }

    /// Whether `category` holds multi-event scratch recordings.
    #[must_use]
    pub fn is_scratch(&self, category: &str) -> bool {
        self.scratch_categories.iter().any(|c| c == category)
    }
}

/// Amplitude perturbation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PerturbConfig {
    /// Gain offsets in dB, one output clip each.
    pub gains_db: Vec<i32>,
    /// Categories to perturb; empty means all.
    pub categories: Vec<String>,
}

impl Default for PerturbConfig {
    fn default() -> Self {
        Self {
            gains_db: PERTURB_GAINS_DB.to_vec(),
            categories: Vec::new(),
        }
    }
}

impl PerturbConfig {
    /// Whether clips of `category` get perturbed.
    #[must_use]
    pub fn includes(&self, category: &str) -> bool {
        self.categories.is_empty() || self.categories.iter().any(|c| c == category)
    }
}
