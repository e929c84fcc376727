//! Application-wide constants.
//!
//! All magic numbers and strings are defined here to ensure consistency
//! and make changes easy to track.

/// Application name used for config directories and user-facing messages.
pub const APP_NAME: &str = "catscat";

/// Maximum magnitude of a 16-bit PCM sample, used to map samples to [-1.0, 1.0].
pub const MAX_16BIT_AMP: f32 = 32768.0;

/// Sample rate every clip is converted to.
pub const TARGET_SAMPLE_RATE: u32 = 16_000;

/// Target window extraction defaults.
pub mod extract {
    /// Absolute amplitude a sample must exceed to count as the sound of interest.
    pub const AMPLITUDE_THRESHOLD: f32 = 0.5;

    /// Margin in seconds added before and after the exceedance window.
    pub const LEAD_IN_SECS: f64 = 0.2;

    /// Shortest allowed output clip in seconds.
    pub const MIN_LENGTH_SECS: f64 = 1.0;

    /// Longest allowed output clip in seconds.
    pub const MAX_LENGTH_SECS: f64 = 2.0;

    /// Leftover audio must be longer than this to get a second pass.
    pub const MIN_LEFTOVER_SECS: f64 = 1.0;

    /// Categories holding multi-event recordings that get a second pass.
    pub const SCRATCH_CATEGORIES: &[&str] =
        &["soft-scratch", "hard-scratch", "board-scratch", "pole-scratch"];
}

/// Peak normalization defaults.
pub mod normalise {
    /// Distance in dB below full scale the peak is placed at.
    pub const HEADROOM_DB: f64 = 1.0;
}

/// Amplitude perturbation defaults, largest to smallest.
pub const PERTURB_GAINS_DB: &[i32] = &[15, 5, 0, -5, -15];

/// File name tags appended by each transform.
pub mod tags {
    /// Mono, 16 kHz conversion.
    pub const MONO_16KHZ: &str = "mono_16khz";
    /// Peak amplitude normalization.
    pub const NORMALISED: &str = "normalised";
    /// Target window extraction.
    pub const CENTERED: &str = "centered_1-2s";
    /// Second-pass extraction from leftover audio.
    pub const SECOND_PASS: &str = "2ndpass";
}

/// Raw data layout constants.
pub mod layout {
    /// Category folder holding clips with the sound of interest.
    pub const POSITIVE: &str = "Positive";
    /// Category folder holding clips without it.
    pub const NEGATIVE: &str = "Negative";
    /// Category name given to negative clips.
    pub const NEGATIVE_CATEGORY: &str = "negative";
    /// Stem suffix marking 48 kHz duplicates in negative sources.
    pub const SKIP_48KHZ_SUFFIX: &str = ".48kHz";
    /// Sub-folder of the temp folder holding leftover audio.
    pub const TEMP_LEFTOVER: &str = "temp_leftover";
    /// Sub-folder of the temp folder holding normalised leftovers.
    pub const TEMP_NORMALISED: &str = "temp_norm";
}

/// Suffix of the manifest file each stage writes into its destination.
pub const MANIFEST_SUFFIX: &str = "manifest.json";

/// Supported audio file extensions for input discovery.
pub const AUDIO_EXTENSIONS: &[&str] = &["wav", "flac", "mp3", "m4a", "aac"];
