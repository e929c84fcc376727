//! Duration normalization: fit a clip into the allowed length band.

use serde::Serialize;

use crate::audio::Waveform;

/// Allowed clip duration range in seconds, inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LengthBand {
    /// Shortest allowed duration.
    pub min_secs: f64,
    /// Longest allowed duration.
    pub max_secs: f64,
}

impl LengthBand {
    /// Create a band from `min_secs` to `max_secs`.
    #[must_use]
    pub fn new(min_secs: f64, max_secs: f64) -> Self {
        Self { min_secs, max_secs }
    }
}

/// How [`fit_to_band`] changed a clip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum FitAction {
    /// Already inside the band.
    Unchanged,
    /// Too long: this many milliseconds were cut from each end.
    Trimmed {
        /// Milliseconds removed from each end.
        millis_per_side: u64,
    },
    /// Too short: this many milliseconds of silence were added to each end.
    Padded {
        /// Milliseconds of silence added to each end.
        millis_per_side: u64,
    },
}

/// Trim or pad `segment` so its duration lies within `band`.
///
/// The excess (or shortfall) is split evenly between both ends and converted
/// to whole milliseconds by truncation. Since that conversion can leave the
/// result slightly off target, trimmed clips are then cut to exactly
/// `band.max_secs` and padded clips are set to exactly `band.min_secs`.
#[must_use]
pub fn fit_to_band(segment: &Waveform, band: LengthBand) -> (Waveform, FitAction) {
    let duration = segment.duration_secs();

    if duration > band.max_secs {
        let millis = half_millis(duration - band.max_secs);
        let cut = segment.millis_to_samples(millis);
        let max_len = segment.secs_to_samples(band.max_secs);

        let end = segment.len().saturating_sub(cut).min(cut + max_len);
        let clip = segment.slice(cut..end);

        (
            clip,
            FitAction::Trimmed {
                millis_per_side: millis,
            },
        )
    } else if duration < band.min_secs {
        let millis = half_millis(band.min_secs - duration);
        let pad = segment.millis_to_samples(millis);
        let min_len = segment.secs_to_samples(band.min_secs);

        let mut samples = Vec::with_capacity(min_len.max(segment.len() + 2 * pad));
        samples.resize(pad, 0.0);
        samples.extend_from_slice(segment.samples());
        samples.resize(samples.len() + pad, 0.0);
        // Truncate overshoot, or fill any shortfall left by the millisecond floor
        samples.resize(min_len, 0.0);

        (
            Waveform::new(samples, segment.sample_rate()),
            FitAction::Padded {
                millis_per_side: millis,
            },
        )
    } else {
        (segment.clone(), FitAction::Unchanged)
    }
}

/// Half of `secs`, in whole milliseconds, truncated.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn half_millis(secs: f64) -> u64 {
    (secs * 500.0) as u64
}
