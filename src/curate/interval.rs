//! Target interval construction.

use std::ops::Range;

use serde::Serialize;

use super::ExceedanceWindow;
use crate::audio::Waveform;

/// Span of the source waveform holding the sound of interest plus its lead-in margin.
///
/// Invariant: `0 <= start < end <= source length`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TargetInterval {
    start: usize,
    end: usize,
    sample_rate: u32,
}

impl TargetInterval {
    /// Widen `window` by `lead_in_secs` on both sides, clamped to the waveform.
    ///
    /// The end is exclusive and always lies past the last exceeding sample.
    #[must_use]
    pub fn from_window(window: ExceedanceWindow, wave: &Waveform, lead_in_secs: f64) -> Self {
        let lead = wave.secs_to_samples(lead_in_secs);
        let start = window.first.saturating_sub(lead);
        let end = window
            .last
            .saturating_add(lead)
            .min(wave.len())
            .max(window.last + 1);

        Self {
            start,
            end,
            sample_rate: wave.sample_rate(),
        }
    }

    /// First sample of the interval.
    #[must_use]
    pub fn start(&self) -> usize {
        self.start
    }

    /// One past the last sample of the interval.
    #[must_use]
    pub fn end(&self) -> usize {
        self.end
    }

    /// Sample range covered by the interval.
    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Start time in seconds.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn start_secs(&self) -> f64 {
        self.start as f64 / f64::from(self.sample_rate)
    }

    /// End time in seconds.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn end_secs(&self) -> f64 {
        self.end as f64 / f64::from(self.sample_rate)
    }

    /// Length in seconds.
    #[must_use]
    pub fn duration_secs(&self) -> f64 {
        self.end_secs() - self.start_secs()
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_adds_lead_in_both_sides() {
        let wave = Waveform::silence(32_000, 16_000);
        let window = ExceedanceWindow {
            first: 8_000,
            last: 17_600,
        };
        let interval = TargetInterval::from_window(window, &wave, 0.2);

        assert_eq!(interval.range(), 4_800..20_800);
        assert!((interval.start_secs() - 0.3).abs() < 1e-9);
        assert!((interval.end_secs() - 1.3).abs() < 1e-9);
        assert!((interval.duration_secs() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_interval_clamps_to_waveform_bounds() {
        let wave = Waveform::silence(16_000, 16_000);
        let window = ExceedanceWindow {
            first: 1_000,
            last: 15_500,
        };
        let interval = TargetInterval::from_window(window, &wave, 0.2);

        assert_eq!(interval.start(), 0);
        assert_eq!(interval.end(), 16_000);
        assert_eq!(interval.end_secs(), wave.duration_secs());
    }

    #[test]
    fn test_interval_is_never_empty() {
        let wave = Waveform::silence(10, 16_000);
        let window = ExceedanceWindow { first: 9, last: 9 };
        let interval = TargetInterval::from_window(window, &wave, 0.0);

        assert!(interval.start() < interval.end());
        assert!(interval.end() <= wave.len());
    }

    #[test]
    fn test_interval_is_deterministic() {
        let wave = Waveform::silence(48_000, 16_000);
        let window = ExceedanceWindow {
            first: 20_000,
            last: 30_000,
        };
        assert_eq!(
            TargetInterval::from_window(window, &wave, 0.2),
            TargetInterval::from_window(window, &wave, 0.2)
        );
    }
}
