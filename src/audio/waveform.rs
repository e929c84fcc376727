//! In-memory mono waveform.

use std::ops::Range;

/// Mono audio samples in [-1.0, 1.0] at a fixed sample rate.
///
/// Transforms never mutate a waveform in place; they return a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl Waveform {
    /// Wrap samples recorded at `sample_rate` Hz.
    #[must_use]
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// A waveform of `len` zero samples.
    #[must_use]
    pub fn silence(len: usize, sample_rate: u32) -> Self {
        Self::new(vec![0.0; len], sample_rate)
    }

    /// Sample values.
    #[must_use]
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Sample rate in Hz.
    #[must_use]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the waveform holds no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / f64::from(self.sample_rate)
    }

    /// Convert a duration in seconds to a sample count at this rate, rounded.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn secs_to_samples(&self, secs: f64) -> usize {
        (secs.max(0.0) * f64::from(self.sample_rate)).round() as usize
    }

    /// Convert whole milliseconds to a sample count at this rate, floored.
    #[must_use]
    pub fn millis_to_samples(&self, millis: u64) -> usize {
        usize::try_from(millis * u64::from(self.sample_rate) / 1000).unwrap_or(usize::MAX)
    }

    /// Copy of the samples in `range`, clamped to the waveform bounds.
    #[must_use]
    pub fn slice(&self, range: Range<usize>) -> Self {
        let end = range.end.min(self.samples.len());
        let start = range.start.min(end);
        Self::new(self.samples[start..end].to_vec(), self.sample_rate)
    }

    /// Take ownership of the samples.
    #[must_use]
    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_secs() {
        let wave = Waveform::silence(24_000, 16_000);
        assert_eq!(wave.duration_secs(), 1.5);
    }

    #[test]
    fn test_slice_clamps_out_of_bounds_range() {
        let wave = Waveform::new(vec![0.1, 0.2, 0.3], 16_000);
        assert_eq!(wave.slice(1..10).samples(), &[0.2, 0.3]);
        assert!(wave.slice(5..10).is_empty());
    }

    #[test]
    fn test_millis_to_samples_floors() {
        let wave = Waveform::silence(0, 44_100);
        // 1 ms at 44.1 kHz is 44.1 samples
        assert_eq!(wave.millis_to_samples(1), 44);
        assert_eq!(wave.millis_to_samples(10), 441);
    }

    #[test]
    fn test_secs_to_samples_rounds() {
        let wave = Waveform::silence(0, 16_000);
        assert_eq!(wave.secs_to_samples(0.2), 3200);
        assert_eq!(wave.secs_to_samples(-1.0), 0);
    }
}
