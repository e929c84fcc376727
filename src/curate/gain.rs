//! Amplitude gain: peak normalization and fixed-dB perturbation.

use crate::audio::Waveform;

/// Linear amplitude factor for a gain in decibels.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn db_to_gain(db: f64) -> f32 {
    10f64.powf(db / 20.0) as f32
}

/// Largest absolute sample value.
#[must_use]
pub fn peak(wave: &Waveform) -> f32 {
    wave.samples().iter().fold(0.0f32, |acc, s| acc.max(s.abs()))
}

/// Scale every sample by `db` decibels, clipping at full scale.
///
/// A gain of 0 dB returns an exact copy.
#[must_use]
pub fn apply_gain_db(wave: &Waveform, db: f64) -> Waveform {
    if db == 0.0 {
        return wave.clone();
    }
    scale(wave, db_to_gain(db))
}

/// Scale `wave` so its peak sits `headroom_db` below full scale.
///
/// Silent input is returned unchanged.
#[must_use]
pub fn peak_normalise(wave: &Waveform, headroom_db: f64) -> Waveform {
    let current = peak(wave);
    if current == 0.0 {
        return wave.clone();
    }
    let target = db_to_gain(-headroom_db);
    scale(wave, target / current)
}

fn scale(wave: &Waveform, factor: f32) -> Waveform {
    let samples = wave
        .samples()
        .iter()
        .map(|&s| (s * factor).clamp(-1.0, 1.0))
        .collect();
    Waveform::new(samples, wave.sample_rate())
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;

    fn wave(samples: &[f32]) -> Waveform {
        Waveform::new(samples.to_vec(), 16_000)
    }

    #[test]
    fn test_db_to_gain() {
        assert_eq!(db_to_gain(0.0), 1.0);
        assert!((db_to_gain(20.0) - 10.0).abs() < 1e-5);
        assert!((db_to_gain(-6.0) - 0.501_187).abs() < 1e-5);
    }

    #[test]
    fn test_zero_db_is_identity() {
        let w = wave(&[0.123_456, -0.999, 0.0, 1.0 / 32_768.0]);
        assert_eq!(apply_gain_db(&w, 0.0), w);
    }

    #[test]
    fn test_plus_five_db_scales_every_sample() {
        let w = wave(&[0.1, -0.2, 0.3]);
        let louder = apply_gain_db(&w, 5.0);
        let factor = 10f32.powf(5.0 / 20.0);
        for (a, b) in w.samples().iter().zip(louder.samples()) {
            assert!((a * factor - b).abs() < 1e-6);
        }
    }

    #[test]
    fn test_gain_clips_at_full_scale() {
        let w = wave(&[0.5, -0.5, 0.01]);
        let louder = apply_gain_db(&w, 15.0);
        assert_eq!(louder.samples()[0], 1.0);
        assert_eq!(louder.samples()[1], -1.0);
        assert!(louder.samples()[2] < 1.0);
    }

    #[test]
    fn test_peak_normalise_places_peak_below_full_scale() {
        let w = wave(&[0.1, -0.25, 0.05]);
        let normalised = peak_normalise(&w, 1.0);
        assert!((peak(&normalised) - db_to_gain(-1.0)).abs() < 1e-6);
        // Shape is preserved
        assert!((normalised.samples()[0] / normalised.samples()[1] + 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_peak_normalise_silence_unchanged() {
        let w = wave(&[0.0; 16]);
        assert_eq!(peak_normalise(&w, 1.0), w);
    }
}
