//! Target window extraction and clip transforms.
//!
//! The extractor scans a waveform for the span where the amplitude exceeds a
//! threshold, widens it by a lead-in margin, and fits the result into a fixed
//! duration band. Whatever remains of the recording after the target span is
//! cut out can be fed through the extractor a second time to recover further
//! events from multi-event recordings.

mod detect;
mod fit;
mod gain;
mod interval;
mod leftover;
mod meta;

pub use detect::{ExceedanceWindow, detect_exceedance};
pub use fit::{FitAction, LengthBand, fit_to_band};
pub use gain::{apply_gain_db, db_to_gain, peak, peak_normalise};
pub use interval::TargetInterval;
pub use leftover::{leftover_audio, second_pass_leftover};
pub use meta::{ClipMeta, Transform, gain_tag};

use crate::audio::Waveform;

/// Parameters of the target window extractor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtractParams {
    /// Absolute amplitude a sample must exceed.
    pub threshold: f32,
    /// Margin added on both sides of the exceedance window, in seconds.
    pub lead_in_secs: f64,
    /// Allowed output duration band.
    pub band: LengthBand,
}

/// A clip cut from a source waveform.
#[derive(Debug, Clone)]
pub struct Extraction {
    /// Where the sound of interest was found.
    pub window: ExceedanceWindow,
    /// Source span the clip was cut from.
    pub interval: TargetInterval,
    /// Clip after fitting into the duration band.
    pub clip: Waveform,
    /// How the clip length was adjusted.
    pub action: FitAction,
}

/// Locate the sound of interest and cut a band-fitted clip around it.
///
/// Returns `None` when no sample exceeds the threshold.
#[must_use]
pub fn extract_target(wave: &Waveform, params: &ExtractParams) -> Option<Extraction> {
    let window = detect_exceedance(wave, params.threshold)?;
    let interval = TargetInterval::from_window(window, wave, params.lead_in_secs);
    let segment = wave.slice(interval.range());
    let (clip, action) = fit_to_band(&segment, params.band);

    Some(Extraction {
        window,
        interval,
        clip,
        action,
    })
}

#[cfg(test)]
#[allow(clippy::float_cmp, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::constants::extract::{
        AMPLITUDE_THRESHOLD, LEAD_IN_SECS, MAX_LENGTH_SECS, MIN_LENGTH_SECS,
    };

    fn params() -> ExtractParams {
        ExtractParams {
            threshold: AMPLITUDE_THRESHOLD,
            lead_in_secs: LEAD_IN_SECS,
            band: LengthBand::new(MIN_LENGTH_SECS, MAX_LENGTH_SECS),
        }
    }

    /// 16 kHz waveform of `secs` seconds with loud samples from `from` to `to` seconds.
    fn burst(secs: f64, from: f64, to: f64) -> Waveform {
        let rate = 16_000;
        let base = Waveform::silence(0, rate);
        let mut samples = vec![0.1; base.secs_to_samples(secs)];
        for s in &mut samples[base.secs_to_samples(from)..=base.secs_to_samples(to)] {
            *s = 0.8;
        }
        Waveform::new(samples, rate)
    }

    #[test]
    fn test_extract_within_band_is_unchanged() {
        // Loud from 0.50s to 1.10s widens to [0.30, 1.30]
        let wave = burst(2.0, 0.5, 1.1);
        let extraction = extract_target(&wave, &params()).unwrap();

        assert_eq!(extraction.interval.start(), 4_800);
        assert_eq!(extraction.interval.end(), 20_800);
        assert_eq!(extraction.action, FitAction::Unchanged);
        assert_eq!(extraction.clip.duration_secs(), 1.0);
    }

    #[test]
    fn test_extract_short_event_is_padded_to_min() {
        let wave = burst(3.0, 1.0, 1.1);
        let extraction = extract_target(&wave, &params()).unwrap();

        assert!(matches!(extraction.action, FitAction::Padded { .. }));
        assert_eq!(extraction.clip.len(), 16_000);
    }

    #[test]
    fn test_extract_long_event_is_trimmed_to_max() {
        let wave = burst(5.0, 0.5, 3.5);
        let extraction = extract_target(&wave, &params()).unwrap();

        assert!(matches!(extraction.action, FitAction::Trimmed { .. }));
        assert_eq!(extraction.clip.len(), 32_000);
    }

    #[test]
    fn test_extract_quiet_file_yields_nothing() {
        let wave = Waveform::new(vec![0.2; 16_000], 16_000);
        assert!(extract_target(&wave, &params()).is_none());
    }
}
