//! Leftover audio for second-pass extraction.

use super::TargetInterval;
use crate::audio::Waveform;

/// The source waveform with the target span removed.
///
/// Audio before and after the interval is joined end to end.
#[must_use]
pub fn leftover_audio(wave: &Waveform, interval: &TargetInterval) -> Waveform {
    let samples = wave.samples();
    let start = interval.start().min(samples.len());
    let end = interval.end().clamp(start, samples.len());

    let mut rest = Vec::with_capacity(samples.len() - (end - start));
    rest.extend_from_slice(&samples[..start]);
    rest.extend_from_slice(&samples[end..]);

    Waveform::new(rest, wave.sample_rate())
}

/// Leftover audio worth a second pass, or `None` if it is not longer than `min_secs`.
#[must_use]
pub fn second_pass_leftover(
    wave: &Waveform,
    interval: &TargetInterval,
    min_secs: f64,
) -> Option<Waveform> {
    let rest = leftover_audio(wave, interval);
    (rest.duration_secs() > min_secs).then_some(rest)
}
