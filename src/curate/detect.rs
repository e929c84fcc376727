//! Exceedance detection.

use serde::Serialize;

use crate::audio::Waveform;

/// First and last sample indices whose absolute amplitude exceeds the threshold.
///
/// Disjoint loud regions are not separated: the window always spans from the
/// first loud sample to the last one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExceedanceWindow {
    /// Index of the first exceeding sample.
    pub first: usize,
    /// Index of the last exceeding sample.
    pub last: usize,
}

/// Find the exceedance window of `wave`, or `None` if no sample exceeds `threshold`.
#[must_use]
pub fn detect_exceedance(wave: &Waveform, threshold: f32) -> Option<ExceedanceWindow> {
    let exceeds = |s: &f32| s.abs() > threshold;
    let samples = wave.samples();

    let first = samples.iter().position(exceeds)?;
    let last = samples.iter().rposition(exceeds)?;

    Some(ExceedanceWindow { first, last })
}
