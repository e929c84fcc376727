//! Audio resampling using rubato.

use super::Waveform;
use crate::error::{Error, Result};
use audioadapter_buffers::direct::SequentialSlice;
use rubato::{Fft, FixedSync, Resampler};

/// Input frames fed to the resampler per call.
const CHUNK_SIZE: usize = 1024;

/// Resample a waveform to `to_rate`.
///
/// Returns the input unchanged if it is already at the target rate. The
/// resampler's startup delay is removed and the output length is
/// proportional to the input length, so event timing and clip durations are
/// preserved.
pub fn resample(wave: Waveform, to_rate: u32) -> Result<Waveform> {
    let from_rate = wave.sample_rate();
    if from_rate == to_rate {
        return Ok(wave);
    }

    let samples = wave.into_samples();

    let mut resampler = Fft::<f32>::new(
        from_rate as usize,
        to_rate as usize,
        CHUNK_SIZE,
        1,
        1,
        FixedSync::Both,
    )
    .map_err(|e| Error::Resample {
        reason: e.to_string(),
    })?;

    let frames_needed = resampler.input_frames_next();
    let delay = resampler.output_delay();
    let expected_len = scaled_len(samples.len(), from_rate, to_rate);
    let mut output = Vec::with_capacity(delay + expected_len + CHUNK_SIZE);

    // Feed whole chunks, then a zero-padded tail
    for chunk in samples.chunks(frames_needed) {
        if chunk.len() == frames_needed {
            process_chunk(&mut resampler, chunk, &mut output)?;
        } else {
            let mut padded = chunk.to_vec();
            padded.resize(frames_needed, 0.0);
            process_chunk(&mut resampler, &padded, &mut output)?;
        }
    }

    // Flush the frames still held back by the resampler delay
    let silence = vec![0.0; frames_needed];
    while output.len() < delay + expected_len {
        process_chunk(&mut resampler, &silence, &mut output)?;
    }

    output.drain(..delay);
    output.truncate(expected_len);

    Ok(Waveform::new(output, to_rate))
}

/// Run one chunk through the resampler and append its output.
fn process_chunk(
    resampler: &mut Fft<f32>,
    chunk: &[f32],
    output: &mut Vec<f32>,
) -> Result<()> {
    let input = SequentialSlice::new(chunk, 1, chunk.len()).map_err(|e| Error::Resample {
        reason: format!("failed to create input adapter: {e}"),
    })?;

    let resampled = resampler
        .process(&input, 0, None)
        .map_err(|e| Error::Resample {
            reason: e.to_string(),
        })?;

    output.extend_from_slice(&resampled.take_data());
    Ok(())
}

/// Number of output samples corresponding to `input_len` input samples.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn scaled_len(input_len: usize, from_rate: u32, to_rate: u32) -> usize {
    ((input_len as f64) * f64::from(to_rate) / f64::from(from_rate)).round() as usize
}
