//! WAV file writing.

use std::fs;
use std::path::Path;

use hound::{SampleFormat, WavSpec, WavWriter};

use super::Waveform;
use crate::constants::MAX_16BIT_AMP;
use crate::error::{Error, Result};

/// Write a waveform as a mono 16-bit PCM WAV file.
///
/// Parent directories are created as needed. Samples are scaled by 32768
/// and clipped to the 16-bit range, so a waveform decoded from a 16-bit file
/// is written back bit-for-bit.
pub fn write_wav_file(path: &Path, wave: &Waveform) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::OutputDirCreateFailed {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let spec = WavSpec {
        channels: 1,
        sample_rate: wave.sample_rate(),
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let wav_err = |e| Error::WavWriteFailed {
        path: path.to_path_buf(),
        source: e,
    };

    let mut writer = WavWriter::create(path, spec).map_err(wav_err)?;

    for &sample in wave.samples() {
        writer.write_sample(to_i16(sample)).map_err(wav_err)?;
    }

    writer.finalize().map_err(wav_err)?;

    Ok(())
}

/// Convert a normalized sample to 16-bit PCM, clipping at the format ceiling.
#[allow(clippy::cast_possible_truncation)]
fn to_i16(sample: f32) -> i16 {
    (sample * MAX_16BIT_AMP)
        .round()
        .clamp(f32::from(i16::MIN), f32::from(i16::MAX)) as i16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_i16_round_trips_16bit_values() {
        for raw in [i16::MIN, -12_345, -1, 0, 1, 16_384, i16::MAX] {
            assert_eq!(to_i16(f32::from(raw) / MAX_16BIT_AMP), raw);
        }
    }

    #[test]
    fn test_to_i16_clips_overflow() {
        assert_eq!(to_i16(1.5), i16::MAX);
        assert_eq!(to_i16(-1.5), i16::MIN);
        assert_eq!(to_i16(1.0), i16::MAX);
    }
}
