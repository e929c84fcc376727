//! Audio decoding using symphonia.

use super::Waveform;
use crate::error::{Error, Result};
use std::fs::File;
use std::path::Path;
use symphonia::core::audio::{AudioBuffer, AudioBufferRef, Signal};
use symphonia::core::codecs::{CODEC_TYPE_NULL, DecoderOptions};
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::{MediaSourceStream, MediaSourceStreamOptions};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::core::sample::Sample;
use tracing::debug;

/// Decode an audio file to a mono waveform at its native sample rate.
///
/// Multi-channel audio is mixed down by averaging channels. Integer PCM is
/// scaled by the format's maximum magnitude (32768 for 16-bit), so 16-bit
/// input maps exactly onto multiples of `1/32768`.
pub fn decode_audio_file(path: &Path) -> Result<Waveform> {
    let file = File::open(path).map_err(|e| Error::AudioOpen {
        path: path.to_path_buf(),
        source: Box::new(e),
    })?;

    let mss = MediaSourceStream::new(Box::new(file), MediaSourceStreamOptions::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| Error::AudioOpen {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| Error::NoAudioTracks {
            path: path.to_path_buf(),
        })?;

    let track_id = track.id;
    let sample_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| Error::AudioDecode {
            path: path.to_path_buf(),
            source: "missing sample rate".into(),
        })?;
    let channels = track
        .codec_params
        .channels
        .map_or(1, symphonia::core::audio::Channels::count);

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| Error::AudioDecode {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;

    let mut samples = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(symphonia::core::errors::Error::IoError(e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => {
                return Err(Error::AudioDecode {
                    path: path.to_path_buf(),
                    source: Box::new(e),
                });
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = decoder.decode(&packet).map_err(|e| Error::AudioDecode {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;

        append_samples(&decoded, channels, &mut samples);
    }

    if samples.is_empty() {
        return Err(Error::EmptyAudio {
            path: path.to_path_buf(),
        });
    }

    debug!(
        "Decoded {}: {} channel(s), {} Hz, {} frames",
        path.display(),
        channels,
        sample_rate,
        samples.len()
    );

    Ok(Waveform::new(samples, sample_rate))
}

/// Append decoded samples to the output buffer, converting to mono.
fn append_samples(buffer: &AudioBufferRef, channels: usize, output: &mut Vec<f32>) {
    const I16_NORM: f32 = 32_768.0;
    const I24_NORM: f32 = 8_388_608.0;
    const I32_NORM: f32 = 2_147_483_648.0;

    match buffer {
        AudioBufferRef::F32(buf) => mix_down(buf, channels, output, |s| s),
        AudioBufferRef::S16(buf) => mix_down(buf, channels, output, |s| f32::from(s) / I16_NORM),
        #[allow(clippy::cast_precision_loss)]
        AudioBufferRef::S24(buf) => {
            mix_down(buf, channels, output, |s| s.inner() as f32 / I24_NORM);
        }
        #[allow(clippy::cast_precision_loss)]
        AudioBufferRef::S32(buf) => mix_down(buf, channels, output, |s| s as f32 / I32_NORM),
        AudioBufferRef::U8(buf) => {
            mix_down(buf, channels, output, |s| (f32::from(s) - 128.0) / 128.0);
        }
        _ => {
            // Unsupported sample format, skip
        }
    }
}

/// Average all channels of `buf` into `output`, converting each sample with `to_f32`.
fn mix_down<S, F>(buf: &AudioBuffer<S>, channels: usize, output: &mut Vec<f32>, to_f32: F)
where
    S: Sample,
    F: Fn(S) -> f32,
{
    let channels = channels.clamp(1, buf.spec().channels.count().max(1));
    if channels == 1 {
        output.extend(buf.chan(0).iter().map(|&s| to_f32(s)));
        return;
    }

    for i in 0..buf.frames() {
        let sum: f32 = (0..channels).map(|ch| to_f32(buf.chan(ch)[i])).sum();
        #[allow(clippy::cast_precision_loss)]
        output.push(sum / channels as f32);
    }
}
