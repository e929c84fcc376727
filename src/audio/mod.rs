//! Audio loading, conversion and writing.

mod decode;
mod resample;
mod wav;
mod waveform;

pub use decode::decode_audio_file;
pub use resample::resample;
pub use wav::write_wav_file;
pub use waveform::Waveform;
