//! Mono, fixed sample rate conversion.

use std::path::Path;

use tracing::{debug, info};

use crate::audio::{decode_audio_file, resample, write_wav_file};
use crate::curate::{ClipMeta, Transform};
use crate::error::Result;
use crate::pipeline::Stage;

use super::batch::{FileOutcome, collect_audio_files, output_path_for, process_batch};
use super::{OutputRecord, StageContext, StageReport};

/// Downmix every collected clip to mono and resample it to the target rate.
///
/// # Errors
///
/// Returns an error if the collected folder is missing.
pub fn convert(ctx: &StageContext<'_>) -> Result<StageReport> {
    let folders = &ctx.config.folders;
    let source = folders.resolve(&folders.collected);
    let dest = folders.resolve(&folders.mono_16khz);
    let sample_rate = ctx.config.convert.sample_rate;

    let files = collect_audio_files(&source)?;
    info!("Converting {} file(s) to mono {sample_rate} Hz", files.len());

    let mut report = StageReport::new(Stage::Convert, &source, &dest);
    process_batch(&mut report, &files, ctx.progress, |file| {
        convert_file(file, &source, &dest, sample_rate)
    });

    Ok(report)
}

fn convert_file(file: &Path, source: &Path, dest: &Path, sample_rate: u32) -> Result<FileOutcome> {
    let meta = ClipMeta::from_path(file)?.with_transform(Transform::Mono16k);
    let wave = decode_audio_file(file)?;

    debug!(
        "Resampling {} from {} Hz to {sample_rate} Hz",
        file.display(),
        wave.sample_rate()
    );
    let wave = resample(wave, sample_rate)?;

    let output = output_path_for(file, source, dest, &meta);
    write_wav_file(&output, &wave)?;

    Ok(FileOutcome::Written(vec![OutputRecord {
        input: file.to_path_buf(),
        output,
        meta,
    }]))
}
