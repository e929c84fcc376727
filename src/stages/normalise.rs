//! Peak amplitude normalization.

use std::path::Path;

use tracing::{debug, info};

use crate::audio::{decode_audio_file, write_wav_file};
use crate::curate::{ClipMeta, Transform, peak, peak_normalise};
use crate::error::Result;
use crate::pipeline::Stage;

use super::batch::{FileOutcome, collect_audio_files, output_path_for, process_batch};
use super::{OutputRecord, StageContext, StageReport};

/// Normalise every mono clip so its peak sits at the configured headroom.
///
/// # Errors
///
/// Returns an error if the mono folder is missing.
pub fn normalise(ctx: &StageContext<'_>) -> Result<StageReport> {
    let folders = &ctx.config.folders;
    let source = folders.resolve(&folders.mono_16khz);
    let dest = folders.resolve(&folders.amp_normalised);

    normalise_tree(ctx, Stage::Normalise, &source, &dest, Some(Transform::Normalised))
}

/// Normalise every clip below `source` into `dest`.
///
/// With `tag` set the transform is recorded in the output names; without it
/// names are kept unchanged.
pub(crate) fn normalise_tree(
    ctx: &StageContext<'_>,
    stage: Stage,
    source: &Path,
    dest: &Path,
    tag: Option<Transform>,
) -> Result<StageReport> {
    let headroom_db = ctx.config.normalise.headroom_db;
    let files = collect_audio_files(source)?;
    info!(
        "Normalising {} file(s) to -{headroom_db} dBFS peak",
        files.len()
    );

    let mut report = StageReport::new(stage, source, dest);
    process_batch(&mut report, &files, ctx.progress, |file| {
        let meta = ClipMeta::from_path(file)?;
        let meta = match &tag {
            Some(transform) => meta.with_transform(transform.clone()),
            None => meta,
        };
        normalise_file(file, source, dest, meta, headroom_db)
    });

    Ok(report)
}

fn normalise_file(
    file: &Path,
    source: &Path,
    dest: &Path,
    meta: ClipMeta,
    headroom_db: f64,
) -> Result<FileOutcome> {
    let wave = decode_audio_file(file)?;
    debug!("Peak of {} is {:.4}", file.display(), peak(&wave));
    let normalised = peak_normalise(&wave, headroom_db);

    let output = output_path_for(file, source, dest, &meta);
    write_wav_file(&output, &normalised)?;

    Ok(FileOutcome::Written(vec![OutputRecord {
        input: file.to_path_buf(),
        output,
        meta,
    }]))
}
