//! Fixed-gain amplitude perturbation.

use std::path::Path;

use tracing::info;

use crate::audio::{decode_audio_file, write_wav_file};
use crate::curate::{ClipMeta, apply_gain_db};
use crate::error::Result;
use crate::pipeline::Stage;

use super::batch::{FileOutcome, collect_audio_files, output_path_for, process_batch};
use super::{OutputRecord, StageContext, StageReport};

/// Write one copy of every targeted clip per configured gain offset.
///
/// # Errors
///
/// Returns an error if the targeted folder is missing.
pub fn perturb(ctx: &StageContext<'_>) -> Result<StageReport> {
    let folders = &ctx.config.folders;
    let source = folders.resolve(&folders.targeted);
    let dest = folders.resolve(&folders.perturbed);
    let perturb = &ctx.config.perturb;

    let mut files = collect_audio_files(&source)?;
    files.retain(|file| ClipMeta::from_path(file).map_or(true, |meta| perturb.includes(&meta.category)));

    info!(
        "Perturbing {} file(s) with gains {:?} dB",
        files.len(),
        perturb.gains_db
    );

    let mut report = StageReport::new(Stage::Perturb, &source, &dest);
    process_batch(&mut report, &files, ctx.progress, |file| {
        perturb_file(file, &source, &dest, &perturb.gains_db)
    });

    Ok(report)
}

fn perturb_file(file: &Path, source: &Path, dest: &Path, gains_db: &[i32]) -> Result<FileOutcome> {
    let meta = ClipMeta::from_path(file)?;
    let wave = decode_audio_file(file)?;

    let mut records = Vec::with_capacity(gains_db.len());
    for &db in gains_db {
        let gained = apply_gain_db(&wave, f64::from(db));
        let out_meta = meta.with_gain(db);
        let output = output_path_for(file, source, dest, &out_meta);
        write_wav_file(&output, &gained)?;

        records.push(OutputRecord {
            input: file.to_path_buf(),
            output,
            meta: out_meta,
        });
    }

    Ok(FileOutcome::Written(records))
}
