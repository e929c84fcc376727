//! Target window extraction, with a second pass over leftovers for
//! multi-event recordings.

use std::path::Path;

use tracing::{debug, info};

use crate::audio::{decode_audio_file, write_wav_file};
use crate::curate::{ClipMeta, ExtractParams, Transform, extract_target, second_pass_leftover};
use crate::error::Result;
use crate::pipeline::Stage;

use super::batch::{
    FileOutcome, clean_folder, collect_audio_files, ensure_dir, output_path_for, process_batch,
};
use super::normalise::normalise_tree;
use super::{OutputRecord, StageContext, StageReport};

/// Where a pass writes and how it names its clips.
struct Pass<'a> {
    stage: Stage,
    source: &'a Path,
    dest: &'a Path,
    tag: Transform,
    leftover_dir: Option<&'a Path>,
}

/// Extract the target window from every normalised clip outside the scratch
/// categories.
///
/// # Errors
///
/// Returns an error if the normalised folder is missing.
pub fn extract(ctx: &StageContext<'_>) -> Result<StageReport> {
    let folders = &ctx.config.folders;
    let source = folders.resolve(&folders.amp_normalised);
    let dest = folders.resolve(&folders.targeted);
    let extract = &ctx.config.extract;

    let pass = Pass {
        stage: Stage::Extract,
        source: &source,
        dest: &dest,
        tag: Transform::Centered,
        leftover_dir: None,
    };

    run_pass(ctx, &pass, |category| !extract.is_scratch(category))
}

/// Extract scratch clips in two passes.
///
/// The first pass keeps whatever is left of each recording once the target
/// span is cut out. Leftovers long enough are normalised and run through the
/// extractor again, producing `_2ndpass` clips in the same destination.
///
/// # Errors
///
/// Returns an error if the normalised folder is missing or the temp folder
/// cannot be prepared.
pub fn scratch(ctx: &StageContext<'_>) -> Result<StageReport> {
    let folders = &ctx.config.folders;
    let source = folders.resolve(&folders.amp_normalised);
    let dest = folders.resolve(&folders.targeted);
    let temp_leftover = folders.temp_leftover();
    let temp_normalised = folders.temp_normalised();
    let extract = &ctx.config.extract;

    clean_folder(&folders.resolve(&folders.temp))?;
    ensure_dir(&temp_leftover)?;
    ensure_dir(&temp_normalised)?;

    let first = Pass {
        stage: Stage::Scratch,
        source: &source,
        dest: &dest,
        tag: Transform::Centered,
        leftover_dir: Some(&temp_leftover),
    };
    let mut report = run_pass(ctx, &first, |category| extract.is_scratch(category))?;

    let leftovers = normalise_tree(ctx, Stage::Scratch, &temp_leftover, &temp_normalised, None)?;
    report.absorb_failures(&leftovers);
    info!(
        "Running second pass over {} leftover clip(s)",
        leftovers.processed
    );

    let second = Pass {
        stage: Stage::Scratch,
        source: &temp_normalised,
        dest: &dest,
        tag: Transform::SecondPass,
        leftover_dir: None,
    };
    report.absorb(run_pass(ctx, &second, |_| true)?);

    Ok(report)
}

fn run_pass<F>(ctx: &StageContext<'_>, pass: &Pass<'_>, selected: F) -> Result<StageReport>
where
    F: Fn(&str) -> bool,
{
    let params = ctx.config.extract.params();
    let min_leftover_secs = ctx.config.extract.min_leftover_secs;

    // Unparseable names stay in so they are reported as failures.
    let mut files = collect_audio_files(pass.source)?;
    files.retain(|file| ClipMeta::from_path(file).map_or(true, |meta| selected(&meta.category)));

    info!(
        "Extracting target windows from {} file(s) in {}",
        files.len(),
        pass.source.display()
    );

    let mut report = StageReport::new(pass.stage, pass.source, pass.dest);
    process_batch(&mut report, &files, ctx.progress, |file| {
        extract_file(file, pass, &params, min_leftover_secs)
    });

    Ok(report)
}

fn extract_file(
    file: &Path,
    pass: &Pass<'_>,
    params: &ExtractParams,
    min_leftover_secs: f64,
) -> Result<FileOutcome> {
    let meta = ClipMeta::from_path(file)?.with_transform(pass.tag.clone());
    let wave = decode_audio_file(file)?;

    let Some(extraction) = extract_target(&wave, params) else {
        return Ok(FileOutcome::Skipped(format!(
            "no sample exceeds amplitude {}",
            params.threshold
        )));
    };

    debug!(
        "Target window of {} spans {:.3}-{:.3} s, {:?}",
        file.display(),
        extraction.interval.start_secs(),
        extraction.interval.end_secs(),
        extraction.action
    );

    let output = output_path_for(file, pass.source, pass.dest, &meta);
    write_wav_file(&output, &extraction.clip)?;

    if let Some(leftover_dir) = pass.leftover_dir {
        match second_pass_leftover(&wave, &extraction.interval, min_leftover_secs) {
            Some(rest) => {
                let leftover_path = output_path_for(file, pass.source, leftover_dir, &meta);
                debug!(
                    "Keeping {:.3} s of leftover audio as {}",
                    rest.duration_secs(),
                    leftover_path.display()
                );
                write_wav_file(&leftover_path, &rest)?;
            }
            None => debug!("Leftover of {} too short for a second pass", file.display()),
        }
    }

    Ok(FileOutcome::Written(vec![OutputRecord {
        input: file.to_path_buf(),
        output,
        meta,
    }]))
}
