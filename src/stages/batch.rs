//! File discovery and the per-file processing loop shared by the stages.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::constants::AUDIO_EXTENSIONS;
use crate::curate::ClipMeta;
use crate::error::{Error, Result};
use crate::output::progress;

use super::{OutputRecord, StageReport};

/// What happened to one input file.
#[derive(Debug)]
pub(crate) enum FileOutcome {
    /// The file produced these outputs.
    Written(Vec<OutputRecord>),
    /// The file produced nothing, for the given reason.
    Skipped(String),
}

/// Recursively collect audio files under `dir`, sorted by path.
///
/// # Errors
///
/// Returns [`Error::SourceFolderNotFound`] if `dir` does not exist.
pub fn collect_audio_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::SourceFolderNotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut files = Vec::new();
    collect_audio_files_recursive(dir, &mut files)?;
    files.sort();
    Ok(files)
}

fn collect_audio_files_recursive(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();

        if path.is_dir() {
            collect_audio_files_recursive(&path, files)?;
        } else if is_audio_file(&path) {
            files.push(path);
        }
    }

    Ok(())
}

/// Check if a file has a supported audio extension.
pub(crate) fn is_audio_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| {
        AUDIO_EXTENSIONS
            .iter()
            .any(|known| ext.eq_ignore_ascii_case(OsStr::new(known)))
    })
}

/// Check if a file is a WAV file.
pub(crate) fn is_wav_file(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(OsStr::new("wav")))
}

/// Output path for a clip derived from `input`.
///
/// The input's folder relative to `source_root` is recreated under
/// `dest_root`; inputs outside `source_root` land directly in `dest_root`.
#[must_use]
pub fn output_path_for(input: &Path, source_root: &Path, dest_root: &Path, meta: &ClipMeta) -> PathBuf {
    let relative = input
        .parent()
        .and_then(|parent| parent.strip_prefix(source_root).ok())
        .unwrap_or_else(|| Path::new(""));

    dest_root.join(relative).join(meta.file_name())
}

/// Delete every file below `dir`, keeping the folder structure.
///
/// A missing folder is not an error.
///
/// # Errors
///
/// Returns an error if a file cannot be removed.
pub fn clean_folder(dir: &Path) -> Result<()> {
    if !dir.is_dir() {
        return Ok(());
    }

    let mut removed = 0usize;
    clean_folder_recursive(dir, &mut removed)?;
    debug!("Removed {removed} file(s) from {}", dir.display());
    Ok(())
}

fn clean_folder_recursive(dir: &Path, removed: &mut usize) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();

        if path.is_dir() {
            clean_folder_recursive(&path, removed)?;
        } else {
            std::fs::remove_file(&path)?;
            *removed += 1;
        }
    }

    Ok(())
}

/// Create `dir` and its parents.
pub(crate) fn ensure_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir).map_err(|e| Error::OutputDirCreateFailed {
        path: dir.to_path_buf(),
        source: e,
    })
}

/// Render an error followed by each of its causes, separated by `: `.
pub(crate) fn error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Run `process` over every item, isolating per-item failures.
///
/// Each item is counted in `report` as processed, skipped or failed.
pub(crate) fn process_batch<T, F>(report: &mut StageReport, items: &[T], progress_enabled: bool, mut process: F)
where
    T: AsRef<Path>,
    F: FnMut(&T) -> Result<FileOutcome>,
{
    let pb = progress::create_file_progress(items.len(), report.stage.name(), progress_enabled);

    for item in items {
        let path = item.as_ref();

        match process(item) {
            Ok(FileOutcome::Written(records)) => {
                report.processed += 1;
                report.outputs.extend(records);
            }
            Ok(FileOutcome::Skipped(reason)) => {
                info!("Skipping {}: {reason}", path.display());
                report.skipped += 1;
            }
            Err(e) => {
                warn!("Failed to process {}: {}", path.display(), error_chain(&e));
                report.failed += 1;
            }
        }
        progress::inc_progress(pb.as_ref());
    }

    progress::finish_progress(pb, "Complete");
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::pipeline::Stage;
    use tempfile::TempDir;

    #[test]
    fn test_error_chain_includes_cause() {
        let error = Error::AudioDecode {
            path: PathBuf::from("broken.wav"),
            source: "invalid RIFF header".into(),
        };
        let message = error_chain(&error);
        assert!(message.contains("broken.wav"));
        assert!(message.ends_with(": invalid RIFF header"));
    }

    #[test]
    fn test_error_chain_without_cause() {
        let error = Error::EmptyPipeline;
        assert_eq!(error_chain(&error), error.to_string());
    }

    #[test]
    fn test_is_audio_file() {
        assert!(is_audio_file(Path::new("clip.wav")));
        assert!(is_audio_file(Path::new("clip.FLAC")));
        assert!(is_audio_file(Path::new("kissa_ääni.mp3")));
        assert!(!is_audio_file(Path::new("notes.txt")));
        assert!(!is_audio_file(Path::new("no_extension")));
    }

    #[test]
    fn test_is_wav_file() {
        assert!(is_wav_file(Path::new("a.WAV")));
        assert!(!is_wav_file(Path::new("a.flac")));
    }

    #[test]
    fn test_output_path_keeps_relative_folder() {
        let meta = ClipMeta::new("board-scratch", 1, 1);
        let path = output_path_for(
            Path::new("/data/Positive/Board_Scratch/in.wav"),
            Path::new("/data"),
            Path::new("/out"),
            &meta,
        );
        assert_eq!(
            path,
            PathBuf::from("/out/Positive/Board_Scratch/board-scratch_000001_001.wav")
        );
    }

    #[test]
    fn test_output_path_outside_source_root() {
        let meta = ClipMeta::new("negative", 7, 2);
        let path = output_path_for(
            Path::new("/elsewhere/in.wav"),
            Path::new("/data"),
            Path::new("/out"),
            &meta,
        );
        assert_eq!(path, PathBuf::from("/out/negative_000007_002.wav"));
    }

    #[test]
    fn test_collect_audio_files_sorted_and_filtered() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("b")).unwrap();
        std::fs::write(dir.path().join("b/2.wav"), b"").unwrap();
        std::fs::write(dir.path().join("a.wav"), b"").unwrap();
        std::fs::write(dir.path().join("readme.md"), b"").unwrap();

        let files = collect_audio_files(dir.path()).unwrap();
        assert_eq!(
            files,
            vec![dir.path().join("a.wav"), dir.path().join("b/2.wav")]
        );
    }

    #[test]
    fn test_collect_audio_files_missing_folder() {
        let result = collect_audio_files(Path::new("/nonexistent/catscat/folder"));
        assert!(matches!(result, Err(Error::SourceFolderNotFound { .. })));
    }

    #[test]
    fn test_clean_folder_keeps_directories() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("Positive/Hiss");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("x.wav"), b"").unwrap();
        std::fs::write(dir.path().join("top.json"), b"{}").unwrap();

        clean_folder(dir.path()).unwrap();

        assert!(nested.is_dir());
        assert!(!nested.join("x.wav").exists());
        assert!(!dir.path().join("top.json").exists());
    }

    #[test]
    fn test_clean_missing_folder_is_ok() {
        assert!(clean_folder(Path::new("/nonexistent/catscat/folder")).is_ok());
    }

    #[test]
    fn test_process_batch_counts_outcomes() {
        let mut report = StageReport::new(Stage::Convert, Path::new("in"), Path::new("out"));
        let items = vec![
            PathBuf::from("ok.wav"),
            PathBuf::from("quiet.wav"),
            PathBuf::from("broken.wav"),
        ];

        process_batch(&mut report, &items, false, |item| match item.to_str() {
            Some("ok.wav") => Ok(FileOutcome::Written(vec![OutputRecord {
                input: item.clone(),
                output: PathBuf::from("out/ok.wav"),
                meta: ClipMeta::new("hiss", 1, 1),
            }])),
            Some("quiet.wav") => Ok(FileOutcome::Skipped("silent".to_string())),
            _ => Err(Error::EmptyAudio { path: item.clone() }),
        });

        assert_eq!(report.processed, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(report.outputs.len(), 1);
    }
}
