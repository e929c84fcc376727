//! Collection of raw source data into one consistently named tree.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::constants::layout;
use crate::curate::ClipMeta;
use crate::error::{Error, Result};
use crate::pipeline::Stage;

use super::batch::{FileOutcome, ensure_dir, error_chain, is_wav_file, process_batch};
use super::{OutputRecord, StageContext, StageReport};

/// Per-category running clip numbers.
#[derive(Debug, Default, Clone)]
pub struct CollectState {
    counters: HashMap<String, u32>,
}

impl CollectState {
    /// Create a state with every counter at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Next index for `category`, starting at 1.
    pub fn next_index(&mut self, category: &str) -> u32 {
        let counter = self.counters.entry(category.to_string()).or_insert(0);
        *counter += 1;
        *counter
    }

    /// Number of clips numbered so far in `category`.
    #[must_use]
    pub fn count(&self, category: &str) -> u32 {
        self.counters.get(category).copied().unwrap_or(0)
    }
}

/// A file to copy into the collected tree.
#[derive(Debug)]
struct CollectJob {
    source: PathBuf,
    destination: PathBuf,
    meta: ClipMeta,
}

impl AsRef<Path> for CollectJob {
    fn as_ref(&self) -> &Path {
        &self.source
    }
}

/// Copy every source's cleaned clips into the collected folder.
///
/// # Errors
///
/// Returns an error if the raw data folder is missing.
pub fn collect(ctx: &StageContext<'_>) -> Result<StageReport> {
    let folders = &ctx.config.folders;
    let raw = folders.resolve(&folders.raw_data);
    let dest = folders.resolve(&folders.collected);

    let mut report = StageReport::new(Stage::Collect, &raw, &dest);
    let mut state = CollectState::new();
    let jobs = plan_collection(&raw, &dest, &folders.clean_location, &mut state)?;

    info!("Collecting {} file(s) from {}", jobs.len(), raw.display());

    process_batch(&mut report, &jobs, ctx.progress, |job| {
        copy_clip(job).map(|record| FileOutcome::Written(vec![record]))
    });

    Ok(report)
}

/// Number every clip and decide where it goes.
fn plan_collection(
    raw: &Path,
    dest: &Path,
    clean_location: &str,
    state: &mut CollectState,
) -> Result<Vec<CollectJob>> {
    if !raw.is_dir() {
        return Err(Error::SourceFolderNotFound {
            path: raw.to_path_buf(),
        });
    }

    let mut jobs = Vec::new();

    for source_dir in sorted_entries(raw)?.into_iter().filter(|p| p.is_dir()) {
        let Some(source_id) = source_id(&source_dir) else {
            warn!(
                "Skipping source {}: folder name has no numeric id prefix",
                source_dir.display()
            );
            continue;
        };

        let clean_dir = source_dir.join(clean_location);
        if !clean_dir.is_dir() {
            warn!("Skipping source {}: no '{clean_location}' folder", source_dir.display());
            continue;
        }

        debug!("Collecting source {source_id} from {}", clean_dir.display());

        // Numbers are only committed once the whole source has been listed
        let mut source_state = state.clone();
        match plan_source(&clean_dir, dest, source_id, &mut source_state) {
            Ok(source_jobs) => {
                *state = source_state;
                jobs.extend(source_jobs);
            }
            Err(e) => warn!("Skipping source {}: {}", source_dir.display(), error_chain(&e)),
        }
    }

    Ok(jobs)
}

/// Plan every category folder of one source's clean folder.
fn plan_source(
    clean_dir: &Path,
    dest: &Path,
    source_id: u32,
    state: &mut CollectState,
) -> Result<Vec<CollectJob>> {
    let mut jobs = Vec::new();

    for category_dir in sorted_entries(clean_dir)?.into_iter().filter(|p| p.is_dir()) {
        match file_name(&category_dir).as_str() {
            layout::POSITIVE => {
                plan_positive(&category_dir, dest, source_id, state, &mut jobs)?;
            }
            layout::NEGATIVE => {
                plan_negative(&category_dir, dest, source_id, state, &mut jobs)?;
            }
            other => warn!("Skipping unknown category folder '{other}' in {}", clean_dir.display()),
        }
    }

    Ok(jobs)
}

fn plan_positive(
    positive_dir: &Path,
    dest: &Path,
    source_id: u32,
    state: &mut CollectState,
    jobs: &mut Vec<CollectJob>,
) -> Result<()> {
    for sub_dir in sorted_entries(positive_dir)?.into_iter().filter(|p| p.is_dir()) {
        let sub_name = file_name(&sub_dir);
        let category = category_name(&sub_name);
        let out_dir = dest.join(layout::POSITIVE).join(&sub_name);

        for file in sorted_entries(&sub_dir)?
            .into_iter()
            .filter(|p| p.is_file() && is_wav_file(p))
        {
            let meta = ClipMeta::new(&category, state.next_index(&category), source_id);
            jobs.push(CollectJob {
                destination: out_dir.join(meta.file_name()),
                source: file,
                meta,
            });
        }
    }

    Ok(())
}

fn plan_negative(
    negative_dir: &Path,
    dest: &Path,
    source_id: u32,
    state: &mut CollectState,
    jobs: &mut Vec<CollectJob>,
) -> Result<()> {
    let out_dir = dest.join(layout::NEGATIVE).join(layout::NEGATIVE);
    let mut files = Vec::new();
    wav_files_recursive(negative_dir, &mut files)?;
    files.sort();

    for file in files {
        if is_48khz_duplicate(&file) {
            debug!("Skipping 48 kHz duplicate {}", file.display());
            continue;
        }

        let meta = ClipMeta::new(
            layout::NEGATIVE_CATEGORY,
            state.next_index(layout::NEGATIVE_CATEGORY),
            source_id,
        );
        jobs.push(CollectJob {
            destination: out_dir.join(meta.file_name()),
            source: file,
            meta,
        });
    }

    Ok(())
}

fn copy_clip(job: &CollectJob) -> Result<OutputRecord> {
    if let Some(parent) = job.destination.parent() {
        ensure_dir(parent)?;
    }

    std::fs::copy(&job.source, &job.destination).map_err(|e| Error::CopyFailed {
        from: job.source.clone(),
        to: job.destination.clone(),
        source: e,
    })?;

    Ok(OutputRecord {
        input: job.source.clone(),
        output: job.destination.clone(),
        meta: job.meta.clone(),
    })
}

fn wav_files_recursive(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();

        if path.is_dir() {
            wav_files_recursive(&path, files)?;
        } else if is_wav_file(&path) {
            files.push(path);
        }
    }

    Ok(())
}

fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut entries = std::fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort();
    Ok(entries)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Category name of a positive sub-folder, e.g. `Board_Scratch` -> `board-scratch`.
fn category_name(sub_folder: &str) -> String {
    sub_folder.to_lowercase().replace('_', "-")
}

/// Numeric id prefix of a source folder, e.g. `1_Kaggle` -> 1.
fn source_id(source_dir: &Path) -> Option<u32> {
    file_name(source_dir).split('_').next()?.parse().ok()
}

fn is_48khz_duplicate(path: &Path) -> bool {
    path.file_stem()
        .is_some_and(|stem| stem.to_string_lossy().ends_with(layout::SKIP_48KHZ_SUFFIX))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, b"RIFF").unwrap();
    }

    #[test]
    fn test_collect_state_counts_per_category() {
        let mut state = CollectState::new();
        assert_eq!(state.next_index("hiss"), 1);
        assert_eq!(state.next_index("hiss"), 2);
        assert_eq!(state.next_index("negative"), 1);
        assert_eq!(state.count("hiss"), 2);
        assert_eq!(state.count("purr"), 0);
    }

    #[test]
    fn test_category_name() {
        assert_eq!(category_name("Board_Scratch"), "board-scratch");
        assert_eq!(category_name("Hiss"), "hiss");
    }

    #[test]
    fn test_source_id() {
        assert_eq!(source_id(Path::new("/raw/1_Kaggle")), Some(1));
        assert_eq!(source_id(Path::new("/raw/12")), Some(12));
        assert_eq!(source_id(Path::new("/raw/Kaggle_1")), None);
    }

    #[test]
    fn test_is_48khz_duplicate() {
        assert!(is_48khz_duplicate(Path::new("street.48kHz.wav")));
        assert!(!is_48khz_duplicate(Path::new("street.wav")));
    }

    #[test]
    fn test_plan_numbers_categories_across_sources() {
        let raw = TempDir::new().unwrap();
        let root = raw.path();
        touch(&root.join("1_Kaggle/clean/Positive/Board_Scratch/b.wav"));
        touch(&root.join("1_Kaggle/clean/Positive/Board_Scratch/a.wav"));
        touch(&root.join("1_Kaggle/clean/Negative/street/x.wav"));
        touch(&root.join("1_Kaggle/clean/Negative/street/x.48kHz.wav"));
        touch(&root.join("2_Field/clean/Positive/Board_Scratch/c.wav"));
        touch(&root.join("2_Field/clean/Other/ignored.wav"));
        touch(&root.join("notes/clean/Positive/Hiss/skipped.wav"));

        let dest = Path::new("/out");
        let mut state = CollectState::new();
        let jobs = plan_collection(root, dest, "clean", &mut state).unwrap();

        let names: Vec<String> = jobs.iter().map(|j| j.meta.file_name()).collect();
        assert_eq!(
            names,
            vec![
                "negative_000001_001.wav",
                "board-scratch_000001_001.wav",
                "board-scratch_000002_001.wav",
                "board-scratch_000003_002.wav",
            ]
        );
        assert_eq!(jobs[1].source, root.join("1_Kaggle/clean/Positive/Board_Scratch/a.wav"));
        assert_eq!(
            jobs[0].destination,
            PathBuf::from("/out/Negative/Negative/negative_000001_001.wav")
        );
        assert_eq!(
            jobs[3].destination,
            PathBuf::from("/out/Positive/Board_Scratch/board-scratch_000003_002.wav")
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_plan_skips_unreadable_source() {
        use std::os::unix::fs::PermissionsExt;

        let raw = TempDir::new().unwrap();
        let root = raw.path();
        touch(&root.join("1_Kaggle/clean/Negative/street/x.wav"));
        touch(&root.join("1_Kaggle/clean/Positive/Hiss/a.wav"));
        touch(&root.join("2_Field/clean/Positive/Hiss/b.wav"));

        let locked = root.join("1_Kaggle/clean/Positive/Hiss");
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o000)).unwrap();
        // Privileged users can still list the folder
        if std::fs::read_dir(&locked).is_ok() {
            std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let mut state = CollectState::new();
        let result = plan_collection(root, Path::new("/out"), "clean", &mut state);
        std::fs::set_permissions(&locked, std::fs::Permissions::from_mode(0o755)).unwrap();

        let names: Vec<String> = result.unwrap().iter().map(|j| j.meta.file_name()).collect();
        assert_eq!(names, vec!["hiss_000001_002.wav"]);
        assert_eq!(state.count("hiss"), 1);
        assert_eq!(state.count("negative"), 0);
    }

    #[test]
    fn test_plan_missing_raw_folder() {
        let mut state = CollectState::new();
        let result = plan_collection(
            Path::new("/nonexistent/raw"),
            Path::new("/out"),
            "clean",
            &mut state,
        );
        assert!(matches!(result, Err(Error::SourceFolderNotFound { .. })));
    }
}
