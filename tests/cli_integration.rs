//! Integration tests for the catscat binary.

#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

/// Write a config file into `dir` and return its path.
fn write_config(dir: &Path, contents: &str) -> std::path::PathBuf {
    let path = dir.join("config.toml");
    std::fs::write(&path, contents).unwrap();
    path
}

fn write_clip(path: &Path, samples: &[i16]) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 16_000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for &s in samples {
        writer.write_sample(s).unwrap();
    }
    writer.finalize().unwrap();
}

#[test]
fn test_stages_lists_default_pipeline() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path(), "");

    let mut cmd = cargo_bin_cmd!("catscat");
    cmd.arg("stages").arg("--config").arg(&config);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("collect"))
        .stdout(predicate::str::contains("scratch"))
        .stdout(predicate::str::contains("targeted_1-2s"));
}

#[test]
fn test_run_rejects_out_of_order_stages() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path(), "");

    let mut cmd = cargo_bin_cmd!("catscat");
    cmd.args(["run", "--stages", "perturb,extract", "--config"])
        .arg(&config);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("only produced later by 'extract'"));
}

#[test]
fn test_run_rejects_unknown_stage() {
    let mut cmd = cargo_bin_cmd!("catscat");
    cmd.args(["run", "--stages", "denoise"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("invalid value 'denoise'"));
}

#[test]
fn test_stage_with_missing_input_fails() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path(), "");

    let mut cmd = cargo_bin_cmd!("catscat");
    cmd.arg("extract")
        .arg("--config")
        .arg(&config)
        .arg("--root")
        .arg(dir.path());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("error:"))
        .stderr(predicate::str::contains("amp_normalised"));
}

#[test]
fn test_invalid_config_is_rejected() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path(), "[extract]\nthreshold = 2.0\n");

    let mut cmd = cargo_bin_cmd!("catscat");
    cmd.arg("stages").arg("--config").arg(&config);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("configuration validation failed"));
}

#[test]
fn test_missing_explicit_config_is_error() {
    let dir = TempDir::new().unwrap();

    let mut cmd = cargo_bin_cmd!("catscat");
    cmd.arg("stages")
        .arg("--config")
        .arg(dir.path().join("absent.toml"));

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("failed to read config file"));
}

#[test]
fn test_config_init_then_show() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("nested/config.toml");

    cargo_bin_cmd!("catscat")
        .args(["config", "init", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Created configuration file"));
    assert!(config.exists());

    cargo_bin_cmd!("catscat")
        .args(["config", "show", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("[extract]"))
        .stdout(predicate::str::contains("gains_db"));

    cargo_bin_cmd!("catscat")
        .args(["config", "path", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_extract_and_perturb_via_cli() {
    let dir = TempDir::new().unwrap();
    let config = write_config(
        dir.path(),
        "[perturb]\ngains_db = [5, 0]\n",
    );

    // 3 s of silence with a loud event from 0.5 s to 1.1 s.
    let mut samples = vec![0_i16; 48_000];
    for s in &mut samples[8_000..=17_600] {
        *s = 26_000;
    }
    write_clip(
        &dir.path()
            .join("transformed-data/amp_normalised/Positive/Hiss/hiss_000001_001.wav"),
        &samples,
    );

    cargo_bin_cmd!("catscat")
        .args(["run", "--stages", "extract,perturb", "--clean", "--no-progress", "--config"])
        .arg(&config)
        .arg("--root")
        .arg(dir.path())
        .assert()
        .success();

    let perturbed = dir.path().join("transformed-data/amp_perturbed/Positive/Hiss");
    assert!(perturbed.join("hiss_000001_001_+05dB_centered_1-2s.wav").exists());
    assert!(perturbed.join("hiss_000001_001_+00dB_centered_1-2s.wav").exists());
    assert!(
        dir.path()
            .join("transformed-data/targeted_1-2s/catscat-extract-manifest.json")
            .exists()
    );
}
