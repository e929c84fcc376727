//! Configuration validation.

use crate::config::Config;
use crate::error::{Error, Result};
use std::collections::HashSet;

/// Largest gain magnitude that fits the two-digit file name tag.
const MAX_GAIN_DB: u32 = 99;

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_convert(config)?;
    validate_normalise(config)?;
    validate_extract(config)?;
    validate_perturb(config)?;
    Ok(())
}

fn invalid(message: String) -> Error {
    Error::ConfigValidation { message }
}

fn validate_convert(config: &Config) -> Result<()> {
    if config.convert.sample_rate == 0 {
        return Err(invalid("convert.sample_rate must be positive".to_string()));
    }
    Ok(())
}

fn validate_normalise(config: &Config) -> Result<()> {
    let headroom = config.normalise.headroom_db;
    if !headroom.is_finite() || headroom < 0.0 {
        return Err(invalid(format!(
            "normalise.headroom_db must be non-negative, got {headroom}"
        )));
    }
    Ok(())
}

/// Validate extraction settings.
fn validate_extract(config: &Config) -> Result<()> {
    let extract = &config.extract;

    if !(extract.threshold > 0.0 && extract.threshold < 1.0) {
        return Err(invalid(format!(
            "extract.threshold must be between 0 and 1 (exclusive), got {}",
            extract.threshold
        )));
    }

    if !extract.lead_in_secs.is_finite() || extract.lead_in_secs < 0.0 {
        return Err(invalid(format!(
            "extract.lead_in_secs must be non-negative, got {}",
            extract.lead_in_secs
        )));
    }

    if !(extract.min_length_secs > 0.0 && extract.min_length_secs <= extract.max_length_secs)
        || !extract.max_length_secs.is_finite()
    {
        return Err(invalid(format!(
            "extract length band must satisfy 0 < min <= max, got [{}, {}]",
            extract.min_length_secs, extract.max_length_secs
        )));
    }

    if !extract.min_leftover_secs.is_finite() || extract.min_leftover_secs < 0.0 {
        return Err(invalid(format!(
            "extract.min_leftover_secs must be non-negative, got {}",
            extract.min_leftover_secs
        )));
    }

    Ok(())
}

/// Validate perturbation settings.
fn validate_perturb(config: &Config) -> Result<()> {
    let gains = &config.perturb.gains_db;

    if gains.is_empty() {
        return Err(invalid("perturb.gains_db must not be empty".to_string()));
    }

    if let Some(db) = gains.iter().find(|db| db.unsigned_abs() > MAX_GAIN_DB) {
        return Err(invalid(format!(
            "perturb.gains_db values must lie within ±{MAX_GAIN_DB}, got {db}"
        )));
    }

    let mut seen = HashSet::new();
    if let Some(db) = gains.iter().find(|db| !seen.insert(**db)) {
        return Err(invalid(format!("perturb.gains_db lists {db} twice")));
    }

    Ok(())
}
