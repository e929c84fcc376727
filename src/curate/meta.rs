//! Clip metadata and its file name serialization.
//!
//! Every clip carries a [`ClipMeta`] describing where it came from and which
//! transforms produced it. File names are generated from it and parsed back
//! into it, with the layout
//! `{category}_{index:06}_{source:03}[_{gain}][_{transform}...].wav`.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::tags;
use crate::error::{Error, Result};

/// A transform recorded in a clip's history, in the order applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transform {
    /// Converted to mono, 16 kHz.
    Mono16k,
    /// Peak amplitude normalised.
    Normalised,
    /// Target window extracted and fitted to 1-2 s.
    Centered,
    /// Extracted from leftover audio on the second pass.
    SecondPass,
    /// Tag not produced by this tool, kept verbatim.
    Other(String),
}

impl Transform {
    const KNOWN: [Self; 4] = [Self::Mono16k, Self::Normalised, Self::Centered, Self::SecondPass];

    /// File name tag for this transform.
    #[must_use]
    pub fn tag(&self) -> &str {
        match self {
            Self::Mono16k => tags::MONO_16KHZ,
            Self::Normalised => tags::NORMALISED,
            Self::Centered => tags::CENTERED,
            Self::SecondPass => tags::SECOND_PASS,
            Self::Other(tag) => tag,
        }
    }
}

/// Provenance of a clip: identity, gain offset and transform history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipMeta {
    /// Sound category, e.g. `board-scratch` or `negative`.
    pub category: String,
    /// Running number of the clip within its category.
    pub index: u32,
    /// Numeric id of the data source the clip was collected from.
    pub source_id: u32,
    /// Amplitude perturbation in dB, if any.
    pub gain_db: Option<i32>,
    /// Transforms applied since collection.
    pub history: Vec<Transform>,
}

impl ClipMeta {
    /// Metadata of a freshly collected clip.
    #[must_use]
    pub fn new(category: impl Into<String>, index: u32, source_id: u32) -> Self {
        Self {
            category: category.into(),
            index,
            source_id,
            gain_db: None,
            history: Vec::new(),
        }
    }

    /// Copy with `transform` appended to the history.
    #[must_use]
    pub fn with_transform(&self, transform: Transform) -> Self {
        let mut meta = self.clone();
        meta.history.push(transform);
        meta
    }

    /// Copy carrying a gain offset of `db` decibels.
    #[must_use]
    pub fn with_gain(&self, db: i32) -> Self {
        Self {
            gain_db: Some(db),
            ..self.clone()
        }
    }

    /// Whether the clip came from the second extraction pass.
    #[must_use]
    pub fn is_second_pass(&self) -> bool {
        self.history.contains(&Transform::SecondPass)
    }

    /// File name without extension.
    #[must_use]
    pub fn stem(&self) -> String {
        self.to_string()
    }

    /// File name with `.wav` extension.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{self}.wav")
    }

    /// Parse metadata from a clip path's file name.
    pub fn from_path(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        Self::from_file_name(&name)
    }

    /// Parse metadata from a clip file name, with or without extension.
    pub fn from_file_name(name: &str) -> Result<Self> {
        let invalid = |reason: &str| Error::InvalidClipName {
            name: name.to_string(),
            reason: reason.to_string(),
        };

        let stem = Path::new(name)
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| invalid("not a valid file name"))?;

        let mut parts = stem.split('_');
        let category = parts
            .next()
            .filter(|c| !c.is_empty())
            .ok_or_else(|| invalid("missing category"))?;
        let index = parts
            .next()
            .and_then(|p| p.parse().ok())
            .ok_or_else(|| invalid("missing or non-numeric clip index"))?;
        let source_id = parts
            .next()
            .and_then(|p| p.parse().ok())
            .ok_or_else(|| invalid("missing or non-numeric source id"))?;

        let mut rest: Vec<&str> = parts.collect();
        let gain_db = match rest.first().and_then(|p| parse_gain_tag(p)) {
            Some(db) => {
                rest.remove(0);
                Some(db)
            }
            None => None,
        };

        Ok(Self {
            category: category.to_string(),
            index,
            source_id,
            gain_db,
            history: parse_history(&rest),
        })
    }
}

impl fmt::Display for ClipMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}_{:06}_{:03}",
            self.category, self.index, self.source_id
        )?;
        if let Some(db) = self.gain_db {
            write!(f, "_{}", gain_tag(db))?;
        }
        for transform in &self.history {
            write!(f, "_{}", transform.tag())?;
        }
        Ok(())
    }
}

/// File name tag for a gain offset: sign always present, magnitude zero-padded to two digits.
///
/// `5` becomes `+05dB`, `-15` becomes `-15dB`, `0` becomes `+00dB`.
#[must_use]
pub fn gain_tag(db: i32) -> String {
    let sign = if db < 0 { '-' } else { '+' };
    format!("{sign}{:02}dB", db.unsigned_abs())
}

fn parse_gain_tag(tag: &str) -> Option<i32> {
    let digits = tag.strip_suffix("dB")?;
    let (negative, magnitude) = match digits.as_bytes().first()? {
        b'+' => (false, &digits[1..]),
        b'-' => (true, &digits[1..]),
        _ => return None,
    };
    if magnitude.len() < 2 || !magnitude.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let value: i32 = magnitude.parse().ok()?;
    Some(if negative { -value } else { value })
}

/// Match underscore-separated segments against known transform tags, which
/// may themselves contain underscores.
fn parse_history(segments: &[&str]) -> Vec<Transform> {
    let mut history = Vec::new();
    let mut i = 0;

    'segments: while i < segments.len() {
        for known in Transform::KNOWN {
            let tag_parts: Vec<&str> = known.tag().split('_').collect();
            if segments[i..].starts_with(&tag_parts) {
                i += tag_parts.len();
                history.push(known);
                continue 'segments;
            }
        }
        history.push(Transform::Other(segments[i].to_string()));
        i += 1;
    }

    history
}
