//! Stage output reporting.

mod manifest;
pub mod progress;

pub use manifest::{Manifest, manifest_path, write_manifest};
