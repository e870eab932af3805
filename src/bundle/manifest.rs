//! Metadata embedded as the archive comment of a backup.

use std::fs::File;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Revision recorded in every manifest.
pub const SCRIPT_REVISION: &str = env!("CARGO_PKG_VERSION");

/// Deserialised representation of the archive comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveManifest {
  /// Version of the tool that wrote the archive.
  pub script_revision: String,
  /// Export time in seconds since the Unix epoch.
  pub export_date: u64,
  /// Optional free-text comment supplied by the user.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub comment: Option<String>,
}

impl ArchiveManifest {
  /// Build a manifest stamped with the current time.
  ///
  /// Empty comments are dropped.
  pub fn now(comment: Option<&str>) -> Self {
    let export_date = SystemTime::now()
      .duration_since(UNIX_EPOCH)
      .map(|elapsed| elapsed.as_secs())
      .unwrap_or_default();
    Self {
      script_revision: SCRIPT_REVISION.to_string(),
      export_date,
      comment: comment
        .filter(|text| !text.is_empty())
        .map(str::to_string),
    }
  }

  /// Compact JSON text stored in the archive comment.
  pub fn to_comment(&self) -> serde_json::Result<String> {
    serde_json::to_string(self)
  }
}

/// Read the manifest back from an existing archive.
pub fn read_manifest(path: &Path) -> Result<ArchiveManifest> {
  let file = File::open(path).with_context(|| format!("archive not found at {}", path.display()))?;
  let archive = zip::ZipArchive::new(file)
    .with_context(|| format!("failed to open {} as a Zip archive", path.display()))?;
  let manifest: ArchiveManifest = serde_json::from_slice(archive.comment())
    .context("failed to parse archive manifest JSON")?;
  Ok(manifest)
}
