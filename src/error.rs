//! Error types shared by the backup and prefetch pipelines.

use std::path::PathBuf;

use crate::models::AssetKind;

/// Fatal conditions that abort a backup or prefetch run.
///
/// Per-asset network failures are not represented here; see
/// [`crate::fetch::FetchError`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
  /// The save file does not exist.
  #[error("no such save file: {}", path.display())]
  SaveNotFound {
    /// Path that was requested.
    path: PathBuf,
  },

  /// The file is not a save: not UTF-8 JSON, or its root is not a mapping.
  #[error("illegal savegame: {0}")]
  IllegalSavegame(String),

  /// A construct the locator special-cases did not have the expected shape.
  #[error("unexpected structure in {key}: {detail}")]
  UnexpectedStructure {
    /// Key holding the malformed value.
    key: String,
    /// What was wrong with it.
    detail: String,
  },

  /// The gamedata (cache) root does not exist or is not a directory.
  #[error("gamedata directory not found: {}", path.display())]
  GamedataMissing {
    /// Configured gamedata root.
    path: PathBuf,
  },

  /// A file that should be archived is not present on disk.
  #[error("No such file: {}", path.display())]
  MissingAsset {
    /// Absolute path of the missing file.
    path: PathBuf,
  },

  /// A response declared a content type outside the family expected for the asset.
  #[error("content type {content_type} does not match expected {kind} type for {url}")]
  ContentTypeMismatch {
    /// URL that produced the response.
    url: String,
    /// Declared content type, parameters stripped.
    content_type: String,
    /// Kind the URL was classified as.
    kind: AssetKind,
  },

  /// Writing a file failed.
  #[error("failed to write {}: {source}", path.display())]
  Write {
    /// Destination that could not be written.
    path: PathBuf,
    /// Underlying I/O error.
    #[source]
    source: std::io::Error,
  },

  /// Unqualified I/O failure.
  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),

  /// Failure reported by the Zip writer.
  #[error("archive error: {0}")]
  Archive(#[from] zip::result::ZipError),

  /// JSON (de)serialisation failure outside save loading.
  #[error("JSON error: {0}")]
  Json(#[from] serde_json::Error),

  /// The HTTP client could not be constructed.
  #[error("HTTP client error: {0}")]
  HttpClient(#[from] reqwest::Error),
}

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
  /// Returns `true` for the not-found class of failures (save file or archive member).
  pub fn is_not_found(&self) -> bool {
    match self {
      Self::SaveNotFound { .. } | Self::MissingAsset { .. } | Self::GamedataMissing { .. } => true,
      Self::Io(err) => err.kind() == std::io::ErrorKind::NotFound,
      _ => false,
    }
  }
}
