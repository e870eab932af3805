//! Data structures produced while resolving assets referenced by a save.

use std::fmt;
use std::path::{Path, PathBuf};

/// Classification of an asset reference, derived from the key that holds the URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
  /// Wavefront object referenced by `MeshURL`.
  Mesh,
  /// Wavefront object referenced by `ColliderURL`.
  ColliderMesh,
  /// Any other `*URL` key; textures, card sheets, tiles and so on.
  Image,
  /// Unity asset bundle.
  AssetBundle,
  /// Music player track or audio library entry.
  Audio,
  /// Custom PDF object.
  Pdf,
}

impl fmt::Display for AssetKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let label = match self {
      Self::Mesh => "mesh",
      Self::ColliderMesh => "collider mesh",
      Self::Image => "image",
      Self::AssetBundle => "asset bundle",
      Self::Audio => "audio",
      Self::Pdf => "PDF",
    };
    f.write_str(label)
  }
}

/// A URL discovered inside a save together with the key path that led to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetReference {
  /// Key names from the document root down to the referencing key.
  pub path: Vec<String>,
  /// URL with in-band metadata already stripped.
  pub url: String,
  /// Kind derived from the terminal key of `path`.
  pub kind: AssetKind,
}

impl AssetReference {
  /// Terminal key of the reference path.
  pub fn key(&self) -> &str {
    self.path.last().map(String::as_str).unwrap_or_default()
  }

  /// Location of this asset relative to the gamedata root.
  pub fn cache_path(&self) -> CachePath {
    crate::asset_paths::cache_path(self.kind, &self.url)
  }
}

/// Relative location of a cached asset below the gamedata root.
///
/// The path is stored with forward slashes so it doubles as the archive member name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CachePath(String);

impl CachePath {
  pub(crate) fn new(relative: String) -> Self {
    Self(relative)
  }

  /// Slash-separated relative path.
  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// Native path below `root`.
  pub fn under(&self, root: &Path) -> PathBuf {
    self.0.split('/').fold(root.to_path_buf(), |path, part| path.join(part))
  }
}

impl fmt::Display for CachePath {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl AsRef<str> for CachePath {
  fn as_ref(&self) -> &str {
    &self.0
  }
}
