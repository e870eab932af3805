//! Content types accepted for each asset kind.

use crate::models::AssetKind;

/// A single acceptance rule for a declared content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MimeRule {
  /// The type must equal this value.
  Exact(&'static str),
  /// The type must start with this value.
  Prefix(&'static str),
}

impl MimeRule {
  fn matches(self, mime: &str) -> bool {
    match self {
      Self::Exact(expected) => mime == expected,
      Self::Prefix(prefix) => mime.starts_with(prefix),
    }
  }
}

const MESH_TYPES: &[MimeRule] = &[
  MimeRule::Prefix("text/plain"),
  MimeRule::Prefix("application/binary"),
  MimeRule::Prefix("application/octet-stream"),
  MimeRule::Prefix("application/json"),
  MimeRule::Prefix("application/x-tgif"),
];

const ASSETBUNDLE_TYPES: &[MimeRule] = &[
  MimeRule::Prefix("application/binary"),
  MimeRule::Prefix("application/octet-stream"),
];

const IMAGE_TYPES: &[MimeRule] = &[
  MimeRule::Exact("image/jpeg"),
  MimeRule::Exact("image/jpg"),
  MimeRule::Exact("image/png"),
  MimeRule::Exact("application/octet-stream"),
  MimeRule::Exact("application/binary"),
  MimeRule::Exact("video/mp4"),
];

const AUDIO_TYPES: &[MimeRule] = &[
  MimeRule::Exact("application/octet-stream"),
  MimeRule::Exact("application/binary"),
  MimeRule::Prefix("audio/"),
];

const PDF_TYPES: &[MimeRule] = &[
  MimeRule::Exact("application/pdf"),
  MimeRule::Exact("application/binary"),
  MimeRule::Exact("application/octet-stream"),
];

/// Content types acceptable for an asset kind.
pub fn accepted_types(kind: AssetKind) -> &'static [MimeRule] {
  match kind {
    AssetKind::Mesh | AssetKind::ColliderMesh => MESH_TYPES,
    AssetKind::AssetBundle => ASSETBUNDLE_TYPES,
    AssetKind::Image => IMAGE_TYPES,
    AssetKind::Audio => AUDIO_TYPES,
    AssetKind::Pdf => PDF_TYPES,
  }
}

/// Remove any parameters (`; charset=...`) from a content-type header value.
pub fn strip_mime_params(content_type: &str) -> &str {
  content_type
    .split_once(';')
    .map_or(content_type, |(mime, _)| mime)
    .trim()
}

/// Whether a declared content type fits the family expected for `kind`.
pub fn is_expected_type(kind: AssetKind, content_type: &str) -> bool {
  let mime = strip_mime_params(content_type).to_ascii_lowercase();
  accepted_types(kind).iter().any(|rule| rule.matches(&mime))
}
