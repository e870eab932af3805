use crate::models::{AssetKind, CachePath};

/// Cache directory for Wavefront objects.
pub const MODELS_DIR: &str = "Mods/Models";
/// Cache directory for asset bundles.
pub const ASSETBUNDLES_DIR: &str = "Mods/Assetbundles";
/// Cache directory for images.
pub const IMAGES_DIR: &str = "Mods/Images";
/// Cache directory for audio tracks.
pub const AUDIO_DIR: &str = "Mods/Audio";
/// Cache directory for PDF documents.
pub const PDF_DIR: &str = "Mods/PDF";

/// Recode a URL the way Tabletop Simulator names its cache files.
///
/// Everything except ASCII letters and digits is dropped, underscores included.
pub fn recode_url(url: &str) -> String {
  url.chars().filter(char::is_ascii_alphanumeric).collect()
}

/// Produce the canonical cache location for an asset.
///
/// The result always uses forward slashes; use [`CachePath::under`] to obtain a native path.
pub fn cache_path(kind: AssetKind, url: &str) -> CachePath {
  let stem = recode_url(url);
  let (dir, extension) = match kind {
    AssetKind::Mesh | AssetKind::ColliderMesh => (MODELS_DIR, ".obj"),
    AssetKind::AssetBundle => (ASSETBUNDLES_DIR, ".unity3d"),
    AssetKind::Audio => (AUDIO_DIR, ".MP3"),
    AssetKind::Pdf => (PDF_DIR, ".PDF"),
    AssetKind::Image if url.contains(".png") => (IMAGES_DIR, ".png"),
    AssetKind::Image => (IMAGES_DIR, ".jpg"),
  };
  CachePath::new(format!("{dir}/{stem}{extension}"))
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::path::Path;

  #[test]
  fn recode_keeps_only_alphanumerics() {
    assert_eq!(recode_url("http://host/name-1.png"), "httphostname1png");
    assert_eq!(recode_url("https://a_b.example/x?y=1&z"), "httpsabexamplexy1z");
  }

  #[test]
  fn recode_is_idempotent() {
    let once = recode_url("http://cloud-3.steamusercontent.com/ugc/123/ABC_def/");
    assert_eq!(recode_url(&once), once);
  }

  #[test]
  fn recode_drops_non_ascii_letters() {
    assert_eq!(recode_url("http://例え.jp/ä.png"), "httpjppng");
  }

  #[test]
  fn maps_each_kind_to_its_directory() {
    let url = "http://example.com/asset";
    assert_eq!(
      cache_path(AssetKind::Mesh, url).as_str(),
      "Mods/Models/httpexamplecomasset.obj"
    );
    assert_eq!(
      cache_path(AssetKind::ColliderMesh, url).as_str(),
      "Mods/Models/httpexamplecomasset.obj"
    );
    assert_eq!(
      cache_path(AssetKind::AssetBundle, url).as_str(),
      "Mods/Assetbundles/httpexamplecomasset.unity3d"
    );
    assert_eq!(
      cache_path(AssetKind::Audio, url).as_str(),
      "Mods/Audio/httpexamplecomasset.MP3"
    );
    assert_eq!(
      cache_path(AssetKind::Pdf, url).as_str(),
      "Mods/PDF/httpexamplecomasset.PDF"
    );
    assert_eq!(
      cache_path(AssetKind::Image, url).as_str(),
      "Mods/Images/httpexamplecomasset.jpg"
    );
  }

  #[test]
  fn images_use_png_when_url_mentions_it() {
    assert_eq!(
      cache_path(AssetKind::Image, "http://x/a.png?raw=1").as_str(),
      "Mods/Images/httpxapngraw1.png"
    );
    assert_eq!(
      cache_path(AssetKind::Image, "http://x/a.PNG").as_str(),
      "Mods/Images/httpxaPNG.jpg"
    );
  }

  #[test]
  fn cache_path_is_deterministic() {
    let first = cache_path(AssetKind::Image, "http://x/{ignored}.png");
    let second = cache_path(AssetKind::Image, "http://x/{ignored}.png");
    assert_eq!(first, second);
  }

  #[test]
  fn resolves_under_root() {
    let path = cache_path(AssetKind::Pdf, "http://x/doc").under(Path::new("/data"));
    assert_eq!(
      path,
      Path::new("/data").join("Mods").join("PDF").join("httpxdoc.PDF")
    );
  }
}
