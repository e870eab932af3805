use crate::models::AssetKind;

/// Key referencing the mesh of a custom model.
pub const MESH_KEY: &str = "MeshURL";
/// Key referencing the collision mesh of a custom model.
pub const COLLIDER_KEY: &str = "ColliderURL";
/// Keys referencing Unity asset bundles.
pub const ASSETBUNDLE_KEYS: &[&str] = &["AssetbundleURL", "AssetbundleSecondaryURL"];
/// Key holding the music player's current track.
pub const CURRENT_AUDIO_KEY: &str = "CurrentAudioURL";
/// Key holding the music player's track list.
pub const AUDIO_LIBRARY_KEY: &str = "AudioLibrary";
/// Key referencing the document of a custom PDF object.
pub const PDF_KEY: &str = "PDFUrl";

/// Classify an asset by the key that referenced it.
///
/// Every URL key that is not a known mesh, bundle, audio or PDF key is treated as an image.
pub fn classify(key: &str) -> AssetKind {
  match key {
    MESH_KEY => AssetKind::Mesh,
    COLLIDER_KEY => AssetKind::ColliderMesh,
    CURRENT_AUDIO_KEY | AUDIO_LIBRARY_KEY => AssetKind::Audio,
    PDF_KEY => AssetKind::Pdf,
    key if ASSETBUNDLE_KEYS.contains(&key) => AssetKind::AssetBundle,
    _ => AssetKind::Image,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn classifies_known_keys() {
    assert_eq!(classify("MeshURL"), AssetKind::Mesh);
    assert_eq!(classify("ColliderURL"), AssetKind::ColliderMesh);
    assert_eq!(classify("AssetbundleURL"), AssetKind::AssetBundle);
    assert_eq!(classify("AssetbundleSecondaryURL"), AssetKind::AssetBundle);
    assert_eq!(classify("CurrentAudioURL"), AssetKind::Audio);
    assert_eq!(classify("AudioLibrary"), AssetKind::Audio);
    assert_eq!(classify("PDFUrl"), AssetKind::Pdf);
  }

  #[test]
  fn falls_back_to_image() {
    for key in ["ImageURL", "FaceURL", "BackURL", "DiffuseURL", "NormalURL", "SkyURL"] {
      assert_eq!(classify(key), AssetKind::Image, "{key}");
    }
  }

  #[test]
  fn matching_is_case_sensitive() {
    assert_eq!(classify("meshurl"), AssetKind::Image);
  }
}
