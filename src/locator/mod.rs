//! Discovery of asset URLs inside a parsed save document.

mod classify;
mod seek;

pub use classify::{
  ASSETBUNDLE_KEYS, AUDIO_LIBRARY_KEY, COLLIDER_KEY, CURRENT_AUDIO_KEY, MESH_KEY, PDF_KEY,
  classify,
};
pub use seek::{AUDIO_URL_FIELD, AssetLocator};

use crate::save::SaveDocument;

/// Resolve every asset reference in `save`, lazily and in document order.
pub fn resolve(save: &SaveDocument) -> AssetLocator<'_> {
  save.assets()
}
