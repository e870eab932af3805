//! Helpers for naming cached assets and filtering URL references.
//!
//! Filtering (which keys hold URLs, how in-band metadata is removed) and cache naming are kept
//! in separate submodules so both the locator and the transfer stages share one definition of
//! where an asset lives on disk.

mod cache;
mod filters;

pub use cache::{
  ASSETBUNDLES_DIR, AUDIO_DIR, IMAGES_DIR, MODELS_DIR, PDF_DIR, cache_path, recode_url,
};
pub use filters::{
  EXCLUDED_URL_KEYS, has_url_scheme, is_excluded_url_key, is_url_key, strip_inband_metadata,
};
