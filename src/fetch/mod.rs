//! Downloading missing assets into the game's cache.
//!
//! [`source`] abstracts the network behind [`AssetSource`] so the download loop can be driven by
//! the real HTTP client or by an in-memory source. [`mime`] holds the content types accepted per
//! asset kind, and [`prefetcher`] implements the per-asset decision and write steps.

pub mod mime;
pub mod prefetcher;
pub mod source;

pub use mime::{MimeRule, accepted_types, is_expected_type, strip_mime_params};
pub use prefetcher::{AssetOutcome, FetchOptions, Prefetcher};
pub use source::{
  AssetSource, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT, FetchError, FetchResponse, HttpSource,
};
