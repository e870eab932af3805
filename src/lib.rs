#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod asset_paths;
pub mod backup;
pub mod bundle;
pub mod cancel;
pub mod config;
pub mod error;
pub mod fetch;
pub mod locator;
pub mod models;
pub mod prefetch;
pub mod progress;
pub mod save;

pub use backup::{BackupOptions, BackupReport, backup_save};
pub use cancel::CancellationToken;
pub use config::ToolConfig;
pub use error::{Error, Result};
pub use fetch::{AssetSource, FetchError, FetchOptions, HttpSource};
pub use locator::{AssetLocator, resolve};
pub use models::{AssetKind, AssetReference, CachePath};
pub use prefetch::{PrefetchOptions, PrefetchReport, prefetch_files, prefetch_save};
pub use progress::{ConsoleSink, ProgressSink, RecordingSink};
pub use save::SaveDocument;
