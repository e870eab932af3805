//! Writing backups: the Zip archive writer and the manifest stored in its comment.

pub mod archive;
pub mod manifest;

pub use archive::{ArchiveOptions, ArchiveWriter, WriteOutcome};
pub use manifest::{ArchiveManifest, SCRIPT_REVISION, read_manifest};
