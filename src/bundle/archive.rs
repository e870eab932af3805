//! Write-only Zip archive with de-duplication and dry-run support.

use std::collections::HashSet;
use std::fs::File;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::bundle::manifest::ArchiveManifest;
use crate::error::{Error, Result};

/// Behaviour switches for an [`ArchiveWriter`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ArchiveOptions {
  /// Only report what would be written; never create the archive.
  pub dry_run: bool,
  /// Skip files that are missing on disk instead of failing.
  pub ignore_missing: bool,
}

/// Result of a single [`ArchiveWriter::write`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
  /// The stored name was already handled in this session.
  Duplicate,
  /// The file was copied into the archive.
  Written(PathBuf),
  /// Dry run: the file exists and would have been written.
  WouldWrite(PathBuf),
  /// The file does not exist and missing files are ignored.
  Missing(PathBuf),
}

/// Archive handle that writes each member name at most once.
///
/// Live archives are staged in a temporary file next to the target and only moved into place by
/// [`ArchiveWriter::finish`]. Dropping the writer without finishing discards the staged data, so
/// an aborted backup never leaves an archive behind. In dry-run mode no file is ever created.
pub struct ArchiveWriter {
  target: PathBuf,
  options: ArchiveOptions,
  zip: Option<ZipWriter<NamedTempFile>>,
  stored: HashSet<String>,
  comment: Option<String>,
}

impl ArchiveWriter {
  /// Open a writer that will produce `target` once finished.
  pub fn create(target: impl Into<PathBuf>, options: ArchiveOptions) -> Result<Self> {
    let target = target.into();
    let zip = if options.dry_run {
      None
    } else {
      let staging_dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
      };
      let staging = tempfile::Builder::new()
        .prefix(".tts-backup-")
        .suffix(".zip.part")
        .tempfile_in(&staging_dir)
        .map_err(|source| Error::Write {
          path: target.clone(),
          source,
        })?;
      Some(ZipWriter::new(staging))
    };

    Ok(Self {
      target,
      options,
      zip,
      stored: HashSet::new(),
      comment: None,
    })
  }

  /// Run `body` against a fresh writer, finishing the archive only if it succeeds.
  ///
  /// Returns the body's value and the final archive path (`None` for dry runs).
  pub fn scoped<T>(
    target: impl Into<PathBuf>,
    options: ArchiveOptions,
    body: impl FnOnce(&mut ArchiveWriter) -> Result<T>,
  ) -> Result<(T, Option<PathBuf>)> {
    let mut writer = Self::create(target, options)?;
    let value = body(&mut writer)?;
    let archive = writer.finish()?;
    Ok((value, archive))
  }

  /// Whether this writer only simulates writes.
  pub fn is_dry_run(&self) -> bool {
    self.options.dry_run
  }

  /// Add `source` to the archive under `stored_name` (or its own path when `None`).
  ///
  /// A name already handled is a no-op. A missing source fails with
  /// [`Error::MissingAsset`] unless missing files are ignored.
  pub fn write(&mut self, source: &Path, stored_name: Option<&str>) -> Result<WriteOutcome> {
    let name = match stored_name {
      Some(name) => name.to_string(),
      None => source.to_string_lossy().replace('\\', "/"),
    };
    if self.stored.contains(&name) {
      return Ok(WriteOutcome::Duplicate);
    }

    let present = source.is_file();
    if !present && !self.options.ignore_missing {
      return Err(Error::MissingAsset {
        path: source.to_path_buf(),
      });
    }

    let outcome = match self.zip.as_mut() {
      None if present => WriteOutcome::WouldWrite(source.to_path_buf()),
      None => WriteOutcome::Missing(source.to_path_buf()),
      Some(_) if !present => WriteOutcome::Missing(source.to_path_buf()),
      Some(zip) => match append(zip, source, &name) {
        Ok(()) => WriteOutcome::Written(source.to_path_buf()),
        Err(err) if err.kind() == ErrorKind::NotFound && self.options.ignore_missing => {
          WriteOutcome::Missing(source.to_path_buf())
        }
        Err(err) if err.kind() == ErrorKind::NotFound => {
          return Err(Error::MissingAsset {
            path: source.to_path_buf(),
          });
        }
        Err(err) => return Err(Error::Io(err)),
      },
    };

    debug!(member = %name, outcome = ?outcome, "archive write");
    self.stored.insert(name);
    Ok(outcome)
  }

  /// Record the manifest that becomes the archive comment when the writer finishes.
  pub fn put_metadata(&mut self, comment: Option<&str>) -> Result<()> {
    self.comment = Some(ArchiveManifest::now(comment).to_comment()?);
    Ok(())
  }

  /// Flush the archive, attach the manifest and move it into place.
  ///
  /// Returns the archive path, or `None` in dry-run mode where nothing was opened.
  pub fn finish(mut self) -> Result<Option<PathBuf>> {
    let Some(mut zip) = self.zip.take() else {
      return Ok(None);
    };
    if let Some(comment) = self.comment.take() {
      zip.set_comment(comment);
    }

    let staging = zip.finish()?;
    staging
      .persist(&self.target)
      .map_err(|err| Error::Write {
        path: self.target.clone(),
        source: err.error,
      })?;
    Ok(Some(self.target))
  }
}

fn append(zip: &mut ZipWriter<NamedTempFile>, source: &Path, name: &str) -> io::Result<()> {
  let mut file = File::open(source)?;
  let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
  zip.start_file(name, options).map_err(io::Error::other)?;
  io::copy(&mut file, zip)?;
  Ok(())
}
