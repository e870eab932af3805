//! Backup orchestrator: bundle a save and every cached asset it uses into one archive.

use std::collections::HashSet;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::bundle::{ArchiveOptions, ArchiveWriter, WriteOutcome};
use crate::error::{Error, Result};
use crate::progress::ProgressSink;
use crate::save::SaveDocument;

/// Settings for a backup run.
#[derive(Debug, Clone, Default)]
pub struct BackupOptions {
  /// Root of the game's cache.
  pub gamedata_dir: PathBuf,
  /// Archive to create; derived from the save name when `None`.
  pub output: Option<PathBuf>,
  /// Report what would be archived without creating anything.
  pub dry_run: bool,
  /// Skip assets that are not cached instead of aborting.
  pub ignore_missing: bool,
  /// Free-text comment stored in the archive manifest.
  pub comment: Option<String>,
}

/// Summary of a finished backup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackupReport {
  /// Archive written, `None` for dry runs.
  pub archive: Option<PathBuf>,
  /// Members written (or that would have been written), including the save itself.
  pub written: usize,
  /// Assets skipped because they were not cached.
  pub missing: usize,
}

/// Archive name used when no output is given: the save's file name without `.json`, plus `.zip`.
pub fn default_archive_name(save_path: &Path) -> PathBuf {
  let base = save_path
    .file_name()
    .map(OsStr::to_string_lossy)
    .unwrap_or_default();
  let stem = base.strip_suffix(".json").unwrap_or(&base);
  PathBuf::from(format!("{stem}.zip"))
}

/// Back up the save at `save_path` together with its cached assets.
pub fn backup_save(
  save_path: &Path,
  options: &BackupOptions,
  sink: &mut dyn ProgressSink,
) -> Result<BackupReport> {
  let save = SaveDocument::load(save_path)?;
  if !options.gamedata_dir.is_dir() {
    return Err(Error::GamedataMissing {
      path: options.gamedata_dir.clone(),
    });
  }

  let target = options
    .output
    .clone()
    .unwrap_or_else(|| default_archive_name(save_path));
  let archive_options = ArchiveOptions {
    dry_run: options.dry_run,
    ignore_missing: options.ignore_missing,
  };
  let save_member = save_path
    .file_name()
    .map(|name| name.to_string_lossy().into_owned())
    .unwrap_or_default();

  let result = ArchiveWriter::scoped(&target, archive_options, |writer| {
    let mut report = BackupReport::default();
    let mut seen = HashSet::new();

    for asset in save.assets() {
      let asset = asset?;
      if !seen.insert(asset.url.clone()) {
        continue;
      }
      let member = asset.cache_path();
      let source = member.under(&options.gamedata_dir);
      let outcome = writer.write(&source, Some(member.as_str()))?;
      log_outcome(&outcome, &mut report, sink);
    }

    let outcome = writer.write(save_path, Some(&save_member))?;
    log_outcome(&outcome, &mut report, sink);
    writer.put_metadata(options.comment.as_deref())?;
    Ok(report)
  });

  let (mut report, archive) = match result {
    Ok(done) => done,
    Err(err) => {
      if let Error::MissingAsset { path } = &err {
        sink.warn(&format!(
          "Could not write {} to Zip ({err}).\nAborting.",
          path.display()
        ));
      }
      return Err(err);
    }
  };

  match &archive {
    Some(archive) => {
      info!(save = %save_path.display(), archive = %archive.display(), "backup written");
      sink.info(&format!(
        "Backed-up contents for {} found in {}.",
        save_path.display(),
        archive.display()
      ));
    }
    None => sink.info(&format!("Dry run for {} completed.", save_path.display())),
  }
  report.archive = archive;
  Ok(report)
}

fn log_outcome(outcome: &WriteOutcome, report: &mut BackupReport, sink: &mut dyn ProgressSink) {
  match outcome {
    WriteOutcome::Duplicate => debug!("member already archived"),
    WriteOutcome::Written(path) | WriteOutcome::WouldWrite(path) => {
      report.written += 1;
      sink.info(&absolute(path).display().to_string());
    }
    WriteOutcome::Missing(path) => {
      report.missing += 1;
      sink.info(&format!("{} (not found)", absolute(path).display()));
    }
  }
}

fn absolute(path: &Path) -> PathBuf {
  std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
