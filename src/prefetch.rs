//! Prefetch orchestrator: download every asset a save refers to into the cache.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info};

use crate::cancel::CancellationToken;
use crate::error::{Error, Result};
use crate::fetch::{
  AssetOutcome, AssetSource, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT, FetchError, FetchOptions,
  HttpSource, Prefetcher,
};
use crate::progress::ProgressSink;
use crate::save::SaveDocument;

/// Placeholder shown when a save has no readable title.
const UNKNOWN_SAVE_NAME: &str = "???";

/// Settings for a prefetch run, including the HTTP client setup.
#[derive(Debug, Clone)]
pub struct PrefetchOptions {
  /// Per-asset behaviour.
  pub fetch: FetchOptions,
  /// Timeout for a single request.
  pub timeout: Duration,
  /// `User-Agent` header value.
  pub user_agent: String,
}

impl Default for PrefetchOptions {
  fn default() -> Self {
    Self {
      fetch: FetchOptions::default(),
      timeout: DEFAULT_TIMEOUT,
      user_agent: DEFAULT_USER_AGENT.to_string(),
    }
  }
}

impl PrefetchOptions {
  /// Build the HTTP source these options describe.
  pub fn http_source(&self) -> Result<HttpSource> {
    HttpSource::new(self.timeout, &self.user_agent)
  }
}

/// Summary of one save's prefetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefetchReport {
  /// Save file that was processed.
  pub save: PathBuf,
  /// Assets downloaded.
  pub fetched: usize,
  /// Assets already present in the cache.
  pub cached: usize,
  /// Dry run: assets that would have been downloaded.
  pub planned: usize,
  /// URLs whose request failed, with the reason.
  pub failed: Vec<(String, FetchError)>,
  /// Downloads kept despite an unexpected content type.
  pub mismatched: usize,
  /// The run stopped early because cancellation was signalled.
  pub cancelled: bool,
}

impl PrefetchReport {
  fn new(save: &Path) -> Self {
    Self {
      save: save.to_path_buf(),
      ..Self::default()
    }
  }

  fn record(&mut self, url: &str, outcome: AssetOutcome) {
    match outcome {
      AssetOutcome::Cancelled => self.cancelled = true,
      AssetOutcome::Duplicate => {}
      AssetOutcome::Cached(_) => self.cached += 1,
      AssetOutcome::WouldFetch(_) => self.planned += 1,
      AssetOutcome::Fetched {
        unexpected_type, ..
      } => {
        self.fetched += 1;
        if unexpected_type.is_some() {
          self.mismatched += 1;
        }
      }
      AssetOutcome::Failed(err) => self.failed.push((url.to_string(), err)),
    }
  }
}

/// Download every asset referenced by the save at `path`.
///
/// Per-asset network failures are reported and recorded; anything else that goes wrong
/// ends the run with an error. Cancellation ends it early with `cancelled` set.
pub fn prefetch_save(
  path: &Path,
  options: &FetchOptions,
  source: &dyn AssetSource,
  token: &CancellationToken,
  sink: &mut dyn ProgressSink,
) -> Result<PrefetchReport> {
  let loaded = SaveDocument::load(path);
  let save_name = loaded
    .as_ref()
    .ok()
    .and_then(SaveDocument::save_name)
    .unwrap_or(UNKNOWN_SAVE_NAME);
  sink.info(&format!(
    "Prefetching assets for {} ({save_name}).",
    path.display()
  ));

  let save = loaded.inspect_err(|err| {
    sink.warn(&format!(
      "Error retrieving URLs from {}: {err}",
      path.display()
    ));
  })?;

  if !options.gamedata_dir.is_dir() {
    return Err(Error::GamedataMissing {
      path: options.gamedata_dir.clone(),
    });
  }

  let mut report = PrefetchReport::new(path);
  let mut prefetcher = Prefetcher::new(options, source, token);

  for asset in save.assets() {
    let asset = asset?;
    let outcome = prefetcher.prefetch(&asset, sink)?;
    report.record(&asset.url, outcome);
    if report.cancelled {
      info!(save = %path.display(), "prefetch cancelled");
      sink.info("Aborted.");
      return Ok(report);
    }
  }

  debug!(
    save = %path.display(),
    urls = prefetcher.seen_count(),
    fetched = report.fetched,
    failed = report.failed.len(),
    "prefetch finished"
  );
  if options.dry_run {
    sink.info(&format!("Dry-run for {} completed.", path.display()));
  } else {
    sink.info(&format!("Prefetching {} completed.", path.display()));
  }
  Ok(report)
}

/// Prefetch several saves in order.
///
/// Stops at the first fatal error, or after the save during which cancellation was observed.
pub fn prefetch_files(
  paths: &[PathBuf],
  options: &FetchOptions,
  source: &dyn AssetSource,
  token: &CancellationToken,
  sink: &mut dyn ProgressSink,
) -> Result<Vec<PrefetchReport>> {
  let mut reports = Vec::with_capacity(paths.len());
  for path in paths {
    let report = prefetch_save(path, options, source, token, sink)?;
    let cancelled = report.cancelled;
    reports.push(report);
    if cancelled {
      break;
    }
  }
  Ok(reports)
}
