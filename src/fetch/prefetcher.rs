//! Per-asset download step shared by every save processed in a prefetch run.

use std::borrow::Cow;
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::asset_paths::has_url_scheme;
use crate::cancel::CancellationToken;
use crate::error::{Error, Result};
use crate::fetch::mime::{is_expected_type, strip_mime_params};
use crate::fetch::source::{AssetSource, FetchError};
use crate::models::AssetReference;
use crate::progress::ProgressSink;

/// Behaviour switches for a [`Prefetcher`].
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
  /// Root of the game's cache (`Mods/...` lives below it).
  pub gamedata_dir: PathBuf,
  /// Only report what would be downloaded.
  pub dry_run: bool,
  /// Download even when the cache file already exists.
  pub refetch: bool,
  /// Keep responses whose content type does not match the asset kind.
  pub relax: bool,
}

/// What happened to a single asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetOutcome {
  /// Cancellation was signalled before the asset was looked at.
  Cancelled,
  /// The URL was already handled for this save.
  Duplicate,
  /// The cache file exists and refetching is off.
  Cached(PathBuf),
  /// Dry run: the asset would have been downloaded to this path.
  WouldFetch(PathBuf),
  /// The asset was downloaded.
  Fetched {
    /// Cache file written.
    path: PathBuf,
    /// Bytes written.
    bytes: u64,
    /// Declared content type when it did not match and relax mode kept it anyway.
    unexpected_type: Option<String>,
  },
  /// The request failed; the run continues with the next asset.
  Failed(FetchError),
}

/// Sequential downloader with a per-save set of URLs already handled.
pub struct Prefetcher<'a> {
  options: &'a FetchOptions,
  source: &'a dyn AssetSource,
  token: &'a CancellationToken,
  seen: HashSet<String>,
}

impl<'a> Prefetcher<'a> {
  /// Create a prefetcher with an empty seen set.
  pub fn new(
    options: &'a FetchOptions,
    source: &'a dyn AssetSource,
    token: &'a CancellationToken,
  ) -> Self {
    Self {
      options,
      source,
      token,
      seen: HashSet::new(),
    }
  }

  /// Number of distinct URLs handled so far.
  pub fn seen_count(&self) -> usize {
    self.seen.len()
  }

  /// Make sure `asset` is present in the cache.
  ///
  /// Network failures are reported through the sink and returned as
  /// [`AssetOutcome::Failed`]. A content type mismatch without relax mode, or a failed write,
  /// is returned as an error and must end the run.
  pub fn prefetch(
    &mut self,
    asset: &AssetReference,
    sink: &mut dyn ProgressSink,
  ) -> Result<AssetOutcome> {
    if self.token.is_cancelled() {
      return Ok(AssetOutcome::Cancelled);
    }

    let fetch_url = if has_url_scheme(&asset.url) {
      Cow::Borrowed(asset.url.as_str())
    } else {
      warn!(url = %asset.url, "URL has no scheme, assuming http");
      sink.warn(&format!(
        "Warning: URL {} does not specify a URL scheme. Assuming http.",
        asset.url
      ));
      Cow::Owned(format!("http://{}", asset.url))
    };

    if self.seen.contains(&asset.url) {
      return Ok(AssetOutcome::Duplicate);
    }

    let destination = asset.cache_path().under(&self.options.gamedata_dir);
    if destination.is_file() && !self.options.refetch {
      debug!(url = %asset.url, path = %destination.display(), "already cached");
      self.seen.insert(asset.url.clone());
      return Ok(AssetOutcome::Cached(destination));
    }

    if self.options.dry_run {
      sink.info(&format!("{} dry run", asset.url));
      self.seen.insert(asset.url.clone());
      return Ok(AssetOutcome::WouldFetch(destination));
    }

    let outcome = self.download(asset, &fetch_url, destination, sink)?;
    self.seen.insert(asset.url.clone());
    Ok(outcome)
  }

  fn download(
    &self,
    asset: &AssetReference,
    fetch_url: &str,
    destination: PathBuf,
    sink: &mut dyn ProgressSink,
  ) -> Result<AssetOutcome> {
    let response = match self.source.get(fetch_url) {
      Ok(response) => response,
      Err(err) => {
        warn!(url = %asset.url, error = %err, "fetch failed");
        sink.warn(&format!("{} {err}", asset.url));
        return Ok(AssetOutcome::Failed(err));
      }
    };

    let size = match response.content_length {
      Some(length) => format!("{:.1} kb", length as f64 / 1000.0),
      None => "??? kb".to_string(),
    };

    let unexpected_type = response
      .content_type
      .as_deref()
      .map(strip_mime_params)
      .filter(|mime| !mime.is_empty() && !is_expected_type(asset.kind, mime))
      .map(str::to_string);

    if let (Some(content_type), false) = (&unexpected_type, self.options.relax) {
      sink.warn(&format!(
        "{} ({size}): Error: Content type {content_type} does not match expected type. \
         Aborting. Use --relax to ignore.",
        asset.url
      ));
      return Err(Error::ContentTypeMismatch {
        url: asset.url.clone(),
        content_type: content_type.clone(),
        kind: asset.kind,
      });
    }

    let bytes = write_body(response.body, &destination)?;
    info!(url = %asset.url, bytes, path = %destination.display(), "fetched");
    sink.info(&format!("{} ({size}): ok", asset.url));

    if let Some(content_type) = &unexpected_type {
      sink.warn(&format!(
        "Warning: Content type {content_type} did not match expected type."
      ));
    }

    Ok(AssetOutcome::Fetched {
      path: destination,
      bytes,
      unexpected_type,
    })
  }
}

/// Stream `body` into `destination`, removing the file again if anything fails midway.
fn write_body(mut body: Box<dyn Read>, destination: &Path) -> Result<u64> {
  if let Some(parent) = destination.parent() {
    fs::create_dir_all(parent).map_err(|source| Error::Write {
      path: parent.to_path_buf(),
      source,
    })?;
  }

  let written = File::create(destination).and_then(|mut file| {
    let bytes = io::copy(&mut body, &mut file)?;
    file.sync_all()?;
    Ok(bytes)
  });

  written.map_err(|source| {
    if let Err(err) = fs::remove_file(destination) {
      if err.kind() != io::ErrorKind::NotFound {
        warn!(path = %destination.display(), error = %err, "failed to remove partial download");
      }
    }
    Error::Write {
      path: destination.to_path_buf(),
      source,
    }
  })
}
