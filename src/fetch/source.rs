//! Network access for the prefetcher.

use std::fmt;
use std::io::Read;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;

/// Default connection timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default `User-Agent` header.
pub const DEFAULT_USER_AGENT: &str = "tts-backup";

/// A successful response whose body has not been read yet.
pub struct FetchResponse {
  /// Raw `Content-Type` header, if the server sent one.
  pub content_type: Option<String>,
  /// Declared body length in bytes.
  pub content_length: Option<u64>,
  /// Response body, streamed to disk by the caller.
  pub body: Box<dyn Read>,
}

impl fmt::Debug for FetchResponse {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("FetchResponse")
      .field("content_type", &self.content_type)
      .field("content_length", &self.content_length)
      .finish_non_exhaustive()
  }
}

/// Per-asset network failure. The prefetcher records these and moves on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
  /// The server answered with a non-success status.
  #[error("Error {code} ({reason})")]
  Status {
    /// HTTP status code.
    code: u16,
    /// Canonical reason phrase.
    reason: String,
  },
  /// The request did not complete within the configured timeout.
  #[error("Error (timed out)")]
  Timeout,
  /// Connection, DNS, TLS or protocol failure.
  #[error("Error ({0})")]
  Transport(String),
}

impl From<reqwest::Error> for FetchError {
  fn from(err: reqwest::Error) -> Self {
    if err.is_timeout() {
      Self::Timeout
    } else if let Some(status) = err.status() {
      Self::Status {
        code: status.as_u16(),
        reason: status.canonical_reason().unwrap_or("unknown").to_string(),
      }
    } else {
      Self::Transport(err.to_string())
    }
  }
}

/// Something that can perform a GET for an asset URL.
pub trait AssetSource {
  /// Fetch `url`, returning the response head and an unread body.
  fn get(&self, url: &str) -> Result<FetchResponse, FetchError>;
}

/// Blocking HTTP source backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpSource {
  client: Client,
}

impl HttpSource {
  /// Build a client with the given timeout and `User-Agent`.
  pub fn new(timeout: Duration, user_agent: &str) -> crate::Result<Self> {
    let client = Client::builder()
      .timeout(timeout)
      .user_agent(user_agent)
      .build()?;
    Ok(Self { client })
  }
}

impl AssetSource for HttpSource {
  fn get(&self, url: &str) -> Result<FetchResponse, FetchError> {
    let response = self.client.get(url).send()?.error_for_status()?;
    let content_type = response
      .headers()
      .get(CONTENT_TYPE)
      .and_then(|value| value.to_str().ok())
      .map(str::to_string);
    let content_length = response.content_length();

    Ok(FetchResponse {
      content_type,
      content_length,
      body: Box::new(response),
    })
  }
}
