use std::borrow::Cow;
use std::sync::OnceLock;

use regex::Regex;

/// Tablet page addresses are browser state, not cached assets.
pub const EXCLUDED_URL_KEYS: &[&str] = &["PageURL"];

fn inband_metadata() -> &'static Regex {
  static PATTERN: OnceLock<Regex> = OnceLock::new();
  PATTERN.get_or_init(|| Regex::new(r"\{.*\}").expect("invalid metadata regex"))
}

fn url_scheme() -> &'static Regex {
  static PATTERN: OnceLock<Regex> = OnceLock::new();
  PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:").expect("invalid scheme regex"))
}

/// Determine whether a mapping key names an asset URL.
///
/// Matching is case-insensitive on the `url` suffix, so `MeshURL`, `PDFUrl` and
/// `ImageSecondaryURL` all qualify.
pub fn is_url_key(key: &str) -> bool {
  key
    .get(key.len().saturating_sub(3)..)
    .is_some_and(|suffix| suffix.eq_ignore_ascii_case("url"))
}

/// Keys that end in `url` but never point at cached content.
pub fn is_excluded_url_key(key: &str) -> bool {
  EXCLUDED_URL_KEYS.contains(&key)
}

/// Remove brace-delimited metadata some deck builders embed inside URLs.
pub fn strip_inband_metadata(url: &str) -> Cow<'_, str> {
  inband_metadata().replace_all(url, "")
}

/// Whether the URL starts with an RFC 3986 scheme such as `http:`.
pub fn has_url_scheme(url: &str) -> bool {
  url_scheme().is_match(url)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn recognises_url_keys_case_insensitively() {
    assert!(is_url_key("MeshURL"));
    assert!(is_url_key("PDFUrl"));
    assert!(is_url_key("url"));
    assert!(!is_url_key("Nickname"));
    assert!(!is_url_key("rl"));
    assert!(!is_url_key("URLs"));
  }

  #[test]
  fn handles_multibyte_keys() {
    assert!(!is_url_key("名前"));
    assert!(is_url_key("画像URL"));
  }

  #[test]
  fn excludes_tablet_pages() {
    assert!(is_excluded_url_key("PageURL"));
    assert!(!is_excluded_url_key("ImageURL"));
  }

  #[test]
  fn strips_braced_metadata() {
    assert_eq!(strip_inband_metadata("http://x/{meta}y.png"), "http://x/y.png");
    assert_eq!(
      strip_inband_metadata("{Unique}http://cards.example/sheet.jpg"),
      "http://cards.example/sheet.jpg"
    );
  }

  #[test]
  fn leaves_plain_urls_borrowed() {
    let result = strip_inband_metadata("http://example.com/a.png");
    assert!(matches!(result, Cow::Borrowed(_)));
  }

  #[test]
  fn detects_schemes() {
    assert!(has_url_scheme("http://example.com/a.png"));
    assert!(has_url_scheme("HTTPS://example.com"));
    assert!(has_url_scheme("svn+ssh://host/repo"));
    assert!(!has_url_scheme("example.com/a.png"));
    assert!(!has_url_scheme("//example.com/a.png"));
    assert!(!has_url_scheme("1http://example.com"));
  }
}
