//! Depth-first traversal of an untyped save document.

use serde_json::{Map, Value};

use crate::asset_paths::{is_excluded_url_key, is_url_key, strip_inband_metadata};
use crate::error::{Error, Result};
use crate::locator::classify::{AUDIO_LIBRARY_KEY, classify};
use crate::models::AssetReference;

/// Field of an audio library entry that holds the track URL.
pub const AUDIO_URL_FIELD: &str = "Item1";

/// Lazy iterator over the asset references of a save.
///
/// Mappings are visited in document order. Sequences are entered element by element, skipping
/// anything that is not a mapping, without extending the key path. The iterator is fused after
/// the first error.
pub struct AssetLocator<'a> {
  stack: Vec<Frame<'a>>,
  audio: Option<AudioLibrary<'a>>,
}

enum Frame<'a> {
  Mapping {
    path: Vec<&'a str>,
    entries: serde_json::map::Iter<'a>,
  },
  Sequence {
    path: Vec<&'a str>,
    items: std::slice::Iter<'a, Value>,
  },
}

struct AudioLibrary<'a> {
  path: Vec<&'a str>,
  entries: std::slice::Iter<'a, Value>,
}

enum Step<'a> {
  Pop,
  Skip,
  Descend(Frame<'a>),
  Audio(AudioLibrary<'a>),
  Emit(AssetReference),
  Fail(Error),
}

impl<'a> AssetLocator<'a> {
  /// Start a traversal at the given root mapping.
  pub fn new(root: &'a Map<String, Value>) -> Self {
    Self {
      stack: vec![Frame::Mapping {
        path: Vec::new(),
        entries: root.iter(),
      }],
      audio: None,
    }
  }

  fn fail(&mut self, err: Error) -> Option<Result<AssetReference>> {
    self.stack.clear();
    self.audio = None;
    Some(Err(err))
  }

  fn next_audio_entry(&mut self) -> Option<Step<'a>> {
    let library = self.audio.as_mut()?;
    let step = match library.entries.next() {
      Some(entry) => match audio_entry(&library.path, entry) {
        Ok(Some(reference)) => Step::Emit(reference),
        Ok(None) => Step::Skip,
        Err(err) => Step::Fail(err),
      },
      None => {
        self.audio = None;
        Step::Skip
      }
    };
    Some(step)
  }

  fn next_frame_step(&mut self) -> Option<Step<'a>> {
    let step = match self.stack.last_mut()? {
      Frame::Sequence { path, items } => match items.next() {
        Some(Value::Object(map)) => Step::Descend(Frame::Mapping {
          path: path.clone(),
          entries: map.iter(),
        }),
        Some(_) => Step::Skip,
        None => Step::Pop,
      },
      Frame::Mapping { path, entries } => match entries.next() {
        Some((key, value)) => {
          let mut child = path.clone();
          child.push(key.as_str());
          visit(child, key, value)
        }
        None => Step::Pop,
      },
    };
    Some(step)
  }
}

impl Iterator for AssetLocator<'_> {
  type Item = Result<AssetReference>;

  fn next(&mut self) -> Option<Self::Item> {
    loop {
      let step = match self.next_audio_entry() {
        Some(step) => step,
        None => self.next_frame_step()?,
      };

      match step {
        Step::Pop => {
          self.stack.pop();
        }
        Step::Skip => {}
        Step::Descend(frame) => self.stack.push(frame),
        Step::Audio(library) => self.audio = Some(library),
        Step::Emit(reference) => return Some(Ok(reference)),
        Step::Fail(err) => return self.fail(err),
      }
    }
  }
}

impl std::iter::FusedIterator for AssetLocator<'_> {}

fn visit<'a>(path: Vec<&'a str>, key: &'a str, value: &'a Value) -> Step<'a> {
  if key == AUDIO_LIBRARY_KEY {
    return match value {
      Value::Array(entries) => Step::Audio(AudioLibrary {
        path,
        entries: entries.iter(),
      }),
      Value::Null => Step::Skip,
      other => Step::Fail(Error::UnexpectedStructure {
        key: AUDIO_LIBRARY_KEY.to_string(),
        detail: format!("expected a sequence of tracks, found {other}"),
      }),
    };
  }

  match value {
    Value::Object(map) => Step::Descend(Frame::Mapping {
      path,
      entries: map.iter(),
    }),
    Value::Array(items) => Step::Descend(Frame::Sequence {
      path,
      items: items.iter(),
    }),
    Value::String(raw) if is_url_key(key) && !is_excluded_url_key(key) => {
      let url = strip_inband_metadata(raw);
      if url.is_empty() {
        Step::Skip
      } else {
        Step::Emit(make_reference(&path, url.into_owned()))
      }
    }
    _ => Step::Skip,
  }
}

fn audio_entry(path: &[&str], entry: &Value) -> Result<Option<AssetReference>> {
  let url = entry
    .get(AUDIO_URL_FIELD)
    .ok_or_else(|| Error::UnexpectedStructure {
      key: AUDIO_LIBRARY_KEY.to_string(),
      detail: format!("track without {AUDIO_URL_FIELD}: {entry}"),
    })?
    .as_str()
    .ok_or_else(|| Error::UnexpectedStructure {
      key: AUDIO_LIBRARY_KEY.to_string(),
      detail: format!("{AUDIO_URL_FIELD} is not a string: {entry}"),
    })?;

  if url.is_empty() {
    return Ok(None);
  }
  Ok(Some(make_reference(path, url.to_string())))
}

fn make_reference(path: &[&str], url: String) -> AssetReference {
  let kind = classify(path.last().copied().unwrap_or_default());
  AssetReference {
    path: path.iter().map(|segment| segment.to_string()).collect(),
    url,
    kind,
  }
}
