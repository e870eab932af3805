//! Loading Tabletop Simulator save files.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::locator::AssetLocator;

/// Top-level key holding the human readable save title.
const SAVE_NAME_KEY: &str = "SaveName";

/// A parsed save whose root is known to be a mapping.
#[derive(Debug, Clone)]
pub struct SaveDocument {
  root: Map<String, Value>,
}

impl SaveDocument {
  /// Read and parse a save file.
  ///
  /// A missing file yields [`Error::SaveNotFound`]; anything that is not UTF-8 JSON with an
  /// object at the root yields [`Error::IllegalSavegame`].
  pub fn load(path: &Path) -> Result<Self> {
    let bytes = match fs::read(path) {
      Ok(bytes) => bytes,
      Err(err) if err.kind() == ErrorKind::NotFound => {
        return Err(Error::SaveNotFound {
          path: path.to_path_buf(),
        });
      }
      Err(err) => return Err(Error::Io(err)),
    };

    let text = String::from_utf8(bytes).map_err(|err| {
      Error::IllegalSavegame(format!("{} is not valid UTF-8: {err}", path.display()))
    })?;
    let value: Value = serde_json::from_str(&text).map_err(|err| {
      Error::IllegalSavegame(format!("{} is not valid JSON: {err}", path.display()))
    })?;

    Self::from_value(value)
  }

  /// Wrap an already parsed document, rejecting anything but a mapping at the root.
  pub fn from_value(value: Value) -> Result<Self> {
    match value {
      Value::Object(root) => Ok(Self { root }),
      other => Err(Error::IllegalSavegame(format!(
        "expected a mapping at the root, found {}",
        value_kind(&other)
      ))),
    }
  }

  /// Title stored in the save, when present.
  pub fn save_name(&self) -> Option<&str> {
    self.root.get(SAVE_NAME_KEY).and_then(Value::as_str)
  }

  /// Lazily walk the document yielding every asset reference.
  pub fn assets(&self) -> AssetLocator<'_> {
    AssetLocator::new(&self.root)
  }
}

fn value_kind(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "a boolean",
    Value::Number(_) => "a number",
    Value::String(_) => "a string",
    Value::Array(_) => "a sequence",
    Value::Object(_) => "a mapping",
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;
  use tempfile::tempdir;

  #[test]
  fn loads_mapping_documents() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("save.json");
    fs::write(&path, r#"{"SaveName": "Chess", "ObjectStates": []}"#).unwrap();

    let save = SaveDocument::load(&path).unwrap();
    assert_eq!(save.save_name(), Some("Chess"));
  }

  #[test]
  fn missing_file_is_not_found() {
    let dir = tempdir().unwrap();
    let err = SaveDocument::load(&dir.path().join("nope.json")).unwrap_err();
    assert!(matches!(err, Error::SaveNotFound { .. }));
    assert!(err.is_not_found());
  }

  #[test]
  fn rejects_non_mapping_roots() {
    let err = SaveDocument::from_value(json!([1, 2, 3])).unwrap_err();
    assert!(matches!(err, Error::IllegalSavegame(_)));
  }

  #[test]
  fn rejects_invalid_json_and_encoding() {
    let dir = tempdir().unwrap();
    let broken = dir.path().join("broken.json");
    fs::write(&broken, "{not json").unwrap();
    assert!(matches!(
      SaveDocument::load(&broken),
      Err(Error::IllegalSavegame(_))
    ));

    let latin1 = dir.path().join("latin1.json");
    fs::write(&latin1, b"{\"SaveName\": \"Caf\xe9\"}").unwrap();
    assert!(matches!(
      SaveDocument::load(&latin1),
      Err(Error::IllegalSavegame(_))
    ));
  }

  #[test]
  fn save_name_is_optional() {
    let save = SaveDocument::from_value(json!({"SaveName": 3})).unwrap();
    assert_eq!(save.save_name(), None);
  }
}
