use std::fs::{self, File};
use std::path::{Path, PathBuf};

use serde_json::json;
use tempfile::{TempDir, tempdir};
use tts_tools::bundle::read_manifest;
use tts_tools::{BackupOptions, Error, RecordingSink, backup_save};

struct Fixture {
  _root: TempDir,
  gamedata: PathBuf,
  save: PathBuf,
  output: PathBuf,
}

fn fixture(save: serde_json::Value) -> Fixture {
  let root = tempdir().unwrap();
  let gamedata = root.path().join("gamedata");
  fs::create_dir_all(&gamedata).unwrap();
  let save_path = root.path().join("TS_Save_1.json");
  fs::write(&save_path, serde_json::to_string_pretty(&save).unwrap()).unwrap();
  Fixture {
    gamedata,
    save: save_path,
    output: root.path().join("backup.zip"),
    _root: root,
  }
}

fn cache(gamedata: &Path, relative: &str, contents: &[u8]) {
  let path = gamedata.join(relative);
  fs::create_dir_all(path.parent().unwrap()).unwrap();
  fs::write(path, contents).unwrap();
}

fn members(archive: &Path) -> Vec<String> {
  let archive = zip::ZipArchive::new(File::open(archive).unwrap()).unwrap();
  let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
  names.sort();
  names
}

fn options(fx: &Fixture) -> BackupOptions {
  BackupOptions {
    gamedata_dir: fx.gamedata.clone(),
    output: Some(fx.output.clone()),
    ..BackupOptions::default()
  }
}

#[test]
fn archives_cached_assets_with_save_and_manifest() {
  let fx = fixture(json!({
    "SaveName": "Scenario A",
    "ObjectStates": [{
      "Name": "Custom_Model",
      "CustomMesh": {
        "MeshURL": "http://example.com/mesh.obj",
        "DiffuseURL": "http://example.com/skin.png"
      }
    }]
  }));
  cache(&fx.gamedata, "Mods/Models/httpexamplecommeshobj.obj", b"v 0 0 0");
  cache(&fx.gamedata, "Mods/Images/httpexamplecomskinpng.png", b"PNG");

  let mut sink = RecordingSink::default();
  let report = backup_save(
    &fx.save,
    &BackupOptions {
      comment: Some("tournament".into()),
      ..options(&fx)
    },
    &mut sink,
  )
  .unwrap();

  assert_eq!(report.archive.as_deref(), Some(fx.output.as_path()));
  assert_eq!(report.written, 3);
  assert_eq!(report.missing, 0);
  assert_eq!(members(&fx.output), vec![
    "Mods/Images/httpexamplecomskinpng.png",
    "Mods/Models/httpexamplecommeshobj.obj",
    "TS_Save_1.json",
  ]);

  let manifest = read_manifest(&fx.output).unwrap();
  assert!(!manifest.script_revision.is_empty());
  assert!(manifest.export_date > 0);
  assert_eq!(manifest.comment.as_deref(), Some("tournament"));
  assert!(sink.contains("Backed-up contents for"));
}

#[test]
fn missing_asset_aborts_without_an_archive() {
  let fx = fixture(json!({
    "ObjectStates": [{"CustomImage": {"ImageURL": "http://example.com/absent.jpg"}}]
  }));

  let mut sink = RecordingSink::default();
  let err = backup_save(&fx.save, &options(&fx), &mut sink).unwrap_err();

  assert!(err.is_not_found());
  assert!(matches!(err, Error::MissingAsset { .. }));
  assert!(!fx.output.exists());
  let leftovers: Vec<_> = fs::read_dir(fx.output.parent().unwrap())
    .unwrap()
    .filter_map(|entry| entry.ok())
    .filter(|entry| entry.file_name().to_string_lossy().ends_with(".part"))
    .collect();
  assert!(leftovers.is_empty());
  assert!(sink.warnings().any(|line| line.contains("Aborting.")));
}

#[test]
fn dry_run_leaves_the_filesystem_untouched() {
  let fx = fixture(json!({
    "ObjectStates": [
      {"CustomImage": {"ImageURL": "http://example.com/cached.jpg"}},
      {"CustomImage": {"ImageURL": "http://example.com/absent.jpg"}}
    ]
  }));
  cache(&fx.gamedata, "Mods/Images/httpexamplecomcachedjpg.jpg", b"JPG");
  fs::write(&fx.output, b"older backup").unwrap();

  let mut sink = RecordingSink::default();
  let report = backup_save(
    &fx.save,
    &BackupOptions {
      dry_run: true,
      ignore_missing: true,
      ..options(&fx)
    },
    &mut sink,
  )
  .unwrap();

  assert_eq!(report.archive, None);
  assert_eq!(report.written, 2);
  assert_eq!(report.missing, 1);
  assert_eq!(fs::read(&fx.output).unwrap(), b"older backup");
  assert_eq!(fs::read_dir(fx.output.parent().unwrap()).unwrap().count(), 3);
  assert!(sink.contains("(not found)"));
  assert!(sink.contains("Dry run for"));
}

#[test]
fn repeated_references_are_archived_once() {
  let fx = fixture(json!({
    "ObjectStates": [
      {"CustomImage": {"ImageURL": "http://example.com/tile.jpg"}},
      {"CustomImage": {"ImageURL": "http://example.com/tile.jpg"}},
      {"Deck": {"FaceURL": "http://example.com/tile.jpg"}}
    ]
  }));
  cache(&fx.gamedata, "Mods/Images/httpexamplecomtilejpg.jpg", b"JPG");

  let report = backup_save(&fx.save, &options(&fx), &mut RecordingSink::default()).unwrap();

  assert_eq!(report.written, 2);
  assert_eq!(members(&fx.output), vec![
    "Mods/Images/httpexamplecomtilejpg.jpg",
    "TS_Save_1.json",
  ]);
}

#[test]
fn illegal_saves_are_rejected_before_archiving() {
  let fx = fixture(json!(["not", "a", "save"]));
  let err = backup_save(&fx.save, &options(&fx), &mut RecordingSink::default()).unwrap_err();
  assert!(matches!(err, Error::IllegalSavegame(_)));
  assert!(!fx.output.exists());
}
