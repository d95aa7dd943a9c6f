//! Save/load round trips through the filesystem

use super::test_utils::tree;
use blockmap::{equal, Manifest, ManifestError, ManifestOptions};
use std::fs;

#[test]
fn test_save_load_equal() {
    let dir = tree(&[("a.txt", "hello"), ("b/b.txt", "world")]);

    let mut manifest = Manifest::new(dir.path());
    manifest.generate().unwrap();
    manifest.save(dir.path(), None).unwrap();

    let loaded = Manifest::open(dir.path(), None, ManifestOptions::default()).unwrap();
    assert!(equal(&manifest, &loaded));
    assert!(loaded.verify().is_ok());
    assert_eq!(
        loaded.archive().unwrap().marshal_canonical().unwrap(),
        manifest.archive().unwrap().marshal_canonical().unwrap()
    );
}

#[test]
fn test_saved_manifest_detects_change() {
    let dir = tree(&[("a.txt", "hello"), ("b/b.txt", "world")]);

    let mut manifest = Manifest::new(dir.path());
    manifest.generate().unwrap();
    manifest.save(dir.path(), None).unwrap();

    fs::write(dir.path().join("a.txt"), "hellp").unwrap();

    let saved = Manifest::open(dir.path(), None, ManifestOptions::default()).unwrap();
    let mut current = Manifest::new(dir.path());
    current.generate().unwrap();
    assert!(!equal(&saved, &current));
}

#[test]
fn test_custom_output_name() {
    let dir = tree(&[("a.txt", "hello")]);
    let options = ManifestOptions {
        output_name: ".manifest".to_string(),
        ..Default::default()
    };

    let mut manifest = Manifest::with_options(dir.path(), options.clone());
    manifest.generate().unwrap();
    let path = manifest.save(dir.path(), None).unwrap();
    assert_eq!(path, dir.path().join(".manifest"));
    assert!(!dir.path().join(".link").exists());

    let loaded = Manifest::open(dir.path(), None, options).unwrap();
    assert_eq!(loaded.output_name(), ".manifest");
    assert!(equal(&manifest, &loaded));
}

#[test]
fn test_ungenerated_save_fails() {
    let dir = tree(&[("a.txt", "hello")]);
    let manifest = Manifest::new(dir.path());
    assert!(matches!(
        manifest.save(dir.path(), None),
        Err(ManifestError::NotGenerated { .. })
    ));
}

#[test]
fn test_tampered_archive_fails_verification() {
    let dir = tree(&[("a.txt", "hello")]);

    let mut manifest = Manifest::new(dir.path());
    manifest.generate().unwrap();
    let path = manifest.save(dir.path(), None).unwrap();

    // Swap the recorded digest for a.txt while keeping the root hash
    let mut record: serde_json::Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
    let forged = record["rootHash"].clone();
    record["archive"]["a.txt"] = forged;
    fs::write(&path, serde_json::to_vec(&record).unwrap()).unwrap();

    let loaded = Manifest::open(dir.path(), None, ManifestOptions::default()).unwrap();
    assert!(matches!(
        loaded.verify(),
        Err(ManifestError::DigestMismatch { .. })
    ));
    assert!(!equal(&manifest, &loaded));
}
