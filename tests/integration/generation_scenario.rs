//! End-to-end generation over a real directory tree

use super::test_utils::{tree, write_files};
use blockmap::archive::Archive;
use blockmap::tree::hasher::compute_content_hash;
use blockmap::{equal, Manifest, ManifestOptions};
use std::fs;

#[test]
fn test_two_file_tree() {
    let dir = tree(&[("a.txt", "hello"), ("b/b.txt", "world")]);

    let mut manifest = Manifest::new(dir.path());
    let generation = manifest.generate().unwrap();
    assert!(generation.is_complete());
    assert_eq!(generation.entries, 2);

    let archive = manifest.archive().unwrap();
    let paths: Vec<_> = archive.paths().collect();
    assert_eq!(paths, vec!["a.txt", "b/b.txt"]);
    assert_eq!(archive.get("a.txt"), Some(&compute_content_hash(b"hello")));
    assert_eq!(archive.get("b/b.txt"), Some(&compute_content_hash(b"world")));

    let mut expected = Archive::new();
    expected.insert("a.txt", compute_content_hash(b"hello"));
    expected.insert("b/b.txt", compute_content_hash(b"world"));
    let expected_root = compute_content_hash(&expected.marshal_canonical().unwrap());
    assert_eq!(manifest.root_digest(), Some(&expected_root));
    assert_eq!(generation.root_digest, expected_root);
}

#[test]
fn test_content_change_changes_root() {
    let dir = tree(&[("a.txt", "hello"), ("b/b.txt", "world")]);

    let mut original = Manifest::new(dir.path());
    original.generate().unwrap();

    fs::write(dir.path().join("a.txt"), "hellp").unwrap();
    let mut changed = Manifest::new(dir.path());
    changed.generate().unwrap();

    assert_ne!(original.root_digest(), changed.root_digest());
    assert!(!equal(&original, &changed));
}

#[test]
fn test_generation_is_idempotent() {
    let dir = tree(&[("x/y/z.bin", "zzz"), ("top.txt", "top")]);

    let mut manifest = Manifest::new(dir.path());
    let first = manifest.generate().unwrap();
    let second = manifest.generate().unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_regeneration_after_save_excludes_manifest_file() {
    let dir = tree(&[("a.txt", "hello"), ("b/b.txt", "world")]);

    let options = ManifestOptions {
        saved_names: vec!["backup".to_string()],
        ..Default::default()
    };
    let mut manifest = Manifest::with_options(dir.path(), options);
    let before = manifest.generate().unwrap();
    manifest.save(dir.path(), None).unwrap();
    manifest.save(dir.path(), Some("backup")).unwrap();
    assert!(dir.path().join(".link").exists());

    let after = manifest.generate().unwrap();
    assert_eq!(before.root_digest, after.root_digest);
    assert!(!manifest.archive().unwrap().contains(".link"));
    assert!(!manifest.archive().unwrap().contains("backup.link"));
}

#[test]
fn test_user_files_with_output_extension_are_content() {
    let dir = tree(&[("a.txt", "hello"), ("weblink.link", "v1"), ("docs.manifest.link", "d")]);

    let mut original = Manifest::new(dir.path());
    original.generate().unwrap();
    original.save(dir.path(), None).unwrap();
    let paths: Vec<_> = original.archive().unwrap().paths().collect();
    assert_eq!(paths, vec!["a.txt", "docs.manifest.link", "weblink.link"]);

    fs::write(dir.path().join("weblink.link"), "TAMPERED").unwrap();
    let mut current = Manifest::new(dir.path());
    current.generate().unwrap();
    assert!(!equal(&original, &current));
}

#[test]
fn test_ignore_paths_on_disk() {
    let dir = tree(&[("src/main.rs", "fn main() {}"), ("build/out.o", "obj")]);

    let mut manifest = Manifest::new(dir.path());
    manifest.set_ignore_paths(["build/"]);
    manifest.generate().unwrap();

    let archive = manifest.archive().unwrap();
    assert!(archive.contains("src/main.rs"));
    assert!(archive.paths().all(|p| !p.starts_with("build/")));

    // Ignored content can change without affecting the digest
    let digest = *manifest.root_digest().unwrap();
    write_files(dir.path(), &[("build/out.o", "different"), ("build/new.o", "new")]);
    manifest.generate().unwrap();
    assert_eq!(manifest.root_digest(), Some(&digest));
}

#[test]
fn test_missing_root_is_fatal() {
    let dir = tree(&[]);
    let mut manifest = Manifest::new(dir.path().join("missing"));
    let err = manifest.generate().unwrap_err();
    assert!(matches!(err, blockmap::ManifestError::Walk { .. }));
    assert!(manifest.root_digest().is_none());
}

#[cfg(unix)]
#[test]
fn test_symlinks_are_not_followed() {
    let dir = tree(&[("a.txt", "hello")]);
    std::os::unix::fs::symlink(dir.path().join("a.txt"), dir.path().join("link.txt")).unwrap();

    let mut manifest = Manifest::new(dir.path());
    manifest.generate().unwrap();
    assert!(!manifest.archive().unwrap().contains("link.txt"));
}

#[cfg(unix)]
#[test]
fn test_auto_ignore_unreadable_file() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tree(&[("a.txt", "hello"), ("secret/key", "private")]);
    let secret = dir.path().join("secret").join("key");
    fs::set_permissions(&secret, fs::Permissions::from_mode(0o000)).unwrap();
    if fs::read(&secret).is_ok() {
        // Running with privileges that bypass file modes
        fs::set_permissions(&secret, fs::Permissions::from_mode(0o644)).unwrap();
        return;
    }

    let mut strict = Manifest::new(dir.path());
    match strict.generate() {
        Err(blockmap::ManifestError::Hash(e)) => assert!(e.is_permission_denied()),
        other => panic!("expected a permission error, got {other:?}"),
    }

    let mut manifest = Manifest::new(dir.path());
    manifest.set_auto_ignore(true);
    let generation = manifest.generate().unwrap();

    fs::set_permissions(&secret, fs::Permissions::from_mode(0o644)).unwrap();

    assert_eq!(generation.skipped, vec!["secret/key".to_string()]);
    assert!(generation.warning().unwrap().to_string().contains("secret/key"));
    assert_eq!(generation.entries, 1);
    assert!(manifest.archive().unwrap().contains("a.txt"));
    assert!(manifest.ignore_paths().contains(&"secret/key".to_string()));
}
