//! Command dispatch through `RunContext` on real trees

use super::test_utils::tree;
use blockmap::cli::{Commands, RunContext};
use std::fs;

fn generate_cmd(name: Option<&str>) -> Commands {
    Commands::Generate {
        name: name.map(str::to_string),
        ignore: Vec::new(),
        auto_ignore: false,
        no_save: false,
    }
}

fn verify_cmd(name: Option<&str>) -> Commands {
    Commands::Verify {
        name: name.map(str::to_string),
    }
}

#[test]
fn test_named_save_verifies_unchanged() {
    let dir = tree(&[("a.txt", "hello"), ("b/b.txt", "world")]);
    let context = RunContext::new(dir.path().to_path_buf(), None).unwrap();

    assert!(context.execute(&generate_cmd(Some("backup"))).unwrap().success);
    assert!(dir.path().join("backup.link").exists());

    let outcome = context.execute(&verify_cmd(Some("backup"))).unwrap();
    assert!(outcome.success, "{}", outcome.output);
}

#[test]
fn test_verify_detects_change_to_link_named_file() {
    let dir = tree(&[("a.txt", "hello"), ("weblink.link", "v1")]);
    let context = RunContext::new(dir.path().to_path_buf(), None).unwrap();

    assert!(context.execute(&generate_cmd(None)).unwrap().success);
    assert!(context.execute(&verify_cmd(None)).unwrap().success);

    fs::write(dir.path().join("weblink.link"), "TAMPERED").unwrap();
    let outcome = context.execute(&verify_cmd(None)).unwrap();
    assert!(!outcome.success);
    assert!(outcome.output.contains("CHANGED"));
}
