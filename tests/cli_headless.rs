use std::fs;
use std::process::Command;

use tempfile::tempdir;

#[test]
fn test_headless_dry_run_lists_selected_files() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("photos/raw")).unwrap();
    fs::create_dir_all(root.join("photos/edited")).unwrap();
    fs::create_dir_all(root.join("music")).unwrap();
    fs::write(root.join("photos/cover.jpg"), "c").unwrap();
    fs::write(root.join("photos/raw/a.cr2"), "a").unwrap();
    fs::write(root.join("photos/edited/a.jpg"), "e").unwrap();
    fs::write(root.join("music/song.flac"), "m").unwrap();

    let bin = env!("CARGO_BIN_EXE_dirpick");
    let output = Command::new(bin)
        .arg(root)
        .args(["--headless", "--dry-run", "--select", "photos", "--exclude", "photos/raw"])
        .env("RUST_LOG", "off")
        .output()
        .unwrap();

    assert!(
        output.status.success(),
        "stderr:\n{}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("# Selected subtrees (1)"), "got:\n{}", stdout);
    assert!(stdout.contains("# Files (2)"), "got:\n{}", stdout);
    assert!(stdout.contains("cover.jpg"), "got:\n{}", stdout);
    assert!(!stdout.contains("a.cr2"), "got:\n{}", stdout);
    assert!(!stdout.contains("song.flac"), "got:\n{}", stdout);
    assert!(stdout.contains("Would copy 2 files"), "got:\n{}", stdout);
}

#[test]
fn test_headless_without_select_is_rejected() {
    let dir = tempdir().unwrap();
    let bin = env!("CARGO_BIN_EXE_dirpick");
    let output = Command::new(bin)
        .arg(dir.path())
        .args(["--headless"])
        .output()
        .unwrap();
    assert!(!output.status.success());
}

#[test]
fn test_select_outside_root_fails() {
    let dir = tempdir().unwrap();
    let other = tempdir().unwrap();
    let bin = env!("CARGO_BIN_EXE_dirpick");
    let output = Command::new(bin)
        .arg(dir.path())
        .arg("--headless")
        .arg("--dry-run")
        .arg("--select")
        .arg(other.path())
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cannot select"), "got:\n{}", stderr);
}

#[test]
fn test_empty_selection_stops_before_scanning() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("photos")).unwrap();
    fs::write(dir.path().join("photos/cover.jpg"), "c").unwrap();
    let bin = env!("CARGO_BIN_EXE_dirpick");

    let dry_run = Command::new(bin)
        .arg(dir.path())
        .args(["--headless", "--dry-run", "--select", "photos", "--exclude", "photos"])
        .env("RUST_LOG", "off")
        .output()
        .unwrap();
    assert!(dry_run.status.success());
    let stdout = String::from_utf8_lossy(&dry_run.stdout);
    assert!(stdout.contains("No directories selected"), "got:\n{}", stdout);
    assert!(!stdout.contains("# Files"), "got:\n{}", stdout);

    let copy = Command::new(bin)
        .arg(dir.path())
        .args(["--headless", "--select", "photos", "--exclude", "photos"])
        .env("RUST_LOG", "off")
        .output()
        .unwrap();
    assert_eq!(copy.status.code(), Some(1));
}
