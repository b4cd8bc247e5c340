//! Tests for `magnet uninstall` command

use super::common::TestEnv;
use predicates::prelude::*;

#[test]
fn test_uninstall_removes_files_and_record() {
    let env = TestEnv::new();
    let archive = env.package("hello", 1, &[("a.txt", b"a".as_slice())]);
    env.magnet().arg("install").arg(&archive).assert().success();

    env.magnet()
        .args(["uninstall", "hello"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Uninstalled hello v1"));

    assert!(!env.install_dir().join("hello").exists());
    assert!(env.records().get("hello").is_none());
    assert!(archive.exists(), "archive kept by default");
}

#[test]
fn test_uninstall_delete_archive() {
    let env = TestEnv::new();
    let archive = env.package("hello", 1, &[]);
    env.magnet().arg("install").arg(&archive).assert().success();

    env.magnet()
        .args(["uninstall", "hello", "--delete-archive"])
        .assert()
        .success();

    assert!(!archive.exists());
}

#[test]
fn test_uninstall_archive_deletion_from_config() {
    let env = TestEnv::with_settings("delete_archive_on_uninstall: true\n");
    let first = env.package("hello", 1, &[]);
    env.magnet().arg("install").arg(&first).assert().success();
    env.magnet().args(["uninstall", "hello"]).assert().success();
    assert!(!first.exists());

    let second = env.package("other", 1, &[]);
    env.magnet().arg("install").arg(&second).assert().success();
    env.magnet()
        .args(["uninstall", "other", "--keep-archive"])
        .assert()
        .success();
    assert!(second.exists());
}

#[test]
fn test_uninstall_every_version() {
    let env = TestEnv::with_settings("record_policy: multi\npath_strategy: version\n");
    for version in 1..=3 {
        let archive = env.package("hello", version, &[]);
        env.magnet()
            .args(["install", "--allow-newer"])
            .arg(&archive)
            .assert()
            .success();
    }

    env.magnet()
        .args(["uninstall", "hello"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Uninstalled hello v1"))
        .stdout(predicate::str::contains("Uninstalled hello v3"));

    assert!(env.records().get("hello").is_none());
    assert!(!env.install_dir().join("hello/2").exists());
}

#[test]
fn test_uninstall_unknown_package() {
    let env = TestEnv::new();

    env.magnet()
        .args(["uninstall", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Package ghost not found"))
        .stderr(predicate::str::contains("magnet list"));
}
