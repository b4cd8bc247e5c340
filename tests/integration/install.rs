//! Tests for `magnet install` command

use super::common::{TestEnv, HELLO_SCRIPT, HELLO_SCRIPT_MD5};
use predicates::prelude::*;
use std::fs;

#[test]
fn test_install_extracts_and_records() {
    let env = TestEnv::new();
    let archive = env.package(
        "hello",
        1,
        &[("bin/run.sh", b"echo hi".as_slice()), ("README", b"docs".as_slice())],
    );

    env.magnet()
        .arg("install")
        .arg(&archive)
        .assert()
        .success()
        .stdout(predicate::str::contains("Installed hello v1"));

    let install_path = env.install_dir().join("hello");
    assert_eq!(fs::read(install_path.join("bin/run.sh")).unwrap(), b"echo hi");
    assert!(install_path.join("README").exists());

    let records = env.records();
    assert_eq!(records["hello"]["version"], 1);
    assert_eq!(records["hello"]["installPath"], install_path.display().to_string());
}

#[test]
fn test_install_verifies_checksum() {
    let env = TestEnv::new();
    let archive = env.executable_package("hello", 1, &HELLO_SCRIPT_MD5.to_uppercase());

    env.magnet().arg("install").arg(&archive).assert().success();

    let script = env.install_dir().join("hello").join("bin/hello.sh");
    assert_eq!(fs::read(script).unwrap(), HELLO_SCRIPT);
}

#[test]
fn test_install_checksum_mismatch_rolls_back() {
    let env = TestEnv::new();
    let archive = env.executable_package("hello", 1, "00000000000000000000000000000000");

    env.magnet()
        .arg("install")
        .arg(&archive)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Checksum mismatch"));

    assert!(!env.install_dir().join("hello").exists());
    assert!(!env.record_file().exists());
}

#[test]
fn test_install_twice_requires_flag() {
    let env = TestEnv::new();
    let archive = env.package("hello", 1, &[]);

    env.magnet().arg("install").arg(&archive).assert().success();
    env.magnet()
        .arg("install")
        .arg(&archive)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Package hello exists"))
        .stderr(predicate::str::contains("help:"));

    env.magnet()
        .args(["install", "--force"])
        .arg(&archive)
        .assert()
        .success();
}

#[test]
fn test_upgrade_side_by_side() {
    let env = TestEnv::with_settings("record_policy: multi\npath_strategy: version\n");
    let v1 = env.package("hello", 1, &[("v1.txt", b"1".as_slice())]);
    let v2 = env.package("hello", 2, &[("v2.txt", b"2".as_slice())]);

    env.magnet().arg("install").arg(&v1).assert().success();
    env.magnet()
        .args(["install", "--allow-newer"])
        .arg(&v2)
        .assert()
        .success();

    assert!(env.install_dir().join("hello/1/v1.txt").exists());
    assert!(env.install_dir().join("hello/2/v2.txt").exists());
    assert_eq!(env.records()["hello"].as_array().unwrap().len(), 2);
}

#[test]
fn test_upgrade_removes_old_version() {
    let env = TestEnv::with_settings("record_policy: multi\npath_strategy: version\n");
    let v1 = env.package("hello", 1, &[]);
    let v2 = env.package("hello", 2, &[]);

    env.magnet().arg("install").arg(&v1).assert().success();
    env.magnet()
        .args(["install", "--allow-newer", "--uninstall-old"])
        .arg(&v2)
        .assert()
        .success();

    assert!(!env.install_dir().join("hello/1").exists());
    assert!(env.install_dir().join("hello/2").exists());
    assert!(v1.exists(), "old archive kept");

    let records = env.records();
    let records = records["hello"].as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["version"], 2);
}

#[test]
fn test_downgrade_rejected() {
    let env = TestEnv::with_settings("record_policy: multi\npath_strategy: version\n");
    let v2 = env.package("hello", 2, &[]);
    let v1 = env.package("hello", 1, &[]);

    env.magnet().arg("install").arg(&v2).assert().success();
    env.magnet()
        .args(["install", "--allow-newer"])
        .arg(&v1)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not older than install version 1"));

    assert!(!env.install_dir().join("hello/1").exists());
}

#[test]
fn test_uninstall_existing_replaces_newer() {
    let env = TestEnv::with_settings("record_policy: multi\npath_strategy: version\n");
    let v2 = env.package("hello", 2, &[]);
    let v1 = env.package("hello", 1, &[]);

    env.magnet().arg("install").arg(&v2).assert().success();
    env.magnet()
        .args(["install", "--uninstall-existing"])
        .arg(&v1)
        .assert()
        .success();

    assert!(!env.install_dir().join("hello/2").exists());
    let records = env.records();
    assert_eq!(records["hello"][0]["version"], 1);
}

#[test]
fn test_install_rejects_escaping_entry() {
    let env = TestEnv::new();
    let manifest = br#"{"appVersion": 1, "name": "evil"}"#;
    let archive = env.archive(
        "evil.pkg",
        &[
            ("pkg.info", manifest.as_slice()),
            ("../outside.txt", b"gotcha".as_slice()),
        ],
    );

    env.magnet()
        .arg("install")
        .arg(&archive)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsafe entry path"));

    assert!(!env.root().join("outside.txt").exists());
    assert!(!env.record_file().exists());
}

#[test]
fn test_install_rejects_path_like_name() {
    let env = TestEnv::new();
    let manifest = br#"{"appVersion": 1, "name": "../escape"}"#;
    let archive = env.archive("escape.pkg", &[("pkg.info", manifest.as_slice())]);

    env.magnet()
        .arg("install")
        .arg(&archive)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid manifest"));
}
