//! Tests for `magnet info` command

use super::common::{TestEnv, HELLO_SCRIPT_MD5};
use predicates::prelude::*;

#[test]
fn test_info_prints_manifest() {
    let env = TestEnv::new();
    let archive = env.executable_package("hello", 3, HELLO_SCRIPT_MD5);

    env.magnet()
        .arg("info")
        .arg(&archive)
        .assert()
        .success()
        .stdout(predicate::str::contains("hello v3"))
        .stdout(predicate::str::contains("hello.sh"))
        .stdout(predicate::str::contains(HELLO_SCRIPT_MD5));

    assert!(!env.install_dir().join("hello").exists(), "info must not install");
}

#[test]
fn test_info_json() {
    let env = TestEnv::new();
    let archive = env.package("hello", 7, &[]);

    let output = env.magnet().arg("info").arg(&archive).arg("--json").output().unwrap();
    assert!(output.status.success());

    let info: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(info["name"], "hello");
    assert_eq!(info["appVersion"], 7);
}

#[test]
fn test_info_manifest_in_subdirectory() {
    let env = TestEnv::new();
    let manifest = br#"{"appVersion": 2, "name": "nested"}"#;
    let archive = env.archive("nested.pkg", &[("meta/pkg.info", manifest.as_slice())]);

    env.magnet()
        .arg("info")
        .arg(&archive)
        .assert()
        .success()
        .stdout(predicate::str::contains("nested v2"));
}

#[test]
fn test_info_without_manifest() {
    let env = TestEnv::new();
    let archive = env.archive("bare.pkg", &[("readme.txt", b"no manifest".as_slice())]);

    env.magnet()
        .arg("info")
        .arg(&archive)
        .assert()
        .failure()
        .stderr(predicate::str::contains("pkg.info"));
}

#[test]
fn test_info_not_a_zip() {
    let env = TestEnv::new();
    let archive = env.root().join("broken.pkg");
    std::fs::write(&archive, "definitely not a zip").unwrap();

    env.magnet()
        .arg("info")
        .arg(&archive)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Archive unreadable"));
}
