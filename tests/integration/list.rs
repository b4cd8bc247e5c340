//! Tests for `magnet list` command

use super::common::TestEnv;
use predicates::prelude::*;
use std::fs;

#[test]
fn test_list_empty() {
    let env = TestEnv::new();

    env.magnet()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No packages installed."));
}

#[test]
fn test_list_installed() {
    let env = TestEnv::new();
    for name in ["beta", "alpha"] {
        let archive = env.package(name, 4, &[]);
        env.magnet().arg("install").arg(&archive).assert().success();
    }

    let output = env.magnet().arg("list").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);

    let alpha = stdout.find("alpha v4").unwrap();
    let beta = stdout.find("beta v4").unwrap();
    assert!(alpha < beta, "packages sorted by name");
    assert!(stdout.contains("alpha build 4"));
}

#[test]
fn test_list_single_package() {
    let env = TestEnv::new();
    for name in ["alpha", "beta"] {
        let archive = env.package(name, 1, &[]);
        env.magnet().arg("install").arg(&archive).assert().success();
    }

    env.magnet()
        .args(["list", "beta"])
        .assert()
        .success()
        .stdout(predicate::str::contains("beta v1"))
        .stdout(predicate::str::contains("alpha").not());
}

#[test]
fn test_list_reads_legacy_array_records() {
    let env = TestEnv::new();
    let records = serde_json::json!({
        "hello": [{
            "name": "hello",
            "version": 9,
            "info": "",
            "pkgPath": "/tmp/hello.pkg",
            "installPath": "/tmp/hello",
        }]
    });
    fs::write(env.record_file(), records.to_string()).unwrap();

    env.magnet()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("hello v9"));
}

#[test]
fn test_list_with_corrupt_config() {
    let env = TestEnv::with_settings("record_policy: [broken\n");

    env.magnet()
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config"))
        .stderr(predicate::str::contains("--config"));
}
