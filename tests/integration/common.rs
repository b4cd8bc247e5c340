//! Common utilities for integration tests

use assert_cmd::Command;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zip::write::FileOptions;
use zip::ZipWriter;

/// MD5 of `HELLO_SCRIPT`
pub const HELLO_SCRIPT_MD5: &str = "d604a220708aa59433ba410986cd4ffa";
pub const HELLO_SCRIPT: &[u8] = b"#!/bin/sh\necho hello\n";

/// Scratch directory with its own config, install dir and record file
pub struct TestEnv {
    temp: TempDir,
    config: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        Self::with_settings("")
    }

    /// Create an environment whose config also contains `settings` (YAML lines)
    pub fn with_settings(settings: &str) -> Self {
        let temp = TempDir::new().unwrap();
        let config = temp.path().join("config.yaml");
        let content = format!(
            "install_dir: {}\nrecord_file: {}\n{}",
            temp.path().join("packages").display(),
            temp.path().join("packages.json").display(),
            settings
        );
        fs::write(&config, content).unwrap();
        Self { temp, config }
    }

    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    pub fn install_dir(&self) -> PathBuf {
        self.temp.path().join("packages")
    }

    pub fn record_file(&self) -> PathBuf {
        self.temp.path().join("packages.json")
    }

    pub fn records(&self) -> serde_json::Value {
        let content = fs::read_to_string(self.record_file()).unwrap();
        serde_json::from_str(&content).unwrap()
    }

    pub fn magnet(&self) -> Command {
        let mut cmd = Command::cargo_bin("magnet").unwrap();
        cmd.arg("--config").arg(&self.config).env("RUST_LOG", "warn");
        cmd
    }

    /// Build `<name>-<version>.pkg` holding a manifest and `files`
    pub fn package(&self, name: &str, version: i64, files: &[(&str, &[u8])]) -> PathBuf {
        let manifest = serde_json::json!({
            "protocolVersion": 1,
            "appVersion": version,
            "name": name,
            "info": format!("{} build {}", name, version),
        });
        self.package_with_manifest(&format!("{}-{}.pkg", name, version), &manifest, files)
    }

    /// Build a package whose `bin/hello.sh` is checked against `checksum`
    pub fn executable_package(&self, name: &str, version: i64, checksum: &str) -> PathBuf {
        let manifest = serde_json::json!({
            "protocolVersion": 1,
            "appVersion": version,
            "name": name,
            "execCmd": "bin/hello.sh",
            "execName": "hello.sh",
            "checksum": checksum,
        });
        self.package_with_manifest(
            &format!("{}-{}.pkg", name, version),
            &manifest,
            &[("bin/hello.sh", HELLO_SCRIPT)],
        )
    }

    pub fn package_with_manifest(
        &self,
        file_name: &str,
        manifest: &serde_json::Value,
        files: &[(&str, &[u8])],
    ) -> PathBuf {
        let manifest = serde_json::to_vec(manifest).unwrap();
        let mut entries: Vec<(&str, &[u8])> = vec![("pkg.info", manifest.as_slice())];
        entries.extend_from_slice(files);
        self.archive(file_name, &entries)
    }

    /// Build a zip archive with exactly `entries`
    pub fn archive(&self, file_name: &str, entries: &[(&str, &[u8])]) -> PathBuf {
        let path = self.temp.path().join(file_name);
        let mut zip = ZipWriter::new(fs::File::create(&path).unwrap());
        for (name, data) in entries {
            zip.start_file(*name, FileOptions::default()).unwrap();
            zip.write_all(data).unwrap();
        }
        zip.finish().unwrap();
        path
    }
}
