//! Durable record of installed packages
//!
//! The record file is a JSON object mapping each package name to one record
//! or an array of records. Both recorders read either shape. Every mutation
//! rewrites the whole file in place; a crash mid-write can leave it truncated.

use crate::core::path::ensure_dir;
use crate::core::{MagnetError, MagnetResult};
use crate::di::Recorder;
use magnet_core::Package;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// How many records a recorder keeps per package name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordPolicy {
    #[default]
    Single,
    Multi,
}

impl RecordPolicy {
    /// Open the record file at `path` with this policy
    pub fn open(self, path: &Path) -> MagnetResult<Arc<dyn Recorder>> {
        Ok(match self {
            RecordPolicy::Single => Arc::new(SingleVersionRecorder::open(path)?),
            RecordPolicy::Multi => Arc::new(MultiVersionRecorder::open(path)?),
        })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredEntry {
    Many(Vec<Package>),
    One(Package),
}

impl StoredEntry {
    fn into_vec(self) -> Vec<Package> {
        match self {
            StoredEntry::Many(pkgs) => pkgs,
            StoredEntry::One(pkg) => vec![pkg],
        }
    }
}

fn load_store(path: &Path) -> MagnetResult<BTreeMap<String, Vec<Package>>> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }

    let data = fs::read(path)?;
    if data.iter().all(u8::is_ascii_whitespace) {
        return Ok(BTreeMap::new());
    }
    let stored: BTreeMap<String, StoredEntry> = serde_json::from_slice(&data)?;
    Ok(stored
        .into_iter()
        .map(|(name, entry)| (name, entry.into_vec()))
        .filter(|(_, pkgs)| !pkgs.is_empty())
        .collect())
}

fn flush<T: Serialize>(path: &Path, store: &T) -> MagnetResult<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let data = serde_json::to_vec_pretty(store)?;
    fs::write(path, data)?;
    debug!(path = %path.display(), "record store flushed");
    Ok(())
}

fn validate(pkg: &Package) -> MagnetResult<()> {
    if pkg.name.is_empty() {
        return Err(MagnetError::InvalidRecord("package name is empty".to_string()));
    }
    if pkg.install_path.as_os_str().is_empty() {
        return Err(MagnetError::InvalidRecord(format!(
            "package {} has no install path",
            pkg.name
        )));
    }
    Ok(())
}

/// Keeps at most one record per name; saving replaces the previous record
pub struct SingleVersionRecorder {
    path: PathBuf,
    packages: Mutex<BTreeMap<String, Package>>,
}

impl SingleVersionRecorder {
    /// Load the record file, or start empty when it does not exist
    pub fn open(path: impl Into<PathBuf>) -> MagnetResult<Self> {
        let path = path.into();
        let packages = load_store(&path)?
            .into_iter()
            .filter_map(|(name, mut pkgs)| pkgs.pop().map(|pkg| (name, pkg)))
            .collect();
        Ok(Self {
            path,
            packages: Mutex::new(packages),
        })
    }
}

impl Recorder for SingleVersionRecorder {
    fn save(&self, pkg: &Package) -> MagnetResult<()> {
        validate(pkg)?;
        let mut packages = self.packages.lock();
        packages.insert(pkg.name.clone(), pkg.clone());
        flush(&self.path, &*packages)
    }

    /// Drops the stored record only when it equals `pkg`; a record saved
    /// later under the same name is kept.
    fn remove(&self, pkg: &Package) -> MagnetResult<()> {
        let mut packages = self.packages.lock();
        if packages.get(&pkg.name) == Some(pkg) {
            packages.remove(&pkg.name);
        }
        flush(&self.path, &*packages)
    }

    fn list_packages(&self) -> Vec<Package> {
        self.packages.lock().values().cloned().collect()
    }

    fn get_package(&self, name: &str) -> Vec<Package> {
        self.packages.lock().get(name).cloned().into_iter().collect()
    }
}

/// Keeps every distinct record per name in install order
pub struct MultiVersionRecorder {
    path: PathBuf,
    packages: Mutex<BTreeMap<String, Vec<Package>>>,
}

impl MultiVersionRecorder {
    /// Load the record file, or start empty when it does not exist
    pub fn open(path: impl Into<PathBuf>) -> MagnetResult<Self> {
        let path = path.into();
        let mut packages = load_store(&path)?;
        for pkgs in packages.values_mut() {
            let mut unique: Vec<Package> = Vec::with_capacity(pkgs.len());
            for pkg in pkgs.drain(..) {
                if !unique.contains(&pkg) {
                    unique.push(pkg);
                }
            }
            *pkgs = unique;
        }
        Ok(Self {
            path,
            packages: Mutex::new(packages),
        })
    }
}

impl Recorder for MultiVersionRecorder {
    fn save(&self, pkg: &Package) -> MagnetResult<()> {
        validate(pkg)?;
        let mut packages = self.packages.lock();
        let entry = packages.entry(pkg.name.clone()).or_default();
        if entry.contains(pkg) {
            return Ok(());
        }
        entry.push(pkg.clone());
        flush(&self.path, &*packages)
    }

    fn remove(&self, pkg: &Package) -> MagnetResult<()> {
        let mut packages = self.packages.lock();
        if let Some(pkgs) = packages.get_mut(&pkg.name) {
            pkgs.retain(|existing| existing != pkg);
            if pkgs.is_empty() {
                packages.remove(&pkg.name);
            }
        }
        flush(&self.path, &*packages)
    }

    fn list_packages(&self) -> Vec<Package> {
        self.packages.lock().values().flatten().cloned().collect()
    }

    fn get_package(&self, name: &str) -> Vec<Package> {
        self.packages.lock().get(name).cloned().unwrap_or_default()
    }
}
