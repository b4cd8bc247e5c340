//! Zip package installer

use crate::core::path::ensure_dir;
use crate::core::{MagnetError, MagnetResult};
use crate::di::{InstallStrategy, Installer};
use crate::package::checksum::{checksums_match, HashingWriter};
use magnet_core::package::MANIFEST_FILENAME;
use magnet_core::{Package, PackageInfo};
use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};
use zip::ZipArchive;

const MANIFEST_PREALLOC_LIMIT: u64 = 64 * 1024;

/// Failed install, with the partially installed record when one exists
#[derive(Debug, Error)]
#[error("{error}")]
pub struct InstallFailure {
    pub package: Option<Package>,
    #[source]
    pub error: MagnetError,
}

impl From<MagnetError> for InstallFailure {
    fn from(error: MagnetError) -> Self {
        Self {
            package: None,
            error,
        }
    }
}

/// Installs zip packages under a managed directory
pub struct ZipInstaller {
    install_dir: PathBuf,
}

impl ZipInstaller {
    /// Create an installer rooted at `install_dir`, creating it if needed
    pub fn new(install_dir: impl Into<PathBuf>) -> MagnetResult<Self> {
        let install_dir = install_dir.into();
        ensure_dir(&install_dir)?;
        Ok(Self { install_dir })
    }

    pub fn install_dir(&self) -> &Path {
        &self.install_dir
    }
}

impl Installer for ZipInstaller {
    fn read_info(&self, source: &Path) -> MagnetResult<PackageInfo> {
        let mut archive = open_archive(source)?;
        read_manifest(&mut archive)
    }

    fn install(
        &self,
        source: &Path,
        strategy: &dyn InstallStrategy,
    ) -> Result<Package, InstallFailure> {
        let mut archive = open_archive(source)?;
        let info = read_manifest(&mut archive)?;
        let install_path = strategy.gen_install_path(&self.install_dir, &info)?;
        let pkg = Package::from_info(&info, source, &install_path);

        debug!(
            package = %pkg.name,
            version = pkg.version,
            path = %install_path.display(),
            "extracting"
        );
        match extract_all(&mut archive, &install_path, &info) {
            Ok(count) => {
                info!(package = %pkg.name, version = pkg.version, files = count, "installed");
                Ok(pkg)
            }
            Err(error) => Err(InstallFailure {
                package: Some(pkg),
                error,
            }),
        }
    }

    fn uninstall(&self, pkg: &Package, delete_package_file: bool) -> MagnetResult<()> {
        remove_tree(&pkg.install_path)?;

        if delete_package_file {
            match fs::remove_file(&pkg.pkg_path) {
                Err(e) if e.kind() != io::ErrorKind::NotFound => return Err(e.into()),
                _ => {}
            }
        }

        debug!(package = %pkg.name, version = pkg.version, "uninstalled");
        Ok(())
    }
}

fn open_archive(source: &Path) -> MagnetResult<ZipArchive<File>> {
    let file = File::open(source)
        .map_err(|e| MagnetError::ArchiveUnreadable(format!("{}: {}", source.display(), e)))?;
    ZipArchive::new(file)
        .map_err(|e| MagnetError::ArchiveUnreadable(format!("{}: {}", source.display(), e)))
}

fn is_manifest(entry_name: &str) -> bool {
    !entry_name.ends_with('/')
        && Path::new(entry_name).file_name() == Some(OsStr::new(MANIFEST_FILENAME))
}

fn read_manifest(archive: &mut ZipArchive<File>) -> MagnetResult<PackageInfo> {
    let name = archive
        .file_names()
        .find(|name| is_manifest(name))
        .map(str::to_owned)
        .ok_or_else(|| MagnetError::ManifestMissing(MANIFEST_FILENAME.to_string()))?;

    let mut entry = archive
        .by_name(&name)
        .map_err(|e| MagnetError::ArchiveUnreadable(e.to_string()))?;
    let mut data = Vec::with_capacity(manifest_capacity(entry.size()));
    entry
        .read_to_end(&mut data)
        .map_err(|e| MagnetError::ArchiveUnreadable(e.to_string()))?;

    PackageInfo::from_slice(&data)
}

/// Pre-allocation for the manifest buffer; the header size is untrusted
fn manifest_capacity(declared: u64) -> usize {
    declared.min(MANIFEST_PREALLOC_LIMIT) as usize
}

/// Extract every entry beneath `install_path`, returning the number of files written
fn extract_all(
    archive: &mut ZipArchive<File>,
    install_path: &Path,
    info: &PackageInfo,
) -> MagnetResult<usize> {
    let verified = info.verified_executable();
    let mut written = 0;

    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| MagnetError::ArchiveUnreadable(e.to_string()))?;
        let relative = entry
            .enclosed_name()
            .map(Path::to_path_buf)
            .ok_or_else(|| MagnetError::UnsafeEntryPath(entry.name().to_string()))?;
        let target = install_path.join(&relative);

        if entry.is_dir() {
            fs::create_dir_all(&target)?;
            continue;
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = File::create(&target)?;
        match verified {
            Some((exec_name, expected)) if relative.file_name() == Some(OsStr::new(exec_name)) => {
                let mut writer = HashingWriter::new(&mut file);
                io::copy(&mut entry, &mut writer)?;
                let actual = writer.finish()?;
                if !checksums_match(expected, &actual) {
                    return Err(MagnetError::ChecksumMismatch {
                        file: relative.display().to_string(),
                        expected: expected.to_string(),
                        actual,
                    });
                }
                debug!(file = %relative.display(), "checksum verified");
            }
            _ => {
                io::copy(&mut entry, &mut file)?;
            }
        }

        #[cfg(unix)]
        if let Some(mode) = entry.unix_mode() {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&target, fs::Permissions::from_mode(mode & 0o777))?;
        }

        written += 1;
    }

    Ok(written)
}

fn remove_tree(path: &Path) -> MagnetResult<()> {
    if path.as_os_str().is_empty() {
        return Ok(());
    }
    match fs::remove_dir_all(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e.into()),
        _ => Ok(()),
    }
}
