use crate::package::Package;
use thiserror::Error;

pub type MagnetResult<T> = Result<T, MagnetError>;

#[derive(Error, Debug)]
pub enum MagnetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Path error: {0}")]
    Path(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Archive unreadable: {0}")]
    ArchiveUnreadable(String),

    #[error("Manifest {0} not found in package")]
    ManifestMissing(String),

    #[error("Invalid manifest: {0}")]
    ManifestInvalid(String),

    /// An archive entry would land outside the install directory.
    #[error("Unsafe entry path in archive: {0}")]
    UnsafeEntryPath(String),

    #[error("Checksum mismatch for {file}. Expected {expected}, got {actual}")]
    ChecksumMismatch {
        file: String,
        expected: String,
        actual: String,
    },

    #[error(
        "Package {} exists with version {}, not older than install version {version}",
        existing.name,
        existing.version
    )]
    VersionNotNewer {
        existing: Box<Package>,
        version: i64,
    },

    #[error("Package {} exists", existing.name)]
    PackageExists { existing: Box<Package> },

    #[error("Package {0} not found")]
    PackageNotFound(String),

    #[error("Invalid package record: {0}")]
    InvalidRecord(String),

    #[error("Task {0} is already running")]
    TaskAlreadyRunning(String),

    /// More completions than additions were reported for a task.
    #[error("Task {0} completed more times than steps were added")]
    TaskOverCompleted(String),

    #[error("Watch error: {0}")]
    Watch(String),

    #[error("Background task failed: {0}")]
    Join(String),
}
