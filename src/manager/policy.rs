use crate::core::{MagnetError, MagnetResult};
use magnet_core::{Package, PackageInfo};

/// Flags deciding how an install treats records already present for its name
///
/// The default installs only when nothing is recorded under the name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InstallPolicy {
    /// Skip the existing-record check entirely
    pub force: bool,
    /// Accept installs whose version is strictly newer than every existing record
    pub allow_newer_version: bool,
    /// Remove every existing record before installing
    pub uninstall_existing: bool,
    /// With `allow_newer_version`, remove the older records being superseded
    pub uninstall_old: bool,
}

impl InstallPolicy {
    pub const NOT_EXISTS_ONLY: Self = Self {
        force: false,
        allow_newer_version: false,
        uninstall_existing: false,
        uninstall_old: false,
    };

    pub fn forced() -> Self {
        Self {
            force: true,
            ..Self::default()
        }
    }

    /// Install newer versions and drop the old ones
    pub fn upgrade() -> Self {
        Self {
            allow_newer_version: true,
            uninstall_old: true,
            ..Self::default()
        }
    }

    pub fn replace() -> Self {
        Self {
            uninstall_existing: true,
            ..Self::default()
        }
    }
}

/// Decide which existing records to remove before installing `info`.
///
/// `force` wins over everything, then `uninstall_existing`, then
/// `allow_newer_version`. Any existing record whose version is not strictly
/// older aborts an `allow_newer_version` install.
pub fn plan_removals(
    existing: Vec<Package>,
    info: &PackageInfo,
    policy: InstallPolicy,
) -> MagnetResult<Vec<Package>> {
    if policy.force || existing.is_empty() {
        return Ok(Vec::new());
    }
    if policy.uninstall_existing {
        return Ok(existing);
    }
    if policy.allow_newer_version {
        let mut stale = Vec::new();
        for pkg in existing {
            if info.version <= pkg.version {
                return Err(MagnetError::VersionNotNewer {
                    existing: Box::new(pkg),
                    version: info.version,
                });
            }
            if policy.uninstall_old {
                stale.push(pkg);
            }
        }
        return Ok(stale);
    }

    match existing.into_iter().next() {
        Some(pkg) => Err(MagnetError::PackageExists {
            existing: Box::new(pkg),
        }),
        None => Ok(Vec::new()),
    }
}
