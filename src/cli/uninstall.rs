use magnet::core::MagnetResult;
use magnet::manager::PackageManager;

pub fn run(manager: &PackageManager, package: &str, delete_archive: bool) -> MagnetResult<()> {
    let removed = manager.uninstall(package, delete_archive)?;

    for pkg in &removed {
        println!("✓ Uninstalled {} v{}", pkg.name, pkg.version);
    }
    let remaining = manager.get_package(package).len();
    if remaining > 0 {
        println!("  {} version(s) could not be removed", remaining);
    }
    Ok(())
}
