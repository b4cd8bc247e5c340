use super::print_package;
use magnet::core::MagnetResult;
use magnet::manager::PackageManager;

pub fn run(manager: &PackageManager, package: Option<&str>) -> MagnetResult<()> {
    let mut packages = match package {
        Some(name) => manager.get_package(name),
        None => manager.list_packages(),
    };

    if packages.is_empty() {
        println!("No packages installed.");
        return Ok(());
    }

    packages.sort_by(|a, b| a.name.cmp(&b.name).then(a.version.cmp(&b.version)));
    println!("Installed packages:");
    for pkg in &packages {
        print_package(pkg);
    }
    Ok(())
}
