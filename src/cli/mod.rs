pub mod info;
pub mod install;
pub mod list;
pub mod uninstall;
pub mod watch;

use magnet::core::MagnetError;
use magnet::Package;

/// Render an error with a hint on how to recover, where one exists
pub fn format_error(e: &MagnetError) -> String {
    let hint = match e {
        MagnetError::PackageExists { .. } => {
            Some("Use --force, --uninstall-existing or --allow-newer to install anyway.")
        }
        MagnetError::VersionNotNewer { .. } => {
            Some("Use --uninstall-existing to replace the installed versions.")
        }
        MagnetError::PackageNotFound(_) => Some("Run `magnet list` to see installed packages."),
        MagnetError::TaskAlreadyRunning(_) => {
            Some("Another operation on this package is in progress; retry once it finishes.")
        }
        MagnetError::ChecksumMismatch { .. } => {
            Some("The package archive is corrupt or was modified after it was built.")
        }
        MagnetError::Config(_) => {
            Some("Check the config file, or pass --config to use another one.")
        }
        _ => None,
    };

    match hint {
        Some(hint) => format!("Error: {}\n  help: {}", e, hint),
        None => format!("Error: {}", e),
    }
}

pub fn print_package(pkg: &Package) {
    println!(
        "{} v{}  {}",
        pkg.name,
        pkg.version,
        pkg.install_path.display()
    );
    if !pkg.info.is_empty() {
        println!("    {}", pkg.info);
    }
}
