use magnet::core::MagnetResult;
use magnet::manager::{InstallPolicy, PackageManager};
use std::path::Path;

pub async fn run(
    manager: &PackageManager,
    archive: &Path,
    policy: InstallPolicy,
) -> MagnetResult<()> {
    let pkg = manager.install(archive, policy).await?;
    manager.close();

    println!(
        "✓ Installed {} v{} to {}",
        pkg.name,
        pkg.version,
        pkg.install_path.display()
    );
    Ok(())
}
