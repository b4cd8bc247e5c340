use magnet::core::{MagnetError, MagnetResult};
use magnet::manager::PackageManager;

/// Watch every installed package until Ctrl-C
pub async fn run(manager: &PackageManager) -> MagnetResult<()> {
    let started = manager.watch_installed();
    if started == 0 {
        println!("No packages to watch.");
        return Ok(());
    }

    println!("Watching {} package(s). Press Ctrl-C to stop.", started);
    let result = tokio::signal::ctrl_c()
        .await
        .map_err(|e| MagnetError::Watch(format!("Failed to listen for Ctrl-C: {}", e)));

    manager.close();
    result
}
