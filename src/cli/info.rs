use magnet::core::MagnetResult;
use magnet::manager::PackageManager;
use std::path::Path;

pub fn run(manager: &PackageManager, archive: &Path, json: bool) -> MagnetResult<()> {
    let info = manager.read_info(archive)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("{} v{}", info.name, info.version);
    println!("  protocol:    {}", info.protocol_version);
    if !info.info.is_empty() {
        println!("  info:        {}", info.info);
    }
    if !info.description.is_empty() {
        println!("  description: {}", info.description);
    }
    if !info.exec_cmd.is_empty() {
        println!("  command:     {}", info.exec_cmd);
    }
    if let Some((exec_name, checksum)) = info.verified_executable() {
        println!("  executable:  {} (md5 {})", exec_name, checksum);
    }
    Ok(())
}
