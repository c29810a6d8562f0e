//! `ferry platform` command

use anyhow::Result;

use ferry::Platform;

pub fn execute() -> Result<()> {
    let platform = Platform::host();
    let conventions = platform.conventions();

    println!("Platform: {}", conventions.platform_tag);
    println!("    OS:   {}", platform.os);
    println!("    Arch: {}", platform.arch);
    println!();
    println!("Naming:");
    println!("  library:    {}", conventions.lib_file_name("{name}"));
    println!("  executable: {}", conventions.exe_file_name("{name}"));

    Ok(())
}
