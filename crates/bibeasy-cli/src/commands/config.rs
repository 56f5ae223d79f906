use anyhow::Result;

use bibeasy_convert::{config, Config};

/// Show the current effective configuration.
pub fn show_config() -> Result<()> {
    let config = Config::load()?;

    println!("Current Configuration");
    println!("=====================\n");

    println!("Config file: {}", config::config_file_path().display());
    let exists = config::config_file_path().exists();
    println!(
        "File exists: {}\n",
        if exists { "yes" } else { "no (using defaults)" }
    );

    println!("Settings:");
    println!(
        "  sheet_url: {}",
        config.sheet_url.as_deref().unwrap_or("<not set>")
    );
    println!(
        "  labels_path: {}",
        config
            .labels_path
            .as_deref()
            .map_or("<not set>".to_string(), |p| p.display().to_string())
    );
    println!(
        "  roster_path: {}",
        config
            .roster_path
            .as_deref()
            .map_or("<built-in roster>".to_string(), |p| p.display().to_string())
    );
    println!("  cache_dir: {}", config.cache_dir.display());

    println!("\nPriority: CLI args > ENV vars (BIB_*) > Config file > Defaults");

    Ok(())
}

/// Write a commented template config file if none exists.
pub fn init_config() -> Result<()> {
    let path = config::config_file_path();
    if config::ensure_config_file()? {
        println!("Created config file: {}", path.display());
    } else {
        println!("Config file already exists: {}", path.display());
    }
    Ok(())
}
