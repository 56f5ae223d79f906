use anyhow::{Context, Result};

use bibeasy_core::model::PubType;
use bibeasy_convert::{config, Config, SheetClient};

pub async fn run_fetch(url: Option<String>) -> Result<()> {
    let config = Config::load_with_sheet_url(url)?;
    let sheet_url = config.sheet_url.as_deref().with_context(|| {
        format!(
            "no sheet URL configured; pass --url or set sheet_url in {}",
            config::config_file_path().display()
        )
    })?;

    let client = SheetClient::new()?;
    let count = match client
        .refresh_cache(sheet_url, &PubType::ALL, &config.cache_dir)
        .await
    {
        Ok(count) => count,
        Err(e) if e.is_transient() => {
            log::warn!("Transient network failure ({e}), retrying once");
            client
                .refresh_cache(sheet_url, &PubType::ALL, &config.cache_dir)
                .await?
        }
        Err(e) => return Err(e.into()),
    };

    println!("Cached {} tabs in {}", count, config.cache_dir.display());
    Ok(())
}
