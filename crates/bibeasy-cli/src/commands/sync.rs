use anyhow::Result;
use std::path::{Path, PathBuf};

use bibeasy_convert::ccv::sync_ccv;
use bibeasy_convert::Config;

pub fn run_sync(ccv_path: &Path, output: &Path, input: Option<PathBuf>) -> Result<()> {
    let config = Config::load()?;
    let records = super::load_sheet(&config, input.as_deref(), &[], None)?;
    let xml = std::fs::read_to_string(ccv_path)?;

    let updated = sync_ccv(&xml, &records)?;
    std::fs::write(output, updated)?;

    println!("Updated CCV written: {}", output.display());
    Ok(())
}
