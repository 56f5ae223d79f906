use anyhow::Result;
use std::path::PathBuf;

use bibeasy_core::refs::scan_refs;
use bibeasy_convert::Config;

pub fn run_show(text: &str, input: Option<PathBuf>) -> Result<()> {
    let config = Config::load()?;
    let records = super::load_sheet(&config, input.as_deref(), &[], None)?;
    let text = super::file_or_inline(text)?;

    for id in scan_refs(&text) {
        match records.iter().find(|r| r.id == id) {
            Some(record) => {
                let first_author = record.author_list().first().copied().unwrap_or_default();
                println!("{:<5}{}..., {}", id.to_string(), first_author, record.title);
            }
            None => log::warn!("No sheet entry matched reference ID '{}'; skipping", id),
        }
    }
    Ok(())
}
