use anyhow::Result;
use std::path::{Path, PathBuf};

use bibeasy_core::model::PubType;
use bibeasy_convert::ccv::read_ccv_file;
use bibeasy_convert::{match_records, Config};

pub fn run_match(
    ccv_path: &Path,
    input: Option<PathBuf>,
    types: &[PubType],
    json: bool,
) -> Result<()> {
    let config = Config::load()?;
    let sheet = super::load_sheet(&config, input.as_deref(), types, None)?;
    let ccv = read_ccv_file(ccv_path)?;
    log::info!(
        "Comparing {} sheet records against {} CCV publications",
        sheet.len(),
        ccv.len()
    );

    let report = match_records(&sheet, &ccv, types);
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{report}");
    }
    Ok(())
}
