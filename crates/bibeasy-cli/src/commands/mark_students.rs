use anyhow::Result;
use std::path::Path;

use bibeasy_convert::ccv::mark_students;
use bibeasy_convert::Config;

pub fn run_mark_students(ccv_path: &Path, output: &Path, append_name: Option<String>) -> Result<()> {
    let config = Config::load()?;
    let mut roster = super::load_roster(&config)?;
    if let Some(name) = append_name {
        log::info!("Treating '{}' as a student", name);
        roster.append(name);
    }

    let xml = std::fs::read_to_string(ccv_path)?;
    let marked = mark_students(&xml, &roster)?;
    std::fs::write(output, marked)?;

    println!("Marked CCV written: {}", output.display());
    Ok(())
}
