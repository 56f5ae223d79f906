use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use bibeasy_core::taxonomy::LabelSet;
use bibeasy_convert::{config, Config};

pub fn run_check_labels(
    input: Option<PathBuf>,
    labels: Option<PathBuf>,
    html: Option<PathBuf>,
    required_columns: Option<Vec<String>>,
) -> Result<()> {
    let config = Config::load()?;
    let labels_path = labels.or_else(|| config.labels_path.clone()).with_context(|| {
        format!(
            "no labels file given; pass --labels or set labels_path in {}",
            config::config_file_path().display()
        )
    })?;
    let label_set = LabelSet::load(&labels_path)?;
    log::info!(
        "Loaded {} authorized labels from {}",
        label_set.labels().len(),
        labels_path.display()
    );

    if let Some(html_path) = html {
        write_label_buttons(&label_set, &html_path)?;
    }

    let records = super::load_sheet(&config, input.as_deref(), &[], required_columns.as_deref())?;
    let report = label_set.check(&records);
    if report.is_clean() {
        println!("All {} records carry authorized labels.", records.len());
        Ok(())
    } else {
        anyhow::bail!("{report}")
    }
}

fn write_label_buttons(labels: &LabelSet, path: &Path) -> Result<()> {
    std::fs::write(path, labels.to_html())?;
    println!("Label buttons written: {}", path.display());
    Ok(())
}
