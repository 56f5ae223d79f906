use anyhow::{Context, Result};
use clap::ValueEnum;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use bibeasy_core::model::{PubType, Record};
use bibeasy_core::taxonomy::LabelSet;
use bibeasy_convert::output::{
    format_records, render_bibtex, render_markdown, separate_path, CitationStyle,
};
use bibeasy_convert::sheet::{apply_filters, FilterOptions};
use bibeasy_convert::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// The lab website's markdown/HTML hybrid
    Markdown,
    /// A BibTeX database
    Bibtex,
    /// Plain-text citations, one per line
    Text,
}

#[derive(Debug, clap::Args)]
pub struct FormatArgs {
    /// Sheet input (CSV file or directory; default: fetch cache)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output file (stdout when omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "markdown")]
    pub format: OutputFormat,

    /// Citation style for text output
    #[arg(short, long, default_value = "apa")]
    pub style: CitationStyle,

    /// Publication types to include (default: all)
    #[arg(short = 't', long = "type")]
    pub types: Vec<PubType>,

    /// Keep only publications from this year onward
    #[arg(long, value_name = "YEAR")]
    pub min_year: Option<i32>,

    /// Keep only these reference ordinals, e.g. "1,3,5:9"
    #[arg(long, value_name = "LIST")]
    pub ids: Option<String>,

    /// Keep only rows where this sheet column is checked ("x")
    #[arg(long, value_name = "COLUMN")]
    pub filter_col: Option<String>,

    /// Columns a row must fill to be kept (talks have no Authors)
    #[arg(long, value_delimiter = ',', value_name = "COLS")]
    pub required_columns: Option<Vec<String>>,

    /// Most-recent first instead of oldest first
    #[arg(long)]
    pub reverse: bool,

    /// One output file per publication type
    #[arg(long)]
    pub keep_separate: bool,
}

pub fn run_format(args: FormatArgs) -> Result<()> {
    let config = Config::load()?;
    let records = super::load_sheet(
        &config,
        args.input.as_deref(),
        &args.types,
        args.required_columns.as_deref(),
    )?;
    let filters = FilterOptions {
        min_year: args.min_year,
        marker: args.filter_col.clone(),
        reverse: args.reverse,
    };
    let mut records = apply_filters(records, &filters);
    if let Some(spec) = &args.ids {
        let ordinals = bibeasy_core::refs::parse_num_list(spec)?;
        records.retain(|r| ordinals.contains(&r.id.ordinal));
    }

    if args.keep_separate {
        let output = args.output.as_deref().with_context(|| {
            "--keep-separate writes one file per type; pass --output".to_string()
        })?;
        let mut by_type: BTreeMap<PubType, Vec<Record>> = BTreeMap::new();
        for record in records {
            by_type.entry(record.pub_type).or_default().push(record);
        }
        for (pub_type, records) in by_type {
            let rendered = render(&records, &args, &config)?;
            let path = separate_path(output, pub_type);
            std::fs::write(&path, rendered)?;
            log::info!("Formatting type: '{}'", pub_type);
            log::info!("  Selected entries: {}", records.len());
            log::info!("  File written: {}", path.display());
        }
    } else {
        let rendered = render(&records, &args, &config)?;
        match &args.output {
            Some(path) => {
                std::fs::write(path, rendered)?;
                log::info!("Selected entries: {}", records.len());
                log::info!("File written: {}", path.display());
            }
            None => print!("{rendered}"),
        }
    }

    Ok(())
}

fn render(records: &[Record], args: &FormatArgs, config: &Config) -> Result<String> {
    match args.format {
        OutputFormat::Markdown => {
            write_labels_sidecar(args, config)?;
            Ok(render_markdown(records))
        }
        OutputFormat::Bibtex => Ok(render_bibtex(records)),
        OutputFormat::Text => {
            let roster = super::load_roster(config)?;
            let mut lines = format_records(records, args.style, &roster).join("\n");
            lines.push('\n');
            Ok(lines)
        }
    }
}

/// Markdown output for the website goes along with a label-buttons
/// HTML file, written next to the output.
fn write_labels_sidecar(args: &FormatArgs, config: &Config) -> Result<()> {
    let Some(labels_path) = &config.labels_path else {
        return Ok(());
    };
    let labels = LabelSet::load(labels_path)?;
    let dir = args
        .output
        .as_deref()
        .and_then(Path::parent)
        .unwrap_or_else(|| Path::new("."));
    let path = dir.join("labels_publication.html");
    std::fs::write(&path, labels.to_html())?;
    log::info!("Label buttons written: {}", path.display());
    Ok(())
}
