use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use bibeasy_core::model::PubType;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "bibeasy", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// Download the publication sheet tabs into the local cache
    ///
    /// Fetches every publication tab (article, proceedings, talk,
    /// book-chapter) of the configured Google Sheet as CSV and stores
    /// them under the cache directory. All other commands read from
    /// this cache when no explicit input file is given.
    Fetch {
        /// Google Sheet URL (default: sheet_url from the config file)
        #[arg(long)]
        url: Option<String>,
    },
    /// Render the bibliography as markdown, BibTeX or citation text
    Format(commands::format::FormatArgs),
    /// Check sheet labels against the authorized label list
    CheckLabels {
        /// Sheet input (CSV file or directory; default: fetch cache)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Authorized-labels file, one label per line
        /// (default: labels_path from the config file)
        #[arg(long)]
        labels: Option<PathBuf>,

        /// Also write the label-buttons HTML used by the website
        #[arg(long, value_name = "FILE")]
        html: Option<PathBuf>,

        /// Columns a row must fill to be kept (talks have no Authors)
        #[arg(long, value_delimiter = ',', value_name = "COLS")]
        required_columns: Option<Vec<String>>,
    },
    /// Compare sheet records against a CCV export
    Match {
        /// CCV XML export
        ccv: PathBuf,

        /// Sheet input (CSV file or directory; default: fetch cache)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Publication types to compare (default: article, proceedings)
        #[arg(short = 't', long = "type")]
        types: Vec<PubType>,

        /// Print the report as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Renumber references cited against an old CCV export
    ///
    /// Publications are matched between the two exports by title, and
    /// every reference block in the input text ([J12, C8], ...) is
    /// rewritten with the destination numbering. References with no
    /// match come out as '?'.
    RewriteRefs {
        /// CCV XML the input references were made against
        xml_src: PathBuf,

        /// CCV XML to renumber against
        xml_dest: PathBuf,

        /// Text to rewrite: a file path, or inline text
        #[arg(short, long)]
        input: String,

        /// Sort references within each block
        #[arg(long)]
        sort: bool,
    },
    /// Copy authors and venues from the sheet into a CCV export
    Sync {
        /// CCV XML export to update
        ccv: PathBuf,

        /// Where to write the updated XML
        #[arg(short, long)]
        output: PathBuf,

        /// Sheet input (CSV file or directory; default: fetch cache)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
    /// Asterisk student names in a CCV export
    MarkStudents {
        /// CCV XML export to update
        ccv: PathBuf,

        /// Where to write the updated XML
        #[arg(short, long)]
        output: PathBuf,

        /// Extra name to treat as a student (for testing)
        #[arg(long, value_name = "NAME")]
        append_name: Option<String>,
    },
    /// Show the effective configuration
    Config {
        /// Create a commented template config file if none exists
        #[arg(long)]
        init: bool,
    },
    /// Display the records cited in the given text
    Show {
        /// Text containing reference IDs, or a path to a text file
        text: String,

        /// Sheet input (CSV file or directory; default: fetch cache)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    match cli.command {
        Commands::Fetch { url } => {
            commands::fetch::run_fetch(url).await?;
        }
        Commands::Format(args) => {
            commands::format::run_format(args)?;
        }
        Commands::CheckLabels { input, labels, html, required_columns } => {
            commands::check_labels::run_check_labels(input, labels, html, required_columns)?;
        }
        Commands::Match { ccv, input, types, json } => {
            commands::matching::run_match(&ccv, input, &types, json)?;
        }
        Commands::RewriteRefs { xml_src, xml_dest, input, sort } => {
            commands::rewrite::run_rewrite(&xml_src, &xml_dest, &input, sort)?;
        }
        Commands::Sync { ccv, output, input } => {
            commands::sync::run_sync(&ccv, &output, input)?;
        }
        Commands::MarkStudents { ccv, output, append_name } => {
            commands::mark_students::run_mark_students(&ccv, &output, append_name)?;
        }
        Commands::Config { init } => {
            if init {
                commands::config::init_config()?;
            } else {
                commands::config::show_config()?;
            }
        }
        Commands::Show { text, input } => {
            commands::show::run_show(&text, input)?;
        }
    }

    Ok(())
}
