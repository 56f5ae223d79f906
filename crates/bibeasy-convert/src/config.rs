use anyhow::{Context, Result};
use confyg::{env, Confygery};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for bibeasy.
///
/// Configuration is loaded from multiple sources with the following priority:
/// 1. CLI arguments (highest priority)
/// 2. Environment variables (BIB_* prefix)
/// 3. Config file (~/.config/bibeasy/config.toml)
/// 4. Built-in defaults (lowest priority)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// URL of the published Google Sheet holding the publication records.
    ///
    /// Can be set via:
    /// - ENV: BIB_SHEET_URL
    /// - Config: sheet_url = "https://docs.google.com/spreadsheets/d/..."
    pub sheet_url: Option<String>,

    /// Path to the authorized-labels file (one label per line).
    ///
    /// Can be set via:
    /// - CLI: --labels /path/to/labels.txt
    /// - ENV: BIB_LABELS_PATH
    /// - Config: labels_path = "/path/to/labels.txt"
    pub labels_path: Option<PathBuf>,

    /// Path to a student roster TOML file (students = [...]).
    /// When unset, the built-in roster is used.
    pub roster_path: Option<PathBuf>,

    /// Directory where fetched sheet tabs are cached as CSV.
    ///
    /// Default: ~/.cache/bibeasy (or platform equivalent)
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sheet_url: None,
            labels_path: None,
            roster_path: None,
            cache_dir: default_cache_dir(),
        }
    }
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Searches for config file at: ~/.config/bibeasy/config.toml
    /// Reads environment variables with BIB_ prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self> {
        let config_path = config_file_path();

        let mut builder = Confygery::new().context("Failed to create config builder")?;

        if config_path.exists() {
            let path_str = config_path
                .to_str()
                .ok_or_else(|| anyhow::anyhow!("Config path contains invalid UTF-8"))?;
            builder
                .add_file(path_str)
                .context("Failed to load config file")?;
        }

        let env_opts = env::Options::with_top_level("bib");
        builder
            .add_env(env_opts)
            .context("Failed to load environment variables")?;

        let config: Self = builder.build().context("Failed to build configuration")?;

        Ok(config)
    }

    /// Load configuration with the sheet URL overridden from the CLI.
    pub fn load_with_sheet_url(sheet_url: Option<String>) -> Result<Self> {
        let mut config = Self::load()?;
        if sheet_url.is_some() {
            config.sheet_url = sheet_url;
        }
        Ok(config)
    }
}

/// Get the default cache directory for fetched sheet tabs.
fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("bibeasy")
}

/// Get the config file path.
///
/// Returns:
/// - Linux: ~/.config/bibeasy/config.toml
/// - macOS: ~/Library/Application Support/bibeasy/config.toml
/// - Windows: %APPDATA%\bibeasy\config.toml
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("bibeasy")
        .join("config.toml")
}

/// Get the example config file content.
pub fn example_config() -> &'static str {
    r#"# Bibeasy Configuration File
#
# Configuration is loaded from multiple sources with the following priority:
# 1. CLI arguments (highest priority)
# 2. Environment variables (BIB_* prefix)
# 3. This config file
# 4. Built-in defaults (lowest priority)

# URL of the published Google Sheet holding the publication records.
# The sheet must be public; one tab per publication type
# (article, proceedings, talk, bookchapter).
#
# Can also be set via:
# - Environment: BIB_SHEET_URL=https://docs.google.com/spreadsheets/d/...
#sheet_url = "https://docs.google.com/spreadsheets/d/..."

# Authorized publication labels, one per line.
# The canonical list lives on the lab website; keep a local copy here.
#labels_path = "/path/to/labels.txt"

# Student roster for trainee highlighting (students = ["Doe A", ...]).
# When unset, the built-in roster is used.
#roster_path = "/path/to/roster.toml"

# Where fetched sheet tabs are cached as CSV.
# Default: platform cache directory
#cache_dir = "/path/to/cache"
"#
}

/// Create default config file if it doesn't exist.
///
/// Returns true if a new file was created, false if it already existed.
pub fn ensure_config_file() -> Result<bool> {
    let config_path = config_file_path();

    if config_path.exists() {
        return Ok(false);
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    std::fs::write(&config_path, example_config()).context("Failed to write config file")?;

    Ok(true)
}
