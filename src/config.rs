//! Configuration management
//!
//! Handles loading the JSON settings file (falling back to built-in defaults
//! when it is missing), environment overrides for the API endpoint, and the
//! input targets file.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::client::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use crate::token::DEFAULT_SITE_URL;

/// Settings file read when `--settings` is not given; ships with the repo
pub const DEFAULT_SETTINGS_PATH: &str = "config/settings.example.json";

/// Main settings structure
///
/// Every key is optional in the file; anything missing takes its default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub dexscreener: DexScreenerSettings,
    pub pagination: PaginationSettings,
    pub output: OutputSettings,
}

impl Settings {
    /// Load settings from a JSON file, or defaults if the file does not exist
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            warn!(
                "Settings file {} not found, using built-in defaults",
                path.display()
            );
            return Ok(Settings::default());
        }

        Self::from_file(path)
    }

    /// Load settings from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref()).context("Failed to read settings file")?;
        serde_json::from_str(&contents).context("Failed to parse settings JSON")
    }

    /// Apply `DEXSCREENER_BASE_URL` / `DEXSCREENER_TIMEOUT_SECONDS` if set
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(base_url) = std::env::var("DEXSCREENER_BASE_URL") {
            self.dexscreener.base_url = base_url;
        }
        if let Ok(timeout) = std::env::var("DEXSCREENER_TIMEOUT_SECONDS") {
            match timeout.parse() {
                Ok(secs) => self.dexscreener.timeout_seconds = secs,
                Err(_) => warn!("Ignoring invalid DEXSCREENER_TIMEOUT_SECONDS={}", timeout),
            }
        }
        self
    }
}

/// Upstream API configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DexScreenerSettings {
    pub base_url: String,
    /// Public site used when a pair payload has no `url`
    pub site_url: String,
    pub timeout_seconds: u64,
}

impl Default for DexScreenerSettings {
    fn default() -> Self {
        DexScreenerSettings {
            base_url: DEFAULT_BASE_URL.to_string(),
            site_url: DEFAULT_SITE_URL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Result-size cap per target (`max_pages * page_size`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PaginationSettings {
    pub max_pages: u32,
    pub page_size: u32,
}

impl Default for PaginationSettings {
    fn default() -> Self {
        PaginationSettings {
            max_pages: 1,
            page_size: 50,
        }
    }
}

/// Output file locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OutputSettings {
    pub directory: String,
    pub json_filename: String,
    pub csv_filename: String,
}

impl Default for OutputSettings {
    fn default() -> Self {
        OutputSettings {
            directory: "data".to_string(),
            json_filename: "tokens.json".to_string(),
            csv_filename: "tokens.csv".to_string(),
        }
    }
}

/// Resolved export destinations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub json: PathBuf,
    pub csv: PathBuf,
}

impl OutputPaths {
    /// Join the configured filenames onto the output directory and create it.
    ///
    /// `override_dir` (from the CLI) wins over `output.directory`.
    pub fn resolve(settings: &OutputSettings, override_dir: Option<&Path>) -> Result<Self> {
        let directory = override_dir
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(&settings.directory));

        fs::create_dir_all(&directory).with_context(|| {
            format!("Failed to create output directory {}", directory.display())
        })?;

        Ok(OutputPaths {
            json: directory.join(&settings.json_filename),
            csv: directory.join(&settings.csv_filename),
        })
    }
}

/// One search to run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Target {
    #[serde(default)]
    pub query: Option<String>,
    /// Overrides `pagination.maxPages` for this target
    #[serde(default)]
    pub max_pages: Option<u32>,
}

/// Load scrape targets: either a single target object or an array of them
pub fn load_targets(path: impl AsRef<Path>) -> Result<Vec<Target>> {
    let path = path.as_ref();
    if !path.exists() {
        bail!("Input targets file not found: {}", path.display());
    }

    let contents = fs::read_to_string(path).context("Failed to read input targets file")?;
    let document: Value =
        serde_json::from_str(&contents).context("Failed to parse input targets JSON")?;

    let entries = match document {
        Value::Object(_) => vec![document],
        Value::Array(items) => items,
        _ => bail!("Input file must contain a list of targets or a single target object"),
    };

    entries
        .into_iter()
        .enumerate()
        .map(|(idx, entry)| {
            serde_json::from_value(entry).with_context(|| format!("Invalid target #{}", idx + 1))
        })
        .collect()
}
