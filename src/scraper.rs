//! Run orchestration: targets in, JSON + CSV out
//!
//! Targets run one at a time. A failing target is logged and skipped; a bad
//! input file or a failed export ends the run.

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::{error, info, warn};

use crate::client::DexScreenerClient;
use crate::config::{load_targets, OutputPaths, Settings, Target};
use crate::export::{write_csv, write_json};
use crate::token::Token;

/// Per-run inputs coming from the command line
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub input: PathBuf,
    /// Overrides `output.directory`
    pub output_dir: Option<PathBuf>,
    /// Overrides both the settings default and per-target `maxPages`
    pub max_pages: Option<u32>,
}

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Exported {
        tokens: usize,
        json: PathBuf,
        csv: PathBuf,
    },
    NothingToExport,
    InputFailed,
    ExportFailed,
}

impl RunOutcome {
    /// Process exit code: 0 on success or an empty run, 1 otherwise
    pub fn exit_code(&self) -> u8 {
        match self {
            RunOutcome::Exported { .. } | RunOutcome::NothingToExport => 0,
            RunOutcome::InputFailed | RunOutcome::ExportFailed => 1,
        }
    }
}

pub struct Scraper {
    settings: Settings,
    client: DexScreenerClient,
}

impl Scraper {
    /// Build a scraper with a client configured from `settings`
    pub fn new(settings: Settings) -> Result<Self> {
        let client = DexScreenerClient::from_settings(&settings.dexscreener)?;
        Ok(Self::with_client(settings, client))
    }

    pub fn with_client(settings: Settings, client: DexScreenerClient) -> Self {
        Scraper { settings, client }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// CLI override, then the target's own `maxPages`, then the settings default
    pub fn max_pages_for(&self, target: &Target, cli_override: Option<u32>) -> u32 {
        cli_override
            .filter(|pages| *pages > 0)
            .or(target.max_pages)
            .unwrap_or(self.settings.pagination.max_pages)
    }

    /// Fetch every target in order, skipping the ones that fail
    pub fn collect(&self, targets: &[Target], cli_max_pages: Option<u32>) -> Vec<Token> {
        let page_size = self.settings.pagination.page_size;
        let mut all_tokens = Vec::new();

        for (idx, target) in targets.iter().enumerate() {
            let Some(query) = target.query.as_deref().filter(|q| !q.is_empty()) else {
                warn!("Target #{} has no 'query' field, skipping: {:?}", idx + 1, target);
                continue;
            };

            let max_pages = self.max_pages_for(target, cli_max_pages);
            info!("Fetching tokens for query '{}' (max_pages={})", query, max_pages);

            match self.client.fetch_tokens_for_query(query, max_pages, page_size) {
                Ok(tokens) => {
                    info!("Retrieved {} tokens for query '{}'", tokens.len(), query);
                    all_tokens.extend(tokens);
                }
                Err(e) => {
                    error!("Failed to fetch tokens for query '{}': {}", query, e);
                }
            }
        }

        all_tokens
    }

    /// Full run: load targets, fetch, export
    pub fn run(&self, options: &RunOptions) -> RunOutcome {
        info!("Starting DexScreener tokens scraper");

        let targets = match load_targets(&options.input) {
            Ok(targets) => targets,
            Err(e) => {
                error!("Failed to load input targets: {:#}", e);
                return RunOutcome::InputFailed;
            }
        };

        let paths = match OutputPaths::resolve(&self.settings.output, options.output_dir.as_deref()) {
            Ok(paths) => paths,
            Err(e) => {
                error!("Failed to prepare output directory: {:#}", e);
                return RunOutcome::ExportFailed;
            }
        };

        let tokens = self.collect(&targets, options.max_pages);
        if tokens.is_empty() {
            warn!("No tokens were collected; nothing to export");
            return RunOutcome::NothingToExport;
        }

        match export(&tokens, &paths) {
            Ok(()) => {
                info!("Scraper completed successfully");
                RunOutcome::Exported {
                    tokens: tokens.len(),
                    json: paths.json,
                    csv: paths.csv,
                }
            }
            Err(e) => {
                error!("{:#}", e);
                RunOutcome::ExportFailed
            }
        }
    }
}

/// JSON first, then CSV; a CSV failure leaves the JSON file in place
fn export(tokens: &[Token], paths: &OutputPaths) -> Result<()> {
    let written = write_json(tokens, &paths.json).context("Failed to export JSON")?;
    info!("Exported {} tokens to JSON: {}", written, paths.json.display());

    let written = write_csv(tokens, &paths.csv).context("Failed to export CSV")?;
    info!("Exported {} tokens to CSV: {}", written, paths.csv.display());

    Ok(())
}
