//! Scrape command implementation

use anyhow::Result;
use dexscreener_tokens::{RunOptions, RunOutcome, Scraper, Settings};
use std::path::PathBuf;
use tracing::{debug, info};

pub fn run(
    settings_path: PathBuf,
    input: PathBuf,
    output_dir: Option<PathBuf>,
    max_pages: Option<u32>,
) -> Result<RunOutcome> {
    // Load configuration
    let settings = Settings::load(&settings_path)?.with_env_overrides();
    info!("Loaded settings from: {}", settings_path.display());
    debug!("Settings: {:?}", settings);

    if let Some(pages) = max_pages {
        info!("Overriding max pages to: {}", pages);
    }

    let scraper = Scraper::new(settings)?;
    let options = RunOptions {
        input,
        output_dir,
        max_pages,
    };

    let outcome = scraper.run(&options);

    if let RunOutcome::Exported { tokens, json, csv } = &outcome {
        println!("\n{}", "=".repeat(60));
        println!("SCRAPE RESULTS");
        println!("{}", "=".repeat(60));
        println!("Tokens exported:    {}", tokens);
        println!("JSON:               {}", json.display());
        println!("CSV:                {}", csv.display());
        println!("{}", "=".repeat(60));
    }

    Ok(outcome)
}
