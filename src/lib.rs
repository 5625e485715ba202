//! DexScreener Tokens Scraper
//!
//! Fetches pair snapshots from the public DexScreener search API, normalizes
//! the loosely shaped payloads into flat [`Token`] records and exports them as
//! JSON and CSV.
//!
//! # Example
//! ```no_run
//! use dexscreener_tokens::{export, Settings, Scraper, Target};
//!
//! fn main() -> anyhow::Result<()> {
//!     let scraper = Scraper::new(Settings::default())?;
//!     let targets = vec![Target { query: Some("solana/moonshot".into()), max_pages: None }];
//!     let tokens = scraper.collect(&targets, None);
//!     export::write_json(&tokens, "data/tokens.json")?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod derive;
pub mod error;
pub mod events;
pub mod export;
pub mod launchpad;
pub mod payload;
pub mod scraper;
pub mod token;

pub use client::DexScreenerClient;
pub use config::{Settings, Target};
pub use error::{DexScreenerError, NormalizeError};
pub use events::{Event, EventSink, TracingSink};
pub use launchpad::Launchpad;
pub use scraper::{RunOptions, RunOutcome, Scraper};
pub use token::{Normalizer, Token};
