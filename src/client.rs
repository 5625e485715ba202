//! DexScreener API client
//!
//! Blocking HTTP client for the public `/latest/dex/search` endpoint, which
//! accepts queries such as `solana/moonshot` or a token / pair address.
//!
//! # Example
//! ```no_run
//! use std::time::Duration;
//! use dexscreener_tokens::DexScreenerClient;
//!
//! fn main() -> anyhow::Result<()> {
//!     let client = DexScreenerClient::new("https://api.dexscreener.com/latest/dex", Duration::from_secs(10))?;
//!     let tokens = client.fetch_tokens_for_query("solana/moonshot", 1, 50)?;
//!     println!("Fetched {} tokens", tokens.len());
//!     Ok(())
//! }
//! ```

use reqwest::blocking::Client;
use serde_json::Value;
use std::time::Duration;

use crate::config::DexScreenerSettings;
use crate::error::{ClientResult, DexScreenerError};
use crate::events::{Event, EventSink, TracingSink};
use crate::token::{Normalizer, Token};

/// Default base URL for the DexScreener API
pub const DEFAULT_BASE_URL: &str = "https://api.dexscreener.com/latest/dex";

/// Default request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

pub struct DexScreenerClient {
    http: Client,
    base_url: String,
    normalizer: Normalizer,
    sink: Box<dyn EventSink + Send + Sync>,
}

impl std::fmt::Debug for DexScreenerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DexScreenerClient")
            .field("base_url", &self.base_url)
            .field("normalizer", &self.normalizer)
            .finish_non_exhaustive()
    }
}

impl DexScreenerClient {
    /// Create a client for `base_url` with a per-request timeout
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ClientResult<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(DexScreenerClient {
            http,
            base_url,
            normalizer: Normalizer::default(),
            sink: Box::new(TracingSink),
        })
    }

    /// Build from the `dexscreener` section of the settings file
    pub fn from_settings(settings: &DexScreenerSettings) -> ClientResult<Self> {
        Ok(Self::new(&settings.base_url, Duration::from_secs(settings.timeout_seconds))?
            .with_normalizer(Normalizer::new(&settings.site_url)))
    }

    pub fn with_normalizer(mut self, normalizer: Normalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    /// Route diagnostics somewhere other than `tracing`
    pub fn with_sink(mut self, sink: impl EventSink + Send + Sync + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, path: &str, query: &str) -> ClientResult<Value> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        self.sink.emit(Event::Request { url: &url, query });

        let result = self.get_json(&url, query);
        if let Err(error) = &result {
            self.sink.emit(Event::RequestFailed {
                url: &url,
                query,
                error,
            });
        }
        result
    }

    fn get_json(&self, url: &str, query: &str) -> ClientResult<Value> {
        let response = self.http.get(url).query(&[("q", query)]).send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(DexScreenerError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text()?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Raw pair payloads for a search query.
    ///
    /// The endpoint answers `{"schemaVersion": "1.0", "pairs": [...]}`; a
    /// missing or non-array `pairs` is treated as no results.
    pub fn search_pairs(&self, query: &str) -> ClientResult<Vec<Value>> {
        let mut envelope = self.request("search", query)?;

        let pairs = match envelope.get_mut("pairs").map(Value::take) {
            Some(Value::Array(pairs)) => pairs,
            _ => Vec::new(),
        };

        self.sink.emit(Event::SearchReturned {
            query,
            pairs: pairs.len(),
        });
        Ok(pairs)
    }

    /// Search and normalize, keeping at most `max_pages * page_size` pairs.
    ///
    /// The search endpoint is not paginated; the page settings only cap the
    /// result size. `max_pages` below 1 counts as 1 and a zero `page_size`
    /// disables the cap. Pairs that fail to normalize are dropped.
    pub fn fetch_tokens_for_query(
        &self,
        query: &str,
        max_pages: u32,
        page_size: u32,
    ) -> ClientResult<Vec<Token>> {
        let max_pages = max_pages.max(1);
        let mut pairs = self.search_pairs(query)?;

        let max_items = (max_pages as usize).saturating_mul(page_size as usize);
        if max_items > 0 && pairs.len() > max_items {
            self.sink.emit(Event::Truncated {
                from: pairs.len(),
                to: max_items,
                max_pages,
                page_size,
            });
            pairs.truncate(max_items);
        }

        let tokens: Vec<Token> = pairs
            .iter()
            .enumerate()
            .filter_map(|(index, pair)| match self.normalizer.normalize(pair) {
                Ok(token) => Some(token),
                Err(error) => {
                    self.sink.emit(Event::PairSkipped {
                        index,
                        error: &error,
                    });
                    None
                }
            })
            .collect();

        self.sink.emit(Event::Converted {
            query,
            tokens: tokens.len(),
        });
        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client =
            DexScreenerClient::new("https://api.dexscreener.com/latest/dex/", Duration::from_secs(5))
                .unwrap();
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_from_settings_uses_site_url() {
        let settings = DexScreenerSettings {
            site_url: "https://example.org/".to_string(),
            ..DexScreenerSettings::default()
        };
        let client = DexScreenerClient::from_settings(&settings).unwrap();
        assert_eq!(client.normalizer.site_url(), "https://example.org");
    }

    #[test]
    fn test_unreachable_host_is_network_error() {
        // Port 9 (discard) on localhost is closed on CI machines
        let client = DexScreenerClient::new("http://127.0.0.1:9", Duration::from_secs(2))
            .unwrap()
            .with_sink(crate::events::NullSink);
        let err = client.search_pairs("solana").unwrap_err();
        assert!(matches!(err, DexScreenerError::Network(_)));
    }

    /// Counts failure events only
    #[derive(Clone, Default)]
    struct FailureCounter(std::sync::Arc<std::sync::atomic::AtomicUsize>);

    impl EventSink for FailureCounter {
        fn emit(&self, event: Event<'_>) {
            if let Event::RequestFailed { error, .. } = event {
                assert!(matches!(error, DexScreenerError::Network(_)));
                self.0.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            }
        }
    }

    #[test]
    fn test_request_failure_goes_through_sink() {
        let counter = FailureCounter::default();
        let client = DexScreenerClient::new("http://127.0.0.1:9", Duration::from_secs(2))
            .unwrap()
            .with_sink(counter.clone());

        assert!(client.fetch_tokens_for_query("solana", 1, 50).is_err());
        assert_eq!(counter.0.load(std::sync::atomic::Ordering::SeqCst), 1);
    }
}
