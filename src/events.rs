//! Structured diagnostics emitted while fetching and normalizing pairs
//!
//! The client reports what it does through an [`EventSink`] instead of
//! logging directly, so runs can be observed (or silenced) without touching
//! the fetch logic. [`TracingSink`] is what the binary uses.

use tracing::{debug, error, info};

use crate::error::{DexScreenerError, NormalizeError};

#[derive(Debug, Clone)]
pub enum Event<'a> {
    /// About to issue a GET
    Request { url: &'a str, query: &'a str },
    /// The request failed at the network, HTTP status or JSON stage
    RequestFailed {
        url: &'a str,
        query: &'a str,
        error: &'a DexScreenerError,
    },
    /// Search endpoint answered with `pairs` entries
    SearchReturned { query: &'a str, pairs: usize },
    /// Pair list capped to `max_pages * page_size`
    Truncated {
        from: usize,
        to: usize,
        max_pages: u32,
        page_size: u32,
    },
    /// A pair could not be normalized and was dropped
    PairSkipped {
        index: usize,
        error: &'a NormalizeError,
    },
    /// Pairs turned into token records for a query
    Converted { query: &'a str, tokens: usize },
}

pub trait EventSink {
    fn emit(&self, event: Event<'_>);
}

/// Forwards events to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: Event<'_>) {
        match event {
            Event::Request { url, query } => {
                debug!("Requesting {} with q={}", url, query);
            }
            Event::RequestFailed { url, query, error } => {
                error!("Request to {} with q={} failed: {}", url, query, error);
            }
            Event::SearchReturned { query, pairs } => {
                debug!("DexScreener search returned {} pairs for query '{}'", pairs, query);
            }
            Event::Truncated {
                from,
                to,
                max_pages,
                page_size,
            } => {
                debug!(
                    "Truncating pairs from {} to {} (max_pages={}, page_size={})",
                    from, to, max_pages, page_size
                );
            }
            Event::PairSkipped { index, error } => {
                debug!("Failed to parse pair #{} into a token, skipping: {}", index, error);
            }
            Event::Converted { query, tokens } => {
                info!("Converted {} pairs into tokens for query '{}'", tokens, query);
            }
        }
    }
}

/// Discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: Event<'_>) {}
}
