//! Error types for the upstream client and the record normalizer

use thiserror::Error;

/// Failures talking to the DexScreener API
///
/// Every variant is non-fatal for a run: the caller logs it and moves on to
/// the next target.
#[derive(Debug, Error)]
pub enum DexScreenerError {
    #[error("network error while contacting DexScreener: {0}")]
    Network(#[from] reqwest::Error),

    #[error("DexScreener error: HTTP {status} - {body}")]
    Status { status: u16, body: String },

    #[error("invalid JSON from DexScreener: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// A single pair payload that could not be turned into a token record
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("pair payload is not a JSON object")]
    NotAnObject,

    #[error("field '{0}' has an unexpected shape")]
    MalformedField(&'static str),
}

pub type ClientResult<T> = Result<T, DexScreenerError>;
