//! JSON and CSV writers for token records
//!
//! Both writers render the whole file in memory and write it in one go. The
//! `raw` payload never reaches either file.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::token::Token;

/// Write `tokens` as a pretty-printed JSON array.
///
/// Non-ASCII text is written as-is (UTF-8). Returns the number of records.
pub fn write_json(tokens: &[Token], path: impl AsRef<Path>) -> Result<usize> {
    let path = path.as_ref();
    ensure_parent(path)?;

    let mut buffer = serde_json::to_vec_pretty(tokens).context("Failed to serialize tokens")?;
    buffer.push(b'\n');

    fs::write(path, &buffer)
        .with_context(|| format!("Failed to write JSON file {}", path.display()))?;

    debug!("Wrote JSON file with {} tokens to {}", tokens.len(), path.display());
    Ok(tokens.len())
}

/// Write `tokens` as CSV with a header row in [`Token::COLUMNS`] order.
///
/// An empty slice writes nothing and creates no file. Returns the number of
/// records.
pub fn write_csv(tokens: &[Token], path: impl AsRef<Path>) -> Result<usize> {
    let path = path.as_ref();

    if tokens.is_empty() {
        warn!("No tokens provided for CSV export, skipping file creation");
        return Ok(0);
    }

    ensure_parent(path)?;

    let mut writer = csv::Writer::from_writer(Vec::new());
    for token in tokens {
        writer
            .serialize(token)
            .context("Failed to serialize token to CSV")?;
    }
    let buffer = writer.into_inner().context("Failed to flush CSV buffer")?;

    fs::write(path, &buffer)
        .with_context(|| format!("Failed to write CSV file {}", path.display()))?;

    debug!("Wrote CSV file with {} tokens to {}", tokens.len(), path.display());
    Ok(tokens.len())
}

fn ensure_parent(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display())),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use tempfile::tempdir;

    fn tokens() -> Vec<Token> {
        vec![
            Token {
                token_name: Some("Moon Cat".to_string()),
                token_symbol: Some("MCAT".to_string()),
                price_usd: Some(0.000123),
                transaction_count: Some(8),
                pair_detail_url: Some("https://dexscreener.com/solana/abc".to_string()),
                lower_pool_address: Some("abc".to_string()),
                raw: json!({"secret": "debug only"}),
                ..Token::default()
            },
            Token {
                token_name: Some("Ñandú 🚀".to_string()),
                age: Some(12.75),
                liquidity_usd: Some(1500.5),
                ..Token::default()
            },
        ]
    }

    #[test]
    fn test_json_round_trip_without_raw() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out/tokens.json");
        let tokens = tokens();

        assert_eq!(write_json(&tokens, &path).unwrap(), 2);

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("Ñandú 🚀"), "non-ASCII must be kept literally");

        let parsed: Vec<Value> = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed.len(), 2);
        for object in &parsed {
            assert!(object.get("raw").is_none());
            assert_eq!(object.as_object().unwrap().len(), Token::COLUMNS.len());
        }
        assert_eq!(parsed[0]["transactionCount"], json!(8));
        assert_eq!(parsed[1]["transactionCount"], Value::Null);

        let back: Vec<Token> = serde_json::from_str(&text).unwrap();
        let expected: Vec<Token> = tokens
            .into_iter()
            .map(|t| Token { raw: Value::Null, ..t })
            .collect();
        assert_eq!(back, expected);
    }

    #[test]
    fn test_csv_header_and_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tokens.csv");

        assert_eq!(write_csv(&tokens(), &path).unwrap(), 2);

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(headers, Token::COLUMNS);

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "Moon Cat");
        assert_eq!(&rows[0][4], "8");
        assert_eq!(&rows[0][3], "");
        assert_eq!(&rows[1][0], "Ñandú 🚀");
        assert_eq!(&rows[1][3], "12.75");
    }

    #[test]
    fn test_csv_empty_creates_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tokens.csv");

        assert_eq!(write_csv(&[], &path).unwrap(), 0);
        assert!(!path.exists());
    }

    #[test]
    fn test_json_empty_is_empty_array() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tokens.json");

        write_json(&[], &path).unwrap();
        let parsed: Vec<Value> = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_write_failure_is_reported() {
        let dir = tempdir().unwrap();
        // The target path is an existing directory
        assert!(write_json(&tokens(), dir.path()).is_err());
    }
}
