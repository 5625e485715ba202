//! Token records and the pair-payload normalizer
//!
//! A [`Token`] is the flat, export-ready view of one DexScreener pair. Every
//! field is optional: the normalizer fills what it can derive from the payload
//! and leaves the rest empty instead of failing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::derive::{age_hours, lower_pool_address, token_image_url};
use crate::error::NormalizeError;
use crate::payload::{get_nested, is_truthy, non_empty_str, to_float, to_int, truthy_or};

/// Public site used to build pair URLs when the payload has none
pub const DEFAULT_SITE_URL: &str = "https://dexscreener.com";

/// Normalized snapshot of a single trading pair
///
/// Serializes with camelCase keys in declaration order. `raw` is kept for
/// debugging and never serialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub token_name: Option<String>,
    pub token_symbol: Option<String>,
    pub price_usd: Option<f64>,
    /// Hours since the pair was created
    pub age: Option<f64>,
    /// 24h buys + sells
    pub transaction_count: Option<i64>,
    pub volume_usd: Option<f64>,
    pub maker_count: Option<i64>,
    pub price_change_5m: Option<f64>,
    pub price_change_1h: Option<f64>,
    pub price_change_6h: Option<f64>,
    pub price_change_24h: Option<f64>,
    pub liquidity_usd: Option<f64>,
    pub market_cap_usd: Option<f64>,
    pub boost: Option<f64>,
    pub pair_detail_url: Option<String>,
    pub address: Option<String>,
    pub lower_pool_address: Option<String>,
    pub token_image_url: Option<String>,

    #[serde(skip)]
    pub raw: Value,
}

impl Token {
    /// Exported column names, in output order
    pub const COLUMNS: [&'static str; 18] = [
        "tokenName",
        "tokenSymbol",
        "priceUsd",
        "age",
        "transactionCount",
        "volumeUsd",
        "makerCount",
        "priceChange5m",
        "priceChange1h",
        "priceChange6h",
        "priceChange24h",
        "liquidityUsd",
        "marketCapUsd",
        "boost",
        "pairDetailUrl",
        "address",
        "lowerPoolAddress",
        "tokenImageUrl",
    ];
}

/// Builds [`Token`]s from raw pair payloads
#[derive(Debug, Clone)]
pub struct Normalizer {
    site_url: String,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(DEFAULT_SITE_URL)
    }
}

impl Normalizer {
    pub fn new(site_url: impl Into<String>) -> Self {
        let site_url = site_url.into().trim_end_matches('/').to_string();
        Normalizer { site_url }
    }

    pub fn site_url(&self) -> &str {
        &self.site_url
    }

    /// Normalize against the wall clock
    pub fn normalize(&self, pair: &Value) -> Result<Token, NormalizeError> {
        self.normalize_at(pair, Utc::now())
    }

    /// Normalize with `now` as the reference time for `age`.
    ///
    /// Only fails when the payload is not an object, or when `baseToken` is
    /// present but not an object.
    pub fn normalize_at(&self, pair: &Value, now: DateTime<Utc>) -> Result<Token, NormalizeError> {
        let fields = pair.as_object().ok_or(NormalizeError::NotAnObject)?;

        let base_token = match fields.get("baseToken") {
            Some(v) if is_truthy(v) => Some(
                v.as_object()
                    .ok_or(NormalizeError::MalformedField("baseToken"))?,
            ),
            _ => None,
        };
        let base_str = |key: &str| {
            base_token
                .and_then(|b| b.get(key))
                .and_then(Value::as_str)
                .map(str::to_owned)
        };

        let pair_detail_url = self.pair_detail_url(pair);
        let lower_pool_address = lower_pool_address(pair_detail_url.as_deref());

        Ok(Token {
            token_name: base_str("name"),
            token_symbol: base_str("symbol"),
            price_usd: float_at(pair, &["priceUsd"]),
            age: fields
                .get("pairCreatedAt")
                .filter(|v| is_truthy(v))
                .and_then(|created| age_hours(created, now)),
            transaction_count: transaction_count(pair),
            volume_usd: float_at(pair, &["volume", "h24"]),
            maker_count: truthy_or(get_nested(pair, &["makers", "h24"]), fields.get("makerCount"))
                .and_then(to_int),
            price_change_5m: float_at(pair, &["priceChange", "m5"]),
            price_change_1h: float_at(pair, &["priceChange", "h1"]),
            price_change_6h: float_at(pair, &["priceChange", "h6"]),
            price_change_24h: float_at(pair, &["priceChange", "h24"]),
            liquidity_usd: float_at(pair, &["liquidity", "usd"]),
            market_cap_usd: float_at(pair, &["fdv"]),
            boost: truthy_or(fields.get("boostScore"), fields.get("boost")).and_then(to_float),
            pair_detail_url,
            address: base_str("address"),
            lower_pool_address,
            token_image_url: token_image_url(pair),
            raw: pair.clone(),
        })
    }

    /// Explicit `url`, else `<site>/<chainId>/<pairAddress>` when both are present
    fn pair_detail_url(&self, pair: &Value) -> Option<String> {
        if let Some(url) = pair.get("url").and_then(non_empty_str) {
            return Some(url.to_string());
        }

        let chain_id = pair.get("chainId").and_then(non_empty_str)?;
        let pair_address = pair.get("pairAddress").and_then(non_empty_str)?;
        Some(format!("{}/{}/{}", self.site_url, chain_id, pair_address))
    }
}

fn float_at(pair: &Value, keys: &[&str]) -> Option<f64> {
    get_nested(pair, keys).and_then(to_float)
}

/// 24h buys + sells.
///
/// `None` only when neither side coerces to an integer; a side that is
/// missing counts as zero once the other side is known, so a real zero total
/// is kept.
fn transaction_count(pair: &Value) -> Option<i64> {
    let side = |key: &str| get_nested(pair, &["txns", "h24", key]).and_then(to_int);

    match (side("buys"), side("sells")) {
        (None, None) => None,
        (buys, sells) => Some(buys.unwrap_or(0).saturating_add(sells.unwrap_or(0))),
    }
}
