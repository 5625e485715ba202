//! Values computed from a pair payload rather than read from it directly

use chrono::{DateTime, Utc};
use serde_json::Value;
use url::{ParseError, Url};

use crate::payload::{get_nested, non_empty_str, to_float};

/// Timestamps above this are taken as milliseconds, anything else as seconds
pub const MILLIS_THRESHOLD: f64 = 10_000_000_000.0;

const MS_PER_HOUR: f64 = 3_600_000.0;

/// Extract the pool address from a pair detail URL, lowercased.
///
/// `https://dexscreener.com/solana/ABC123` -> `abc123`. A path without a
/// scheme (`solana/ABC123`) is accepted too. The segment is taken from the
/// path as written: no percent-decoding, no dot-segment resolution. Returns
/// `None` for empty input, unparseable URLs and URLs with no path segments.
pub fn lower_pool_address(pair_detail_url: Option<&str>) -> Option<String> {
    let raw = pair_detail_url.filter(|s| !s.trim().is_empty())?;

    // Parsing only validates; `Url` normalizes its path so it is not read back
    match Url::parse(raw) {
        Ok(_) => {}
        Err(ParseError::RelativeUrlWithoutBase) => {
            Url::parse("http://localhost/").ok()?.join(raw).ok()?;
        }
        Err(_) => return None,
    }

    raw_path(raw)
        .split('/')
        .filter(|segment| !segment.is_empty())
        .last()
        .map(str::to_lowercase)
}

/// Path component of a URL string, before query and fragment
fn raw_path(url: &str) -> &str {
    let end = url.find(|c| c == '?' || c == '#').unwrap_or(url.len());
    let rest = &url[..end];

    let rest = match rest.split_once(':') {
        Some((scheme, tail)) if is_scheme(scheme) => tail,
        _ => rest,
    };

    match rest.strip_prefix("//") {
        Some(authority) => authority.find('/').map_or("", |i| &authority[i..]),
        None => rest,
    }
}

fn is_scheme(candidate: &str) -> bool {
    let mut chars = candidate.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Hours between `created_ms` (epoch milliseconds) and `now`, rounded to 2 places.
///
/// Accepts a number or a numeric string. Missing, zero, unparseable and
/// out-of-range timestamps yield `None`.
pub fn age_hours(created_ms: &Value, now: DateTime<Utc>) -> Option<f64> {
    let millis = to_float(created_ms).filter(|ms| *ms != 0.0)?;
    let created = DateTime::<Utc>::from_timestamp_micros((millis * 1000.0).round() as i64)?;

    let hours = (now - created).num_milliseconds() as f64 / MS_PER_HOUR;
    Some(round2(hours))
}

/// [`age_hours`] against the wall clock
pub fn age_hours_now(created_ms: &Value) -> Option<f64> {
    age_hours(created_ms, Utc::now())
}

/// Logo URL for a pair: `info.imageUrl`, then `baseToken.imageUrl`
pub fn token_image_url(pair: &Value) -> Option<String> {
    [&["info", "imageUrl"][..], &["baseToken", "imageUrl"][..]]
        .iter()
        .find_map(|path| get_nested(pair, path).and_then(non_empty_str))
        .map(str::to_owned)
}

/// Launchpad timestamps come as either seconds or milliseconds since epoch
pub fn launchpad_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    let ts = to_float(value)?;
    let micros = if ts.abs() > MILLIS_THRESHOLD {
        ts * 1_000.0
    } else {
        ts * 1_000_000.0
    };

    DateTime::<Utc>::from_timestamp_micros(micros.round() as i64)
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use chrono::{Duration, TimeZone};
    use serde_json::json;

    #[test]
    fn test_lower_pool_address() {
        assert_eq!(
            lower_pool_address(Some("https://dexscreener.com/solana/ABC123")),
            Some("abc123".to_string())
        );
        assert_eq!(
            lower_pool_address(Some("https://dexscreener.com/solana/29jupdw7/")),
            Some("29jupdw7".to_string())
        );
        assert_eq!(
            lower_pool_address(Some("solana/PoolXYZ")),
            Some("poolxyz".to_string())
        );
    }

    #[test]
    fn test_lower_pool_address_is_stable_on_lowercase() {
        let once = lower_pool_address(Some("https://dexscreener.com/bsc/0xabcdef")).unwrap();
        assert_eq!(once, "0xabcdef");
        let again = lower_pool_address(Some(&format!("https://dexscreener.com/bsc/{}", once)));
        assert_eq!(again.as_deref(), Some("0xabcdef"));
    }

    #[test]
    fn test_lower_pool_address_degrades_to_none() {
        assert_eq!(lower_pool_address(None), None);
        assert_eq!(lower_pool_address(Some("")), None);
        assert_eq!(lower_pool_address(Some("https://dexscreener.com")), None);
        assert_eq!(lower_pool_address(Some("https://dexscreener.com/")), None);
        assert_eq!(lower_pool_address(Some("http://[::1")), None);
    }

    #[test]
    fn test_lower_pool_address_uses_path_as_written() {
        assert_eq!(
            lower_pool_address(Some("https://dexscreener.com/solana/ABC/..")).as_deref(),
            Some("..")
        );
        assert_eq!(
            lower_pool_address(Some("https://dexscreener.com/solana/Ñandú")).as_deref(),
            Some("ñandú")
        );
        assert_eq!(
            lower_pool_address(Some("https://dexscreener.com/solana/Pool X")).as_deref(),
            Some("pool x")
        );
        assert_eq!(
            lower_pool_address(Some("https://dexscreener.com/solana/ABC%20D")).as_deref(),
            Some("abc%20d")
        );
        assert_eq!(lower_pool_address(Some("solana:ABC")).as_deref(), Some("abc"));
        assert_eq!(
            lower_pool_address(Some("https://dexscreener.com/solana/ABC?ref=x#top")).as_deref(),
            Some("abc")
        );
    }

    #[test]
    fn test_age_hours_with_fixed_clock() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let created = (now - Duration::minutes(90)).timestamp_millis();

        assert_eq!(age_hours(&json!(created), now), Some(1.5));
        assert_eq!(age_hours(&json!(created.to_string()), now), Some(1.5));

        let odd = (now - Duration::seconds(1000)).timestamp_millis();
        assert_eq!(age_hours(&json!(odd), now), Some(0.28));
    }

    #[test]
    fn test_age_hours_against_wall_clock() {
        let one_hour_ago = Utc::now().timestamp_millis() - 3_600_000;
        let age = age_hours_now(&json!(one_hour_ago)).unwrap();
        assert_abs_diff_eq!(age, 1.0, epsilon = 0.01);
    }

    #[test]
    fn test_age_hours_missing_or_zero() {
        let now = Utc::now();
        assert_eq!(age_hours(&Value::Null, now), None);
        assert_eq!(age_hours(&json!(0), now), None);
        assert_eq!(age_hours(&json!("0"), now), None);
        assert_eq!(age_hours(&json!("yesterday"), now), None);
        assert_eq!(age_hours(&json!(1e30), now), None);
    }

    #[test]
    fn test_token_image_url_fallbacks() {
        let both = json!({
            "info": {"imageUrl": "https://cdn/info.png"},
            "baseToken": {"imageUrl": "https://cdn/base.png"}
        });
        assert_eq!(token_image_url(&both).as_deref(), Some("https://cdn/info.png"));

        let base_only = json!({
            "info": {"imageUrl": ""},
            "baseToken": {"imageUrl": "https://cdn/base.png"}
        });
        assert_eq!(token_image_url(&base_only).as_deref(), Some("https://cdn/base.png"));

        assert_eq!(token_image_url(&json!({"info": null})), None);
        assert_eq!(token_image_url(&json!({})), None);
    }

    #[test]
    fn test_launchpad_timestamp_units() {
        let expected = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let secs = expected.timestamp();

        assert_eq!(launchpad_timestamp(&json!(secs)), Some(expected));
        assert_eq!(launchpad_timestamp(&json!(secs * 1000)), Some(expected));
        assert_eq!(launchpad_timestamp(&json!(secs.to_string())), Some(expected));
        assert_eq!(launchpad_timestamp(&json!("soon")), None);
        assert_eq!(launchpad_timestamp(&Value::Null), None);
    }

    #[test]
    fn test_launchpad_timestamp_threshold_boundary() {
        // Exactly at the threshold is still seconds
        assert_eq!(
            launchpad_timestamp(&json!(10_000_000_000_i64)),
            DateTime::<Utc>::from_timestamp(10_000_000_000, 0)
        );
        assert_eq!(
            launchpad_timestamp(&json!(10_000_000_001_i64)),
            DateTime::<Utc>::from_timestamp_millis(10_000_000_001)
        );

        // Negative values compare by magnitude
        assert_eq!(
            launchpad_timestamp(&json!(-10_000_000_000_i64)),
            DateTime::<Utc>::from_timestamp(-10_000_000_000, 0)
        );
        assert_eq!(
            launchpad_timestamp(&json!(-10_000_000_001_i64)),
            DateTime::<Utc>::from_timestamp_millis(-10_000_000_001)
        );
    }
}
