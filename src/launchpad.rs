//! Launchpad metrics for early-stage tokens
//!
//! Generic model for fundraising state reported by launchpad platforms
//! (Moonit, Pump.fun, ...). Payload shapes differ between platforms, so each
//! value is read from a short list of known key aliases.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::derive::{launchpad_timestamp, round2};
use crate::payload::{non_empty_str, to_float};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Launchpad {
    pub platform: Option<String>,
    pub status: Option<String>,
    pub soft_cap_usd: Option<f64>,
    pub hard_cap_usd: Option<f64>,
    pub raised_usd: Option<f64>,
    pub progress_percent: Option<f64>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,

    #[serde(skip)]
    pub raw: Value,
}

impl Launchpad {
    /// Build from a platform payload.
    ///
    /// `platform` overrides any `platform` key in the payload. When the
    /// payload has no progress figure it is derived from raised / hard cap.
    pub fn from_payload(payload: &Value, platform: Option<&str>) -> Self {
        let float = |keys: &[&str]| first_of(payload, keys).and_then(to_float);

        let hard_cap_usd = float(&["hardCapUsd", "hardCap"][..]);
        let raised_usd = float(&["raisedUsd", "raised"][..]);
        let progress_percent = float(&["progressPercent", "progress"][..]).or_else(|| {
            let (raised, cap) = (raised_usd?, hard_cap_usd.filter(|cap| *cap > 0.0)?);
            Some(round2(raised / cap * 100.0))
        });

        Launchpad {
            platform: platform
                .map(str::to_owned)
                .or_else(|| payload.get("platform").and_then(non_empty_str).map(str::to_owned)),
            status: payload.get("status").and_then(non_empty_str).map(str::to_owned),
            soft_cap_usd: float(&["softCapUsd", "softCap"][..]),
            hard_cap_usd,
            raised_usd,
            progress_percent,
            start_time: first_of(payload, &["startTime", "start"]).and_then(launchpad_timestamp),
            end_time: first_of(payload, &["endTime", "end"]).and_then(launchpad_timestamp),
            raw: payload.clone(),
        }
    }
}

/// Value of the first alias present in the payload
fn first_of<'a>(payload: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| payload.get(*key))
}
