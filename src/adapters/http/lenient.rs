//! Lenient numeric fields
//!
//! Providers send the same field as a JSON number on one endpoint and a
//! decimal string on another, and sometimes `null`. These helpers accept
//! all three; anything unparseable becomes `None`.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

/// `Option<f64>` from number, numeric string, or null
pub fn opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<NumberOrString>::deserialize(deserializer)?;
    Ok(match raw {
        Some(NumberOrString::Number(n)) => Some(n),
        Some(NumberOrString::Text(s)) => s.trim().parse::<f64>().ok(),
        Some(NumberOrString::Other(_)) | None => None,
    }
    .filter(|n| n.is_finite()))
}

/// `Option<i64>` from integer, numeric string, or null
pub fn opt_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(opt_f64(deserializer)?.map(|n| n as i64))
}
