//! Platform crowd-density records from the `PCDRealTime` feed.

use anyhow::{Result, anyhow};
use chrono::{DateTime, FixedOffset, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Categorical crowd level as reported by DataMall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrowdLevel {
    #[serde(rename = "l")]
    Low,
    #[serde(rename = "m")]
    Medium,
    #[serde(rename = "h")]
    High,
}

impl CrowdLevel {
    /// Heatmap intensity for this level.
    pub fn weight(self) -> f64 {
        match self {
            CrowdLevel::Low => 0.1,
            CrowdLevel::Medium => 0.5,
            CrowdLevel::High => 1.0,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            CrowdLevel::Low => "l",
            CrowdLevel::Medium => "m",
            CrowdLevel::High => "h",
        }
    }
}

impl FromStr for CrowdLevel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "l" => Ok(CrowdLevel::Low),
            "m" => Ok(CrowdLevel::Medium),
            "h" => Ok(CrowdLevel::High),
            other => Err(anyhow!("unknown crowd level '{other}'")),
        }
    }
}

impl fmt::Display for CrowdLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Maps `"NA"`, empty strings and anything unrecognised to `None`.
fn lenient_crowd_level<'de, D>(deserializer: D) -> Result<Option<CrowdLevel>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.parse().ok()))
}

/// Offset applied to timestamps that arrive without one (Singapore time).
const SGT_OFFSET_SECS: i32 = 8 * 3600;

/// Parses an RFC 3339 timestamp, or a bare `YYYY-MM-DDTHH:MM:SS` taken as SGT.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts);
    }
    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok()?;
    naive
        .and_local_timezone(FixedOffset::east_opt(SGT_OFFSET_SECS)?)
        .single()
}

/// Maps empty or unparseable timestamps to `None` instead of failing the row.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<FixedOffset>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_timestamp))
}

/// One station reading for one train line.
///
/// Field names follow the DataMall JSON, and the same layout is used for the
/// snapshot CSV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CrowdRecord {
    /// Line the record was fetched for. Absent in the raw API payload.
    #[serde(default)]
    pub train_line: Option<String>,
    pub station: String,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub start_time: Option<DateTime<FixedOffset>>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub end_time: Option<DateTime<FixedOffset>>,
    #[serde(default, deserialize_with = "lenient_crowd_level")]
    pub crowd_level: Option<CrowdLevel>,
}

impl CrowdRecord {
    /// Numeric weight of the reading, if there is one.
    pub fn weight(&self) -> Option<f64> {
        self.crowd_level.map(CrowdLevel::weight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights() {
        assert_eq!(CrowdLevel::Low.weight(), 0.1);
        assert_eq!(CrowdLevel::Medium.weight(), 0.5);
        assert_eq!(CrowdLevel::High.weight(), 1.0);
    }

    #[test]
    fn test_from_str_is_case_insensitive() {
        assert_eq!("H".parse::<CrowdLevel>().unwrap(), CrowdLevel::High);
        assert_eq!(" m ".parse::<CrowdLevel>().unwrap(), CrowdLevel::Medium);
        assert!("NA".parse::<CrowdLevel>().is_err());
        assert!("".parse::<CrowdLevel>().is_err());
    }

    #[test]
    fn test_record_weight_without_reading() {
        let record = CrowdRecord {
            train_line: None,
            station: "EW1".into(),
            start_time: None,
            end_time: None,
            crowd_level: None,
        };
        assert_eq!(record.weight(), None);
    }

    #[test]
    fn test_parse_timestamp_variants() {
        let expected = DateTime::parse_from_rfc3339("2025-03-01T08:00:00+08:00").ok();
        assert_eq!(parse_timestamp("2025-03-01T08:00:00+08:00"), expected);
        assert_eq!(parse_timestamp("2025-03-01T08:00:00"), expected);
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("soon"), None);
    }

    #[test]
    fn test_missing_crowd_level_field() {
        let record: CrowdRecord = serde_json::from_str(r#"{"Station": "CC1"}"#).unwrap();
        assert_eq!(record.crowd_level, None);
        assert_eq!(record.start_time, None);
    }
}
