//! Rows for the station table shown next to the map.

use serde::Serialize;

use crate::merge::MergedStation;

/// CSS class used to tint a table row by crowd level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Band {
    #[serde(rename = "crowd-low")]
    Low,
    #[serde(rename = "crowd-medium")]
    Medium,
    #[serde(rename = "crowd-high")]
    High,
}

impl Band {
    /// Rows without a reading are shown in the low band.
    pub fn for_level(level: Option<f64>) -> Self {
        match level {
            Some(l) if l == 1.0 => Band::High,
            Some(l) if l == 0.5 => Band::Medium,
            _ => Band::Low,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SidebarRow<'a> {
    #[serde(rename = "STN_NO")]
    pub code: &'a str,
    #[serde(rename = "STN_NAME")]
    pub name: &'a str,
    #[serde(rename = "CrowdLevel")]
    pub crowd_level: Option<f64>,
    #[serde(rename = "Band")]
    pub band: Band,
}

/// Builds the table rows, sorted by station code.
///
/// The sort is stable so duplicate codes keep their join order.
pub fn sidebar_rows(stations: &[MergedStation]) -> Vec<SidebarRow<'_>> {
    let mut rows: Vec<_> = stations
        .iter()
        .map(|s| SidebarRow {
            code: &s.code,
            name: &s.name,
            crowd_level: s.crowd_level,
            band: Band::for_level(s.crowd_level),
        })
        .collect();
    rows.sort_by(|a, b| a.code.cmp(b.code));
    rows
}
