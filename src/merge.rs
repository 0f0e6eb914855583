//! Left join of crowd readings onto stations.

use serde::Serialize;
use std::collections::HashMap;

use crate::crowd::CrowdRecord;
use crate::stations::Station;

/// A station row after the join. `crowd_level` holds the numeric weight.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergedStation {
    #[serde(rename = "STN_NO")]
    pub code: String,
    #[serde(rename = "STN_NAME")]
    pub name: String,
    #[serde(rename = "Latitude")]
    pub latitude: f64,
    #[serde(rename = "Longitude")]
    pub longitude: f64,
    #[serde(rename = "CrowdLevel")]
    pub crowd_level: Option<f64>,
}

impl MergedStation {
    fn new(station: &Station, crowd_level: Option<f64>) -> Self {
        MergedStation {
            code: station.code.clone(),
            name: station.name.clone(),
            latitude: station.latitude,
            longitude: station.longitude,
            crowd_level,
        }
    }
}

/// Joins `crowd` onto `stations` by station code.
///
/// Every station is kept, in its original order. A station matched by several
/// crowd rows (one per line serving it) appears once per match, in feed order.
/// Unmatched stations appear once with no crowd level.
pub fn merge_stations(stations: &[Station], crowd: &[CrowdRecord]) -> Vec<MergedStation> {
    let mut by_code: HashMap<&str, Vec<Option<f64>>> = HashMap::new();
    for record in crowd {
        by_code
            .entry(record.station.as_str())
            .or_default()
            .push(record.weight());
    }

    let mut merged = Vec::with_capacity(stations.len());
    for station in stations {
        match by_code.get(station.code.as_str()) {
            Some(weights) => {
                merged.extend(weights.iter().map(|w| MergedStation::new(station, *w)));
            }
            None => merged.push(MergedStation::new(station, None)),
        }
    }

    merged
}
