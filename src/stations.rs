//! Static station reference data.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// One row of the station reference CSV.
///
/// Only the named columns are read; extra columns such as the unnamed index
/// or `OBJECTID` are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    #[serde(rename = "STN_NO")]
    pub code: String,
    #[serde(rename = "STN_NAME")]
    pub name: String,
    #[serde(rename = "Latitude")]
    pub latitude: f64,
    #[serde(rename = "Longitude")]
    pub longitude: f64,
}

/// Reads every station from the CSV at `path`.
///
/// # Errors
///
/// Fails if the file cannot be opened, a required column is missing, or a
/// coordinate is not a number.
pub fn load_stations(path: impl AsRef<Path>) -> Result<Vec<Station>> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("failed to open station file {}", path.display()))?;
    read_stations(file).with_context(|| format!("failed to read stations from {}", path.display()))
}

/// Reads stations from any CSV source with a header row.
pub fn read_stations<R: std::io::Read>(reader: R) -> Result<Vec<Station>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut stations = Vec::new();

    for result in rdr.deserialize() {
        let station: Station = result?;
        stations.push(station);
    }

    debug!(count = stations.len(), "Stations loaded");
    Ok(stations)
}
