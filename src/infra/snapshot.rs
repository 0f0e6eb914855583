//! Offline data source backed by CSV files from an earlier fetch.
//!
//! A snapshot directory holds `crowd.csv` and `taxi.csv`, written by
//! [`write_snapshot`] with the same column names DataMall uses.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::crowd::CrowdRecord;
use crate::output::write_records;
use crate::services::datamall_api::{DataMallApi, TrainLine};
use crate::taxi::TaxiRecord;

pub const CROWD_FILE: &str = "crowd.csv";
pub const TAXI_FILE: &str = "taxi.csv";

pub struct SnapshotSource {
    dir: PathBuf,
}

impl SnapshotSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

fn read_csv<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file =
        File::open(path).with_context(|| format!("failed to open snapshot {}", path.display()))?;
    let mut rdr = csv::Reader::from_reader(file);
    let mut rows = Vec::new();

    for result in rdr.deserialize() {
        let record: T =
            result.with_context(|| format!("malformed row in {}", path.display()))?;
        rows.push(record);
    }

    Ok(rows)
}

#[async_trait]
impl DataMallApi for SnapshotSource {
    async fn crowd_density(&self, line: TrainLine) -> Result<Vec<CrowdRecord>> {
        let records: Vec<CrowdRecord> = read_csv(&self.dir.join(CROWD_FILE))?;
        Ok(records
            .into_iter()
            .filter(|r| r.train_line.as_deref() == Some(line.code()))
            .collect())
    }

    async fn taxi_availability(&self) -> Result<Vec<TaxiRecord>> {
        read_csv(&self.dir.join(TAXI_FILE))
    }
}

/// Writes a snapshot of one fetch into `dir`, replacing earlier files.
pub fn write_snapshot(
    dir: impl AsRef<Path>,
    crowd: &[CrowdRecord],
    taxis: &[TaxiRecord],
) -> Result<()> {
    let dir = dir.as_ref();
    write_records(dir.join(CROWD_FILE), crowd)?;
    write_records(dir.join(TAXI_FILE), taxis)?;
    info!(dir = %dir.display(), crowd = crowd.len(), taxis = taxis.len(), "Snapshot written");
    Ok(())
}
