use chrono::{DateTime, FixedOffset, Utc};
use serde::Serialize;

use crate::merge::MergedStation;

#[derive(Debug, Default, Serialize)]
pub struct RunSummary {
    pub timestamp: DateTime<Utc>,
    pub crowd_updated_at: Option<DateTime<FixedOffset>>,

    // inputs
    pub lines: usize,
    pub crowd_records: usize,
    pub stations: usize,
    pub taxis: usize,

    // join
    pub merged_rows: usize,
    pub with_crowd_level: usize,
    pub without_crowd_level: usize,
    pub crowd_level_pct: f64,
}

impl RunSummary {
    pub fn from_merge(
        merged: &[MergedStation],
        stations: usize,
        crowd_records: usize,
        taxis: usize,
    ) -> Self {
        let with_crowd_level = merged.iter().filter(|m| m.crowd_level.is_some()).count();

        RunSummary {
            timestamp: Utc::now(),
            stations,
            crowd_records,
            taxis,
            merged_rows: merged.len(),
            with_crowd_level,
            without_crowd_level: merged.len() - with_crowd_level,
            crowd_level_pct: Self::pct(with_crowd_level, merged.len()),
            ..Default::default()
        }
    }

    pub fn pct(part: usize, total: usize) -> f64 {
        if total == 0 {
            0.0
        } else {
            (part as f64 / total as f64) * 100.0
        }
    }

    pub fn with_lines(mut self, lines: usize) -> Self {
        self.lines = lines;
        self
    }

    pub fn with_updated_at(mut self, updated_at: Option<DateTime<FixedOffset>>) -> Self {
        self.crowd_updated_at = updated_at;
        self
    }
}
