//! End-to-end runs: fetch, join, render, write.

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, Utc};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::crowd::CrowdRecord;
use crate::infra::snapshot::write_snapshot;
use crate::merge::merge_stations;
use crate::output::{print_json, write_html, write_records};
use crate::render::{PageContext, render_page};
use crate::services::datamall_api::{DataMallApi, TrainLine};
use crate::stations::load_stations;
use crate::summary::RunSummary;

/// Crowd readings for all requested lines, concatenated in fetch order.
#[derive(Debug, Default)]
pub struct CrowdFeed {
    pub records: Vec<CrowdRecord>,
    /// Start time of the first reading of the first line.
    pub updated_at: Option<DateTime<FixedOffset>>,
}

pub struct RenderOptions {
    pub stations_path: PathBuf,
    pub output_path: PathBuf,
    pub merged_csv: Option<PathBuf>,
    pub lines: Vec<TrainLine>,
}

/// Falls back to every line when none were requested.
pub fn resolve_lines(lines: &[TrainLine]) -> Vec<TrainLine> {
    if lines.is_empty() {
        TrainLine::ALL.to_vec()
    } else {
        lines.to_vec()
    }
}

/// Fetches each line in turn. Records are not deduplicated across lines.
#[tracing::instrument(skip(api, lines), fields(lines = lines.len()))]
pub async fn collect_crowd(api: &dyn DataMallApi, lines: &[TrainLine]) -> Result<CrowdFeed> {
    let mut feed = CrowdFeed::default();

    for &line in lines {
        let records = api
            .crowd_density(line)
            .await
            .with_context(|| format!("failed to fetch crowd density for {line}"))?;

        if records.is_empty() {
            warn!(line = %line, "No crowd records for line");
        } else {
            info!(line = %line, count = records.len(), "Crowd records fetched");
        }

        if feed.records.is_empty() {
            feed.updated_at = records.first().and_then(|r| r.start_time);
        }
        feed.records.extend(records);
    }

    Ok(feed)
}

/// Runs the whole pipeline and writes the map page to `opts.output_path`.
#[tracing::instrument(skip(api, opts), fields(output = %opts.output_path.display()))]
pub async fn render_map(api: &dyn DataMallApi, opts: &RenderOptions) -> Result<RunSummary> {
    let lines = resolve_lines(&opts.lines);
    let crowd = collect_crowd(api, &lines).await?;

    let taxis = api
        .taxi_availability()
        .await
        .context("failed to fetch taxi availability")?;
    info!(count = taxis.len(), "Taxi positions fetched");

    let stations = load_stations(&opts.stations_path)?;
    info!(count = stations.len(), path = %opts.stations_path.display(), "Stations loaded");

    let merged = merge_stations(&stations, &crowd.records);

    if let Some(path) = &opts.merged_csv {
        write_records(path, &merged)?;
        info!(path = %path.display(), "Merged table written");
    }

    let html = render_page(&PageContext {
        stations: &merged,
        taxis: &taxis,
        crowd_updated_at: crowd.updated_at,
        generated_at: Utc::now(),
    })?;
    write_html(&opts.output_path, &html)?;

    let summary = RunSummary::from_merge(&merged, stations.len(), crowd.records.len(), taxis.len())
        .with_lines(lines.len())
        .with_updated_at(crowd.updated_at);
    print_json(&summary)?;

    info!(path = %opts.output_path.display(), bytes = html.len(), "Map written");
    Ok(summary)
}

/// Fetches crowd and taxi data and stores them for offline rendering.
#[tracing::instrument(skip(api, lines), fields(dir = %dir.display()))]
pub async fn snapshot(api: &dyn DataMallApi, lines: &[TrainLine], dir: &Path) -> Result<CrowdFeed> {
    let lines = resolve_lines(lines);
    let crowd = collect_crowd(api, &lines).await?;
    let taxis = api
        .taxi_availability()
        .await
        .context("failed to fetch taxi availability")?;

    write_snapshot(dir, &crowd.records, &taxis)?;
    Ok(crowd)
}
