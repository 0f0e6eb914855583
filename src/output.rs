//! Persistence of rendered pages and CSV tables.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use csv::WriterBuilder;
use std::fs::{self, File};
use std::path::Path;

/// Logs any serializable value as pretty-printed JSON.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }
    Ok(())
}

/// Writes `html` to `path`, creating parent directories as needed.
pub fn write_html(path: impl AsRef<Path>, html: &str) -> Result<()> {
    let path = path.as_ref();
    ensure_parent(path)?;
    fs::write(path, html).with_context(|| format!("failed to write {}", path.display()))?;
    debug!(path = %path.display(), bytes = html.len(), "HTML written");
    Ok(())
}

/// Writes `records` as a CSV with a header row, replacing any existing file.
pub fn write_records<T: Serialize>(path: impl AsRef<Path>, records: &[T]) -> Result<()> {
    let path = path.as_ref();
    ensure_parent(path)?;

    let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(file);

    for record in records {
        writer
            .serialize(record)
            .with_context(|| format!("failed to write record to {}", path.display()))?;
    }
    writer.flush()?;

    debug!(path = %path.display(), rows = records.len(), "CSV written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merge::MergedStation;
    use crate::summary::RunSummary;
    use std::env;

    fn temp_path(name: &str) -> std::path::PathBuf {
        env::temp_dir().join(name)
    }

    fn row(code: &str, crowd_level: Option<f64>) -> MergedStation {
        MergedStation {
            code: code.into(),
            name: format!("{code} STATION"),
            latitude: 1.3,
            longitude: 103.8,
            crowd_level,
        }
    }

    #[test]
    fn test_print_json_does_not_panic() {
        print_json(&RunSummary::default()).unwrap();
    }

    #[test]
    fn test_write_html_creates_parent_dirs() {
        let dir = temp_path("mrt_crowd_heatmap_test_html");
        let _ = fs::remove_dir_all(&dir);
        let path = dir.join("nested").join("Map.html");

        write_html(&path, "<html></html>").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "<html></html>");
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_write_records_replaces_file() {
        let path = temp_path("mrt_crowd_heatmap_test_merged.csv");
        let _ = fs::remove_file(&path);

        write_records(&path, &[row("NS1", Some(0.5)), row("NS2", None)]).unwrap();
        write_records(&path, &[row("EW1", None)]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "STN_NO,STN_NAME,Latitude,Longitude,CrowdLevel");
        assert_eq!(lines[1], "EW1,EW1 STATION,1.3,103.8,");

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_records_empty_slice() {
        let path = temp_path("mrt_crowd_heatmap_test_empty.csv");
        let _ = fs::remove_file(&path);

        write_records::<MergedStation>(&path, &[]).unwrap();

        assert!(path.exists());
        fs::remove_file(&path).unwrap();
    }
}
