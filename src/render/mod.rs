//! HTML rendering of the crowd map.
//!
//! The page is a fixed template (`page.html`) filled with three JSON/text
//! values: the Leaflet map config, the sorted station rows and the crowd
//! update time.

pub mod map;
pub mod sidebar;
pub mod template;

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, Utc};

use crate::merge::MergedStation;
use crate::taxi::TaxiRecord;
use map::map_config;
use sidebar::sidebar_rows;
use template::{escape_html, render_template, script_json};

const PAGE_TEMPLATE: &str = include_str!("page.html");

/// Everything the page needs.
pub struct PageContext<'a> {
    pub stations: &'a [MergedStation],
    pub taxis: &'a [TaxiRecord],
    pub crowd_updated_at: Option<DateTime<FixedOffset>>,
    pub generated_at: DateTime<Utc>,
}

pub fn format_timestamp(ts: Option<DateTime<FixedOffset>>) -> String {
    ts.map(|t| t.format("%Y-%m-%d %H:%M:%S %:z").to_string())
        .unwrap_or_else(|| "unavailable".to_string())
}

/// Renders the complete self-contained page.
pub fn render_page(ctx: &PageContext<'_>) -> Result<String> {
    let map_json = script_json(&map_config(ctx.stations, ctx.taxis))
        .context("failed to serialize map config")?;
    let rows_json =
        script_json(&sidebar_rows(ctx.stations)).context("failed to serialize station rows")?;
    let updated_at = escape_html(&format_timestamp(ctx.crowd_updated_at));
    let generated_at = ctx.generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string();

    render_template(
        PAGE_TEMPLATE,
        &[
            ("map_config", map_json.as_str()),
            ("station_rows", rows_json.as_str()),
            ("updated_at", updated_at.as_str()),
            ("generated_at", generated_at.as_str()),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn merged(code: &str, name: &str, crowd_level: Option<f64>) -> MergedStation {
        MergedStation {
            code: code.into(),
            name: name.into(),
            latitude: 1.3,
            longitude: 103.8,
            crowd_level,
        }
    }

    #[test]
    fn test_template_has_only_known_placeholders() {
        let ctx = PageContext {
            stations: &[],
            taxis: &[],
            crowd_updated_at: None,
            generated_at: Utc::now(),
        };
        let html = render_page(&ctx).unwrap();
        assert!(!html.contains("{{"));
        assert!(html.contains("unavailable"));
        assert!(html.contains("leaflet-heat.js"));
    }

    #[test]
    fn test_page_embeds_station_rows_and_time() {
        let stations = vec![
            merged("NS2", "BUKIT BATOK", None),
            merged("NS1", "JURONG EAST", Some(1.0)),
        ];
        let updated = FixedOffset::east_opt(8 * 3600)
            .unwrap()
            .with_ymd_and_hms(2025, 3, 1, 8, 0, 0)
            .unwrap();
        let ctx = PageContext {
            stations: &stations,
            taxis: &[TaxiRecord {
                latitude: 1.29,
                longitude: 103.85,
            }],
            crowd_updated_at: Some(updated),
            generated_at: Utc::now(),
        };

        let html = render_page(&ctx).unwrap();

        assert!(html.contains("2025-03-01 08:00:00 +08:00"));
        let ns1 = html.find(r#""STN_NO":"NS1""#).unwrap();
        let ns2 = html.find(r#""STN_NO":"NS2""#).unwrap();
        assert!(ns1 < ns2);
        assert!(html.contains("[1.29,103.85]"));
    }

    #[test]
    fn test_station_names_cannot_close_script() {
        let stations = vec![merged("NS1", "</script><b>x</b>", None)];
        let ctx = PageContext {
            stations: &stations,
            taxis: &[],
            crowd_updated_at: None,
            generated_at: Utc::now(),
        };

        let html = render_page(&ctx).unwrap();

        assert_eq!(html.matches("</script>").count(), 3);
    }
}
