//! Leaflet map configuration: base tiles plus the two heat layers.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::merge::MergedStation;
use crate::taxi::TaxiRecord;

pub const CENTER: [f64; 2] = [1.3521, 103.8198];
pub const ZOOM: u8 = 12;

const TILE_URL: &str = "https://{s}.basemaps.cartocdn.com/dark_all/{z}/{x}/{y}{r}.png";
const TILE_ATTRIBUTION: &str = "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors &copy; <a href=\"https://carto.com/attributions\">CARTO</a>";

#[derive(Debug, Serialize)]
pub struct TileLayer {
    pub url: &'static str,
    pub attribution: &'static str,
}

/// Options passed straight to `L.heatLayer`.
#[derive(Debug, Serialize)]
pub struct HeatLayer {
    pub name: &'static str,
    /// `[lat, lon]` or `[lat, lon, intensity]`.
    pub points: Vec<Vec<f64>>,
    pub radius: u32,
    pub gradient: Map<String, Value>,
}

#[derive(Debug, Serialize)]
pub struct MapConfig {
    pub center: [f64; 2],
    pub zoom: u8,
    pub tiles: TileLayer,
    pub layers: Vec<HeatLayer>,
}

fn gradient(stops: &[(f64, &str)]) -> Map<String, Value> {
    stops
        .iter()
        .map(|(stop, color)| (stop.to_string(), Value::from(*color)))
        .collect()
}

/// Station layer: one weighted point per station row that has a crowd level.
pub fn station_layer(stations: &[MergedStation]) -> HeatLayer {
    let points = stations
        .iter()
        .filter_map(|s| {
            s.crowd_level
                .map(|weight| vec![s.latitude, s.longitude, weight])
        })
        .collect();

    HeatLayer {
        name: "MRT/LRT crowd",
        points,
        radius: 10,
        gradient: gradient(&[(0.1, "blue"), (0.5, "yellow"), (1.0, "red")]),
    }
}

/// Taxi layer: unweighted points.
pub fn taxi_layer(taxis: &[TaxiRecord]) -> HeatLayer {
    HeatLayer {
        name: "Available taxis",
        points: taxis
            .iter()
            .map(|t| vec![t.latitude, t.longitude])
            .collect(),
        radius: 5,
        gradient: gradient(&[(0.0, "blue"), (1.0, "yellow")]),
    }
}

pub fn map_config(stations: &[MergedStation], taxis: &[TaxiRecord]) -> MapConfig {
    MapConfig {
        center: CENTER,
        zoom: ZOOM,
        tiles: TileLayer {
            url: TILE_URL,
            attribution: TILE_ATTRIBUTION,
        },
        layers: vec![station_layer(stations), taxi_layer(taxis)],
    }
}
