//! Taxi availability points.

use serde::{Deserialize, Serialize};

/// A free taxi at a point in time. Points carry no identity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TaxiRecord {
    pub latitude: f64,
    pub longitude: f64,
}
