//! Trait and types for the real-time transport data source.

use anyhow::{Result, anyhow};
use std::fmt;
use std::str::FromStr;

use crate::crowd::CrowdRecord;
use crate::taxi::TaxiRecord;

/// Train lines covered by the platform crowd-density feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrainLine {
    NorthSouth,
    CircleLine,
    CircleExtension,
    ChangiAirportBranch,
    Downtown,
    EastWest,
    NorthEast,
    ThomsonEastCoast,
    BukitPanjangLrt,
    SengkangLrt,
    PunggolLrt,
}

impl TrainLine {
    /// Every line, in fetch order. North-South comes first and provides the
    /// update time shown on the map.
    pub const ALL: [TrainLine; 11] = [
        TrainLine::NorthSouth,
        TrainLine::CircleLine,
        TrainLine::CircleExtension,
        TrainLine::ChangiAirportBranch,
        TrainLine::Downtown,
        TrainLine::EastWest,
        TrainLine::NorthEast,
        TrainLine::ThomsonEastCoast,
        TrainLine::BukitPanjangLrt,
        TrainLine::SengkangLrt,
        TrainLine::PunggolLrt,
    ];

    /// DataMall `TrainLine` query value.
    pub fn code(self) -> &'static str {
        match self {
            TrainLine::NorthSouth => "NSL",
            TrainLine::CircleLine => "CCL",
            TrainLine::CircleExtension => "CEL",
            TrainLine::ChangiAirportBranch => "CGL",
            TrainLine::Downtown => "DTL",
            TrainLine::EastWest => "EWL",
            TrainLine::NorthEast => "NEL",
            TrainLine::ThomsonEastCoast => "TEL",
            TrainLine::BukitPanjangLrt => "BPL",
            TrainLine::SengkangLrt => "SLRT",
            TrainLine::PunggolLrt => "PLRT",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TrainLine::NorthSouth => "North-South Line",
            TrainLine::CircleLine => "Circle Line",
            TrainLine::CircleExtension => "Circle Line Extension",
            TrainLine::ChangiAirportBranch => "Changi Airport Branch Line",
            TrainLine::Downtown => "Downtown Line",
            TrainLine::EastWest => "East-West Line",
            TrainLine::NorthEast => "North East Line",
            TrainLine::ThomsonEastCoast => "Thomson-East Coast Line",
            TrainLine::BukitPanjangLrt => "Bukit Panjang LRT",
            TrainLine::SengkangLrt => "Sengkang LRT",
            TrainLine::PunggolLrt => "Punggol LRT",
        }
    }
}

impl FromStr for TrainLine {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        TrainLine::ALL
            .into_iter()
            .find(|line| line.code().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| anyhow!("unknown train line '{wanted}'"))
    }
}

impl fmt::Display for TrainLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Abstraction over where crowd and taxi data come from (live API or a
/// saved snapshot).
#[async_trait::async_trait]
pub trait DataMallApi: Send + Sync {
    /// Crowd readings for every station on `line`, tagged with the line code.
    async fn crowd_density(&self, line: TrainLine) -> Result<Vec<CrowdRecord>>;

    /// All currently available taxis.
    async fn taxi_availability(&self) -> Result<Vec<TaxiRecord>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line_codes() {
        assert_eq!("nsl".parse::<TrainLine>().unwrap(), TrainLine::NorthSouth);
        assert_eq!("PLRT".parse::<TrainLine>().unwrap(), TrainLine::PunggolLrt);
        assert!("XYZ".parse::<TrainLine>().is_err());
    }

    #[test]
    fn test_codes_round_trip() {
        for line in TrainLine::ALL {
            assert_eq!(line.to_string().parse::<TrainLine>().unwrap(), line);
        }
    }

    #[test]
    fn test_north_south_is_fetched_first() {
        assert_eq!(TrainLine::ALL[0], TrainLine::NorthSouth);
    }
}
