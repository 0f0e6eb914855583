//! Decoder for the DataMall OData envelope.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde::de::DeserializeOwned;

/// DataMall wraps every result set as `{"odata.metadata": "...", "value": [...]}`.
#[derive(Deserialize)]
struct Envelope<T> {
    #[serde(default = "Vec::new")]
    value: Vec<T>,
}

/// Decodes the `value` array of a DataMall response.
///
/// A response without a `value` key yields an empty list.
///
/// # Errors
///
/// Returns an error if the bytes are not JSON or a record does not match `T`.
pub fn parse_value_list<T: DeserializeOwned>(bytes: &[u8]) -> Result<Vec<T>> {
    let envelope: Envelope<T> =
        serde_json::from_slice(bytes).context("malformed DataMall response")?;
    Ok(envelope.value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crowd::{CrowdLevel, CrowdRecord};
    use crate::taxi::TaxiRecord;

    #[test]
    fn test_parse_missing_value_returns_empty() {
        let result: Vec<TaxiRecord> =
            parse_value_list(br#"{"odata.metadata": "x"}"#).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_parse_invalid_bytes() {
        let result = parse_value_list::<TaxiRecord>(&[0xFF, 0xFE, 0x00]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_crowd_records() {
        let body = br#"{
            "odata.metadata": "http://datamall2.mytransport.sg/ltaodataservice/$metadata#PCDRealTime",
            "value": [
                {"Station": "NS1", "StartTime": "2025-03-01T08:00:00+08:00",
                 "EndTime": "2025-03-01T08:10:00+08:00", "CrowdLevel": "h"},
                {"Station": "NS2", "StartTime": "2025-03-01T08:00:00+08:00",
                 "EndTime": "2025-03-01T08:10:00+08:00", "CrowdLevel": "NA"}
            ]
        }"#;

        let records: Vec<CrowdRecord> = parse_value_list(body).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].station, "NS1");
        assert_eq!(records[0].crowd_level, Some(CrowdLevel::High));
        assert_eq!(records[1].crowd_level, None);
        assert!(records[0].train_line.is_none());
    }

    #[test]
    fn test_parse_tolerates_loose_timestamps() {
        let body = br#"{"value": [
            {"Station": "NS1", "StartTime": "2025-03-01T08:00:00+08:00",
             "EndTime": "", "CrowdLevel": "h"},
            {"Station": "NS2", "StartTime": "2025-03-01T08:00:00",
             "EndTime": "2025-03-01T08:10:00", "CrowdLevel": "l"},
            {"Station": "NS3", "StartTime": null, "CrowdLevel": "m"}
        ]}"#;

        let records: Vec<CrowdRecord> = parse_value_list(body).unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].end_time, None);
        assert_eq!(
            records[1].start_time,
            chrono::DateTime::parse_from_rfc3339("2025-03-01T08:00:00+08:00").ok()
        );
        assert_eq!(
            records[1].end_time,
            chrono::DateTime::parse_from_rfc3339("2025-03-01T08:10:00+08:00").ok()
        );
        assert_eq!(records[2].start_time, None);
        assert_eq!(records[2].crowd_level, Some(CrowdLevel::Medium));
    }

    #[test]
    fn test_parse_taxi_records() {
        let body = br#"{"value": [{"Longitude": 103.8, "Latitude": 1.3}]}"#;
        let records: Vec<TaxiRecord> = parse_value_list(body).unwrap();
        assert_eq!(records, vec![TaxiRecord { latitude: 1.3, longitude: 103.8 }]);
    }
}
