/// Data models for persisted entities
///
/// `StoredItem` maps to the key-value table. `ScanRecord` is the element
/// type of the serialized scan history value.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

/// One raw row of the key-value table
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StoredItem {
    pub key: String,
    pub value: String,
    pub updated_at: String, // ISO 8601 format from SQLite
}

/// One observed scan
///
/// Field names on the wire are `type`, `data` and `timestamp` so existing
/// history values stay readable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRecord {
    /// Barcode symbology, e.g. "qr" or "ean13"
    #[serde(rename = "type")]
    pub kind: String,
    /// Decoded text content
    #[serde(rename = "data")]
    pub payload: String,
    /// Capture time, serialized as RFC 3339
    #[serde(rename = "timestamp", deserialize_with = "deserialize_timestamp")]
    pub observed_at: DateTime<Utc>,
}

impl ScanRecord {
    /// Build a record stamped with the current wall-clock time
    pub fn now(kind: &str, payload: &str) -> Self {
        Self {
            kind: kind.to_string(),
            payload: payload.to_string(),
            observed_at: Utc::now(),
        }
    }

    /// Key used to tell rows apart in a rendered list.
    ///
    /// Two records with the same timestamp share a key.
    pub fn list_key(&self) -> String {
        self.observed_at.to_rfc3339()
    }

    /// Capture time in the local timezone, for display
    pub fn local_time_label(&self) -> String {
        self.observed_at
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
    }
}

/// Parse an ISO-8601 timestamp.
///
/// Offsets are honoured when present. Timestamps without one, and bare
/// dates, are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc())
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid ISO-8601 timestamp '{}'", raw)))
}

/// Search hit with its fuzzy match score
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub record: ScanRecord,
    pub score: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_record_wire_names() {
        let record = ScanRecord::now("qr", "hello");
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["type"], "qr");
        assert_eq!(json["data"], "hello");
        assert!(json["timestamp"].is_string());
    }

    #[test]
    fn test_scan_record_reads_millisecond_timestamps() {
        let raw = r#"{"type":"ean13","data":"4006381333931","timestamp":"2025-11-25T10:15:30.123Z"}"#;
        let record: ScanRecord = serde_json::from_str(raw).unwrap();

        assert_eq!(record.kind, "ean13");
        assert_eq!(record.payload, "4006381333931");
        assert_eq!(record.list_key(), "2025-11-25T10:15:30.123+00:00");
    }

    #[test]
    fn test_timestamps_without_offset_read_as_utc() {
        let raw = r#"{"type":"qr","data":"x","timestamp":"2025-11-25T10:15:30"}"#;
        let record: ScanRecord = serde_json::from_str(raw).unwrap();
        assert_eq!(record.list_key(), "2025-11-25T10:15:30+00:00");

        assert_eq!(
            parse_timestamp("2025-11-25T12:15:30+02:00"),
            parse_timestamp("2025-11-25T10:15:30Z")
        );
        assert_eq!(
            parse_timestamp("2025-11-25").map(|t| t.to_rfc3339()),
            Some("2025-11-25T00:00:00+00:00".to_string())
        );
        assert!(parse_timestamp("yesterday").is_none());
        assert!(serde_json::from_str::<ScanRecord>(
            r#"{"type":"qr","data":"x","timestamp":"yesterday"}"#
        )
        .is_err());
    }

    #[test]
    fn test_local_time_label_shape() {
        let record = ScanRecord::now("qr", "x");
        let label = record.local_time_label();
        assert_eq!(label.len(), "2025-11-25 10:15:30".len());
    }
}
