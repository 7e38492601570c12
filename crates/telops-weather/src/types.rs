use std::fmt;

use serde::{Deserialize, Serialize};
use telops_core::Unit;

/// One entry of the refresh payload.
///
/// The telops refresh endpoint answers with a JSON array of these; only a
/// couple carry the station readings, the rest are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Record {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub val: Option<serde_json::Value>,
}

impl Record {
    /// The record id, when it is a string.
    pub fn id(&self) -> Option<&str> {
        self.id.as_ref().and_then(|v| v.as_str())
    }

    /// The HTML fragment carried in `val`, when it is a string.
    pub fn html(&self) -> Option<&str> {
        self.val.as_ref().and_then(|v| v.as_str())
    }
}

/// Semantic name of a scraped field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Temperature,
    DewPoint,
    Pressure,
    Humidity,
    Wind,
    Insolation,
    Brightness,
    Transparency,
    OkToOpen,
    InterlockReason,
    Moon,
    Time,
}

impl Field {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Temperature => "temperature",
            Self::DewPoint => "dew_point",
            Self::Pressure => "pressure",
            Self::Humidity => "humidity",
            Self::Wind => "wind",
            Self::Insolation => "insolation",
            Self::Brightness => "brightness",
            Self::Transparency => "transparency",
            Self::OkToOpen => "ok_to_open",
            Self::InterlockReason => "interlock_reason",
            Self::Moon => "moon",
            Self::Time => "time",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Textual site status cells that come along with the numeric readings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteConditions {
    pub insolation: String,
    pub brightness: String,
    pub transparency: String,
    pub ok_to_open: String,
    pub interlock_reason: String,
    pub moon: String,
}

/// One complete, parsed station snapshot in the station's own units.
///
/// Built in full by a fetch cycle or not at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawReading {
    /// Provider-formatted observation time
    pub observation_time: String,
    /// Degrees Celsius
    pub temperature: f64,
    /// Percent
    pub humidity: f64,
    /// Metres per second
    pub wind_speed: f64,
    /// Compass code as scraped, leading whitespace removed
    pub wind_direction_raw: String,
    /// Degrees, `None` when the compass code was not recognised
    pub wind_direction: Option<f64>,
    /// Millimetres of mercury
    pub pressure: f64,
    pub conditions: SiteConditions,
}

/// A converted reading handed to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaggedValue {
    pub observation_time: String,
    pub value: f64,
    pub unit: Unit,
}

impl fmt::Display for TaggedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.value, self.unit, self.observation_time)
    }
}

/// Value column of a metadata entry.
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataValue {
    Text(String),
    Reading(TaggedValue),
    /// No data: the fetch cycle failed or the value could not be resolved
    Missing,
}

/// One header card for the reporting collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataEntry {
    pub key: &'static str,
    pub value: MetadataValue,
    pub comment: &'static str,
}

impl fmt::Display for MetadataEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match &self.value {
            MetadataValue::Text(text) => format!("'{}'", text),
            MetadataValue::Reading(reading) => reading.value.to_string(),
            MetadataValue::Missing => String::new(),
        };
        write!(f, "{:<8}= {:>20} / {}", self.key, value, self.comment)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    #[test]
    fn test_record_accessors_ignore_non_strings() {
        let records: Vec<Record> = serde_json::from_value(serde_json::json!([
            {"id": "#site-tfn-time", "val": "As of <b>12:00</b>"},
            {"id": 7, "val": {"nested": true}},
            {"other": "keys only"}
        ]))
        .unwrap();

        assert_eq!(records[0].id(), Some("#site-tfn-time"));
        assert_eq!(records[0].html(), Some("As of <b>12:00</b>"));
        assert_eq!(records[1].id(), None);
        assert_eq!(records[1].html(), None);
        assert!(records[2].id.is_none());
    }

    #[test]
    fn test_metadata_entry_card_format() {
        let entry = MetadataEntry {
            key: "ENVTEM",
            value: MetadataValue::Reading(TaggedValue {
                observation_time: "2024-01-01 00:00".into(),
                value: 12.5,
                unit: Unit::Celsius,
            }),
            comment: "[degC] Weather station temperature",
        };
        let card = entry.to_string();
        assert!(card.starts_with("ENVTEM  = "));
        assert!(card.contains("12.5 / [degC]"));

        let missing = MetadataEntry {
            key: "ENVHUM",
            value: MetadataValue::Missing,
            comment: "[%] Weather station relative humidity",
        };
        assert!(missing.to_string().starts_with("ENVHUM  = "));
    }

    #[test]
    fn test_tagged_value_display() {
        let value = TaggedValue {
            observation_time: "12:00".into(),
            value: 3.5,
            unit: Unit::MetersPerSecond,
        };
        assert_eq!(value.to_string(), "3.5 m/s (12:00)");
    }
}
