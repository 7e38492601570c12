//! Locate the station records in a refresh payload and cut the weather
//! table into cells.
//!
//! The weather block is an HTML table whose value cells sit at fixed
//! ordinal positions (labels in the even cells, values in the odd ones).
//! The table goes through a full HTML parse, so cells with an omitted
//! `</td>` still count, and each cell reaches the cleaner re-serialised.

use std::sync::OnceLock;

use scraper::{Html, Selector};

use crate::error::StationError;
use crate::types::{Field, Record};

/// Record id carrying the weather table.
pub const WEATHER_BLOCK_ID: &str = "#site-lsc-ssb-system-Weather-tip";
/// Record id carrying the observation time.
pub const TIMESTAMP_ID: &str = "#site-tfn-time";

const INTERLOCK_CELL: usize = 19;
const MOON_CELL: usize = 21;
const NO_INTERLOCK: &str = "none";

/// Table cell index of each fixed-position field.
pub fn column(field: Field) -> Option<usize> {
    match field {
        Field::Temperature => Some(1),
        Field::DewPoint => Some(3),
        Field::Pressure => Some(5),
        Field::Humidity => Some(7),
        Field::Wind => Some(9),
        Field::Insolation => Some(11),
        Field::Brightness => Some(13),
        Field::Transparency => Some(15),
        Field::OkToOpen => Some(17),
        Field::InterlockReason | Field::Moon | Field::Time => None,
    }
}

#[allow(clippy::expect_used)]
fn cell_selector() -> &'static Selector {
    static CELL: OnceLock<Selector> = OnceLock::new();
    // Literal selector, cannot fail to parse.
    CELL.get_or_init(|| Selector::parse("td").expect("valid table cell selector"))
}

/// Cells of one weather table.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherCells {
    cells: Vec<String>,
    interlock_reason: String,
    moon: String,
}

impl WeatherCells {
    /// Split a weather table into cells.
    ///
    /// The table comes in two widths. With 22 or more cells, cell 19 is the
    /// interlock reason and cell 21 the moon phase; when cell 21 is absent,
    /// cell 19 is the moon phase and the interlock reason is `"none"`.
    pub fn parse(html: &str) -> Result<Self, StationError> {
        let cells: Vec<String> = Html::parse_fragment(html)
            .select(cell_selector())
            .map(|cell| cell.html())
            .collect();

        let (interlock_reason, moon) = match (cells.get(INTERLOCK_CELL), cells.get(MOON_CELL)) {
            (Some(reason), Some(moon)) => (reason.clone(), moon.clone()),
            (Some(moon), None) => (NO_INTERLOCK.to_string(), moon.clone()),
            (None, _) => {
                return Err(StationError::parse(format!(
                    "weather table has {} cells, expected at least {}",
                    cells.len(),
                    INTERLOCK_CELL + 1
                )))
            }
        };

        Ok(Self {
            cells,
            interlock_reason,
            moon,
        })
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Raw fragment for `field`.
    pub fn fragment(&self, field: Field) -> Result<&str, StationError> {
        match field {
            Field::InterlockReason => Ok(&self.interlock_reason),
            Field::Moon => Ok(&self.moon),
            _ => column(field)
                .and_then(|idx| self.cells.get(idx))
                .map(String::as_str)
                .ok_or_else(|| StationError::parse(format!("weather table has no {} cell", field))),
        }
    }
}

/// Fragments pulled out of one refresh payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedFields {
    pub cells: WeatherCells,
    /// Raw observation-time fragment
    pub observation_time: String,
}

/// Find the weather table and the observation time in `records`.
///
/// When an id repeats, the last matching record wins.
pub fn extract(records: &[Record]) -> Result<ExtractedFields, StationError> {
    let mut cells = None;
    let mut observation_time = None;

    for record in records {
        match record.id() {
            Some(WEATHER_BLOCK_ID) => {
                let html = record.html().ok_or_else(|| {
                    StationError::parse(format!("{} record has no HTML value", WEATHER_BLOCK_ID))
                })?;
                cells = Some(WeatherCells::parse(html)?);
            }
            Some(TIMESTAMP_ID) => {
                let html = record.html().ok_or_else(|| {
                    StationError::parse(format!("{} record has no HTML value", TIMESTAMP_ID))
                })?;
                observation_time = Some(html.to_string());
            }
            _ => {}
        }
    }

    let cells = cells.ok_or_else(|| {
        StationError::parse(format!("no {} record in payload", WEATHER_BLOCK_ID))
    })?;
    let observation_time = observation_time
        .ok_or_else(|| StationError::parse(format!("no {} record in payload", TIMESTAMP_ID)))?;

    tracing::debug!("Extracted weather table with {} cells", cells.len());
    Ok(ExtractedFields {
        cells,
        observation_time,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use crate::fixtures::{payload, weather_table, NARROW_CELLS, WIDE_CELLS};

    #[test]
    fn test_wide_table_reads_interlock_and_moon() {
        let cells = WeatherCells::parse(&weather_table(WIDE_CELLS)).unwrap();
        assert_eq!(cells.len(), 22);
        assert_eq!(cells.fragment(Field::InterlockReason).unwrap(), WIDE_CELLS[19]);
        assert_eq!(cells.fragment(Field::Moon).unwrap(), WIDE_CELLS[21]);
    }

    #[test]
    fn test_narrow_table_falls_back_to_no_interlock() {
        let cells = WeatherCells::parse(&weather_table(NARROW_CELLS)).unwrap();
        assert_eq!(cells.len(), 20);
        assert_eq!(cells.fragment(Field::InterlockReason).unwrap(), "none");
        assert_eq!(cells.fragment(Field::Moon).unwrap(), NARROW_CELLS[19]);
    }

    #[test]
    fn test_fixed_columns() {
        let cells = WeatherCells::parse(&weather_table(WIDE_CELLS)).unwrap();
        assert_eq!(cells.fragment(Field::Temperature).unwrap(), WIDE_CELLS[1]);
        assert_eq!(cells.fragment(Field::Pressure).unwrap(), WIDE_CELLS[5]);
        assert_eq!(cells.fragment(Field::Humidity).unwrap(), WIDE_CELLS[7]);
        assert_eq!(cells.fragment(Field::Wind).unwrap(), WIDE_CELLS[9]);
        assert_eq!(cells.fragment(Field::OkToOpen).unwrap(), WIDE_CELLS[17]);
        assert!(cells.fragment(Field::Time).is_err());
    }

    #[test]
    fn test_short_table_is_parse_error() {
        let err = WeatherCells::parse(&weather_table(&WIDE_CELLS[..19])).unwrap_err();
        assert!(matches!(err, StationError::Parse(_)));
    }

    #[test]
    fn test_unclosed_cells_keep_their_positions() {
        let cells: Vec<String> = WIDE_CELLS
            .iter()
            .map(|&cell| cell.strip_suffix("</td>").unwrap_or(cell).to_string())
            .collect();
        let unclosed: Vec<&str> = cells.iter().map(String::as_str).collect();

        let parsed = WeatherCells::parse(&weather_table(&unclosed)).unwrap();

        assert_eq!(parsed.len(), 22);
        assert_eq!(parsed.fragment(Field::Temperature).unwrap(), WIDE_CELLS[1]);
        assert_eq!(parsed.fragment(Field::Wind).unwrap(), WIDE_CELLS[9]);
        assert_eq!(parsed.fragment(Field::InterlockReason).unwrap(), WIDE_CELLS[19]);
        assert_eq!(parsed.fragment(Field::Moon).unwrap(), WIDE_CELLS[21]);
    }

    #[test]
    fn test_cells_are_reserialized() {
        let html = "<table><tr><TD>Temperature<td><B>12.3°C</B></tr></table>";
        let table = html.repeat(11);

        let parsed = WeatherCells::parse(&table).unwrap();

        assert_eq!(
            parsed.fragment(Field::Temperature).unwrap(),
            "<td><b>12.3°C</b></td>"
        );
    }

    #[test]
    fn test_extract_finds_both_records() {
        let records = payload(&weather_table(WIDE_CELLS), "As of <b>2024-01-01 00:00</b>");
        let fields = extract(&records).unwrap();
        assert_eq!(fields.observation_time, "As of <b>2024-01-01 00:00</b>");
        assert_eq!(fields.cells.len(), 22);
    }

    #[test]
    fn test_extract_uses_last_weather_block() {
        let mut records = payload(&weather_table(WIDE_CELLS), "As of <b>t</b>");
        records.push(Record {
            id: Some(serde_json::json!(WEATHER_BLOCK_ID)),
            val: Some(serde_json::json!(weather_table(NARROW_CELLS))),
        });
        let fields = extract(&records).unwrap();
        assert_eq!(fields.cells.len(), 20);
    }

    #[test]
    fn test_extract_without_weather_block() {
        let records: Vec<Record> = serde_json::from_value(serde_json::json!([
            {"id": TIMESTAMP_ID, "val": "As of <b>t</b>"},
            {"id": "#site-elp-ssb-system-Weather-tip", "val": "<table></table>"}
        ]))
        .unwrap();
        let err = extract(&records).unwrap_err();
        assert!(err.to_string().contains(WEATHER_BLOCK_ID));
    }

    #[test]
    fn test_extract_without_timestamp() {
        let records: Vec<Record> = serde_json::from_value(serde_json::json!([
            {"id": WEATHER_BLOCK_ID, "val": weather_table(WIDE_CELLS)}
        ]))
        .unwrap();
        let err = extract(&records).unwrap_err();
        assert!(err.to_string().contains(TIMESTAMP_ID));
    }
}
