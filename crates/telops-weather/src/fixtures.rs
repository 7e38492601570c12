//! Captured-shape telops markup for tests.

use crate::extract::{TIMESTAMP_ID, WEATHER_BLOCK_ID};
use crate::types::Record;

/// Table with an interlock reason and a moon cell.
pub const WIDE_CELLS: &[&str] = &[
    "<td>Temperature</td>",
    "<td><b>12.3 °C</b></td>",
    "<td>Dew point</td>",
    "<td><b>4.1 °C</b></td>",
    "<td>Pressure</td>",
    "<td><b>772.1 mmHg</b></td>",
    "<td>Humidity</td>",
    "<td><b>45.0%</b></td>",
    "<td>Wind</td>",
    "<td><b>3.4 m/s NNE</b></td>",
    "<td>Insolation</td>",
    "<td><b><span style=\"color:red;\">512</span></b></td>",
    "<td>Brightness</td>",
    "<td><b>Dark</b></td>",
    "<td>Transparency</td>",
    "<td><b>Clear</b></td>",
    "<td>OK to open</td>",
    "<td><b>No</b></td>",
    "<td>Interlock</td>",
    "<td><b>Rain</b></td>",
    "<td>Moon</td>",
    "<td class=\"moon\"><span>Waxing 45%</span></td>",
];

/// Table without an interlock row: the moon cell moves to index 19.
pub const NARROW_CELLS: &[&str] = &[
    "<td>Temperature</td>",
    "<td><b>-2.0°C</b></td>",
    "<td>Dew point</td>",
    "<td><b>-9.5 °C</b></td>",
    "<td>Pressure</td>",
    "<td><b>770.0mmHg</b></td>",
    "<td>Humidity</td>",
    "<td><b>80%</b></td>",
    "<td>Wind</td>",
    "<td><b>10.0m/s WSW</b></td>",
    "<td>Insolation</td>",
    "<td><b><span style=\"color:red;\">0</span></b></td>",
    "<td>Brightness</td>",
    "<td><b>Dark</b></td>",
    "<td>Transparency</td>",
    "<td><b>Cloudy</b></td>",
    "<td>OK to open</td>",
    "<td><b>Yes</b></td>",
    "<td>Moon</td>",
    "<td class=\"moon\"><span>Full</span></td>",
];

pub fn weather_table(cells: &[&str]) -> String {
    let rows: Vec<String> = cells
        .chunks(2)
        .map(|row| format!("<tr>{}</tr>", row.concat()))
        .collect();
    format!("<table class=\"weather\">{}</table>", rows.concat())
}

/// Refresh payload holding `table` and `time` among unrelated records.
pub fn payload(table: &str, time: &str) -> Vec<Record> {
    vec![
        Record {
            id: Some(serde_json::json!("#site-lsc-doma-status")),
            val: Some(serde_json::json!("<span>open</span>")),
        },
        Record {
            id: Some(serde_json::json!(WEATHER_BLOCK_ID)),
            val: Some(serde_json::json!(table)),
        },
        Record::default(),
        Record {
            id: Some(serde_json::json!(TIMESTAMP_ID)),
            val: Some(serde_json::json!(time)),
        },
    ]
}
