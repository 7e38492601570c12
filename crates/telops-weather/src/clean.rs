//! Markup stripping and numeric parsing of scraped table cells.
//!
//! Cleaning is literal substring removal keyed on the field name. It only
//! understands the exact wrapper markup the telops page emits; other markup
//! passes through untouched.

use crate::compass;
use crate::error::StationError;
use crate::extract::ExtractedFields;
use crate::types::{Field, RawReading, SiteConditions};

/// Applied to every field, in order.
const GENERIC_RULES: &[(&str, &str)] = &[("<td><b>", ""), ("</b></td>", "")];

const INSOLATION_RULES: &[(&str, &str)] = &[
    ("<span style=\"color:red;", ""),
    ("</span>", ""),
    ("\">", ""),
];

const MOON_RULES: &[(&str, &str)] = &[
    ("<span>", ""),
    ("</span></td>", ""),
    ("class=", ""),
    ("<td \"moon", ""),
    ("\">", ""),
];

const TIME_RULES: &[(&str, &str)] = &[("As of <b>", ""), ("</b>", "")];

/// Field-specific rules, applied after [`GENERIC_RULES`].
fn field_rules(field: Field) -> &'static [(&'static str, &'static str)] {
    match field {
        Field::Insolation => INSOLATION_RULES,
        Field::Moon => MOON_RULES,
        Field::Time => TIME_RULES,
        _ => &[],
    }
}

/// Width in UTF-8 bytes of the unit suffix trailing each value ("°C" is 3).
const TEMPERATURE_SUFFIX: usize = 3;
const HUMIDITY_SUFFIX: usize = 1;
const PRESSURE_SUFFIX: usize = 4;
const WIND_SPEED_MARKER: &str = "m/s";

/// Strip the wrapper markup known for `field` from a raw fragment.
pub fn clean(field: Field, fragment: &str) -> String {
    GENERIC_RULES
        .iter()
        .chain(field_rules(field))
        .fold(fragment.to_string(), |text, (pattern, replacement)| {
            text.replace(pattern, replacement)
        })
}

fn drop_suffix(field: Field, text: &str, width: usize) -> Result<&str, StationError> {
    text.len()
        .checked_sub(width)
        .and_then(|end| text.get(..end))
        .ok_or_else(|| {
            StationError::conversion(format!(
                "{} has no {}-byte unit suffix: {:?}",
                field, width, text
            ))
        })
}

fn parse_number(field: Field, text: &str) -> Result<f64, StationError> {
    text.trim().parse::<f64>().map_err(|_| {
        StationError::conversion(format!("{} is not numeric: {:?}", field, text))
    })
}

fn parse_suffixed(field: Field, fragment: &str, suffix: usize) -> Result<f64, StationError> {
    let cleaned = clean(field, fragment);
    parse_number(field, drop_suffix(field, &cleaned, suffix)?)
}

/// Split a cleaned wind cell into speed and the compass code that follows it.
fn parse_wind(fragment: &str) -> Result<(f64, String), StationError> {
    let cleaned = clean(Field::Wind, fragment);
    let mut parts = cleaned.split(WIND_SPEED_MARKER);
    let speed = parts.next().unwrap_or_default();
    let direction = parts.next().ok_or_else(|| {
        StationError::conversion(format!("wind has no {} marker: {:?}", WIND_SPEED_MARKER, cleaned))
    })?;
    Ok((
        parse_number(Field::Wind, speed)?,
        direction.trim_start().to_string(),
    ))
}

/// Turn extracted fragments into a complete reading, or fail as a whole.
pub fn parse_reading(fields: &ExtractedFields) -> Result<RawReading, StationError> {
    let cells = &fields.cells;

    let temperature = parse_suffixed(
        Field::Temperature,
        cells.fragment(Field::Temperature)?,
        TEMPERATURE_SUFFIX,
    )?;
    let humidity = parse_suffixed(
        Field::Humidity,
        cells.fragment(Field::Humidity)?,
        HUMIDITY_SUFFIX,
    )?;
    let (wind_speed, wind_direction_raw) = parse_wind(cells.fragment(Field::Wind)?)?;
    let pressure = parse_suffixed(
        Field::Pressure,
        cells.fragment(Field::Pressure)?,
        PRESSURE_SUFFIX,
    )?;

    let wind_direction = compass::to_degrees(&wind_direction_raw);
    if wind_direction.is_none() {
        tracing::warn!("Unrecognized wind direction: {:?}", wind_direction_raw);
    }

    let text = |field: Field| -> Result<String, StationError> {
        Ok(clean(field, cells.fragment(field)?))
    };

    Ok(RawReading {
        observation_time: clean(Field::Time, &fields.observation_time),
        temperature,
        humidity,
        wind_speed,
        wind_direction_raw,
        wind_direction,
        pressure,
        conditions: SiteConditions {
            insolation: text(Field::Insolation)?,
            brightness: text(Field::Brightness)?,
            transparency: text(Field::Transparency)?,
            ok_to_open: text(Field::OkToOpen)?,
            interlock_reason: text(Field::InterlockReason)?,
            moon: text(Field::Moon)?,
        },
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    #[test]
    fn test_clean_time() {
        assert_eq!(
            clean(Field::Time, "As of <b>2024-01-01T00:00Z</b>"),
            "2024-01-01T00:00Z"
        );
    }

    #[test]
    fn test_clean_insolation() {
        assert_eq!(
            clean(Field::Insolation, "<td><b><span style=\"color:red;\">5</span>\">"),
            "5"
        );
        assert_eq!(
            clean(
                Field::Insolation,
                "<td><b><span style=\"color:red;\">512</span></b></td>"
            ),
            "512"
        );
    }

    #[test]
    fn test_clean_moon() {
        assert_eq!(
            clean(Field::Moon, "<td class=\"moon\"><span>Waxing 45%</span></td>"),
            "Waxing 45%"
        );
    }

    #[test]
    fn test_clean_generic_only_for_plain_fields() {
        assert_eq!(clean(Field::Temperature, "<td><b>12.3 °C</b></td>"), "12.3 °C");
        // Span markup is only understood for insolation and moon.
        assert_eq!(
            clean(Field::Brightness, "<td><b><span>Dark</span></b></td>"),
            "<span>Dark</span>"
        );
    }

    #[test]
    fn test_drop_suffix_counts_bytes() {
        assert_eq!(drop_suffix(Field::Temperature, "12.3°C", 3).unwrap(), "12.3");
        assert_eq!(drop_suffix(Field::Temperature, "12.3 °C", 3).unwrap(), "12.3 ");
        assert_eq!(drop_suffix(Field::Humidity, "45%", 1).unwrap(), "45");
        assert_eq!(drop_suffix(Field::Pressure, "mmHg", 4).unwrap(), "");
    }

    #[test]
    fn test_drop_suffix_too_short() {
        let err = drop_suffix(Field::Pressure, "ab", 4).unwrap_err();
        assert!(matches!(err, StationError::Conversion(_)));
    }

    #[test]
    fn test_drop_suffix_inside_a_character() {
        // Cutting 3 bytes off "12.°°" lands inside the first '°'.
        let err = drop_suffix(Field::Temperature, "12.°°", 3).unwrap_err();
        assert!(matches!(err, StationError::Conversion(_)));
    }

    #[test]
    fn test_parse_suffixed_temperature_with_and_without_space() {
        let tight =
            parse_suffixed(Field::Temperature, "<td><b>12.3°C</b></td>", TEMPERATURE_SUFFIX)
                .unwrap();
        assert_eq!(tight, 12.3);
        let spaced =
            parse_suffixed(Field::Temperature, "<td><b>12.3 °C</b></td>", TEMPERATURE_SUFFIX)
                .unwrap();
        assert_eq!(spaced, 12.3);
        let negative =
            parse_suffixed(Field::Temperature, "<td><b>-0.5°C</b></td>", TEMPERATURE_SUFFIX)
                .unwrap();
        assert_eq!(negative, -0.5);
    }

    #[test]
    fn test_parse_wind() {
        let (speed, direction) = parse_wind("<td><b>3.4 m/s NNE</b></td>").unwrap();
        assert_eq!(speed, 3.4);
        assert_eq!(direction, "NNE");
    }

    #[test]
    fn test_parse_wind_keeps_trailing_whitespace() {
        let (_, direction) = parse_wind("<td><b>3.4m/s  SW </b></td>").unwrap();
        assert_eq!(direction, "SW ");
        assert_eq!(compass::to_degrees(&direction), None);
    }

    #[test]
    fn test_parse_wind_without_marker() {
        let err = parse_wind("<td><b>calm</b></td>").unwrap_err();
        assert!(matches!(err, StationError::Conversion(_)));
    }

    #[test]
    fn test_parse_suffixed_rejects_text() {
        let err = parse_suffixed(Field::Humidity, "<td><b>n/a</b></td>", HUMIDITY_SUFFIX)
            .unwrap_err();
        assert!(matches!(err, StationError::Conversion(_)));
    }

    #[test]
    fn test_parse_suffixed_pressure() {
        let value =
            parse_suffixed(Field::Pressure, "<td><b>772.1 mmHg</b></td>", PRESSURE_SUFFIX).unwrap();
        assert_eq!(value, 772.1);
        let tight =
            parse_suffixed(Field::Pressure, "<td><b>772.1mmHg</b></td>", PRESSURE_SUFFIX).unwrap();
        assert_eq!(tight, 772.1);
    }
}
