//! Physical units and conversion between them.
//!
//! Every unit belongs to one [`Quantity`]. Conversion goes through the
//! quantity's base unit (kelvin, fraction, m/s, degree, pascal) and is refused
//! across quantities.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnitError;

/// Pascals per millimetre of mercury.
const PA_PER_MMHG: f64 = 133.322_387_415;
/// Pascals per inch of mercury.
const PA_PER_INHG: f64 = 3_386.388_666_6;
/// Pascals per standard atmosphere.
const PA_PER_ATM: f64 = 101_325.0;
const KNOT_IN_MS: f64 = 1_852.0 / 3_600.0;
const MILE_PER_HOUR_IN_MS: f64 = 0.447_04;

/// Physical dimension a unit measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantity {
    Temperature,
    Ratio,
    Speed,
    Angle,
    Pressure,
}

impl Quantity {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Temperature => "temperature",
            Self::Ratio => "ratio",
            Self::Speed => "speed",
            Self::Angle => "angle",
            Self::Pressure => "pressure",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    Celsius,
    Fahrenheit,
    Kelvin,
    Percent,
    Fraction,
    MetersPerSecond,
    KilometersPerHour,
    MilesPerHour,
    Knots,
    Degree,
    Radian,
    MillimetersOfMercury,
    Pascal,
    Hectopascal,
    InchesOfMercury,
    Atmosphere,
}

/// Units a temperature may be requested in.
pub const TEMPERATURE_UNITS: &[Unit] = &[Unit::Celsius, Unit::Fahrenheit, Unit::Kelvin];

/// Units a relative humidity may be requested in.
pub const HUMIDITY_UNITS: &[Unit] = &[Unit::Percent, Unit::Fraction];

impl Unit {
    pub fn quantity(&self) -> Quantity {
        match self {
            Self::Celsius | Self::Fahrenheit | Self::Kelvin => Quantity::Temperature,
            Self::Percent | Self::Fraction => Quantity::Ratio,
            Self::MetersPerSecond | Self::KilometersPerHour | Self::MilesPerHour | Self::Knots => {
                Quantity::Speed
            }
            Self::Degree | Self::Radian => Quantity::Angle,
            Self::MillimetersOfMercury
            | Self::Pascal
            | Self::Hectopascal
            | Self::InchesOfMercury
            | Self::Atmosphere => Quantity::Pressure,
        }
    }

    /// Short symbol, as written in header comments.
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Celsius => "degC",
            Self::Fahrenheit => "degF",
            Self::Kelvin => "K",
            Self::Percent => "%",
            Self::Fraction => "frac",
            Self::MetersPerSecond => "m/s",
            Self::KilometersPerHour => "km/h",
            Self::MilesPerHour => "mi/h",
            Self::Knots => "kn",
            Self::Degree => "deg",
            Self::Radian => "rad",
            Self::MillimetersOfMercury => "mmHg",
            Self::Pascal => "Pa",
            Self::Hectopascal => "hPa",
            Self::InchesOfMercury => "inHg",
            Self::Atmosphere => "atm",
        }
    }

    fn to_base(self, value: f64) -> f64 {
        match self {
            Self::Celsius => value + 273.15,
            Self::Fahrenheit => (value - 32.0) * 5.0 / 9.0 + 273.15,
            Self::Kelvin | Self::Fraction | Self::MetersPerSecond | Self::Degree | Self::Pascal => {
                value
            }
            Self::Percent => value / 100.0,
            Self::KilometersPerHour => value / 3.6,
            Self::MilesPerHour => value * MILE_PER_HOUR_IN_MS,
            Self::Knots => value * KNOT_IN_MS,
            Self::Radian => value.to_degrees(),
            Self::MillimetersOfMercury => value * PA_PER_MMHG,
            Self::Hectopascal => value * 100.0,
            Self::InchesOfMercury => value * PA_PER_INHG,
            Self::Atmosphere => value * PA_PER_ATM,
        }
    }

    fn from_base(self, value: f64) -> f64 {
        match self {
            Self::Celsius => value - 273.15,
            Self::Fahrenheit => (value - 273.15) * 9.0 / 5.0 + 32.0,
            Self::Kelvin | Self::Fraction | Self::MetersPerSecond | Self::Degree | Self::Pascal => {
                value
            }
            Self::Percent => value * 100.0,
            Self::KilometersPerHour => value * 3.6,
            Self::MilesPerHour => value / MILE_PER_HOUR_IN_MS,
            Self::Knots => value / KNOT_IN_MS,
            Self::Radian => value.to_radians(),
            Self::MillimetersOfMercury => value / PA_PER_MMHG,
            Self::Hectopascal => value / 100.0,
            Self::InchesOfMercury => value / PA_PER_INHG,
            Self::Atmosphere => value / PA_PER_ATM,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Unit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unit = match s.trim() {
            "degC" | "C" | "celsius" => Self::Celsius,
            "degF" | "F" | "fahrenheit" => Self::Fahrenheit,
            "K" | "kelvin" => Self::Kelvin,
            "%" | "pct" | "percent" => Self::Percent,
            "frac" | "fraction" => Self::Fraction,
            "m/s" => Self::MetersPerSecond,
            "km/h" => Self::KilometersPerHour,
            "mi/h" | "mph" => Self::MilesPerHour,
            "kn" | "kt" | "knots" => Self::Knots,
            "deg" | "degree" => Self::Degree,
            "rad" | "radian" => Self::Radian,
            "mmHg" => Self::MillimetersOfMercury,
            "Pa" => Self::Pascal,
            "hPa" | "mbar" => Self::Hectopascal,
            "inHg" => Self::InchesOfMercury,
            "atm" => Self::Atmosphere,
            other => return Err(format!("unknown unit: {}", other)),
        };
        Ok(unit)
    }
}

/// Convert `value` expressed in `from` into `to`.
///
/// Converting a unit to itself returns `value` untouched.
pub fn convert(value: f64, from: Unit, to: Unit) -> Result<f64, UnitError> {
    if from == to {
        return Ok(value);
    }
    if from.quantity() != to.quantity() {
        return Err(UnitError::Incompatible { from, to });
    }
    Ok(to.from_base(from.to_base(value)))
}
