//! LCOGT telops weather station.
//!
//! Scrapes the current readings off the telops status page, parses them out
//! of the embedded weather table, and serves them in any requested unit
//! behind a minimum re-fetch interval.

pub mod clean;
pub mod client;
pub mod compass;
pub mod error;
pub mod extract;
pub mod station;
pub mod types;

#[cfg(test)]
mod fixtures;

pub use client::{ReadingSource, TelopsClient};
pub use error::StationError;
pub use station::{Reading, WeatherStation};
pub use types::*;
