//! Host services shared by the Telops weather station: configuration,
//! logging, error types and unit conversion.

pub mod config;
pub mod error;
pub mod units;

pub use config::{Config, StationConfig, ValidationResult};
pub use error::{NetworkError, ReqwestErrorExt, UnitError};
pub use units::{convert, Quantity, Unit, HUMIDITY_UNITS, TEMPERATURE_UNITS};

use anyhow::Result;

/// Initialize logging.
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Telops core initialized");
    Ok(())
}
