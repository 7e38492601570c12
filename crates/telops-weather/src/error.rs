//! Weather-station error types.

use telops_core::{NetworkError, Unit, UnitError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StationError {
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Conversion error: {0}")]
    Conversion(String),

    #[error("Operation not supported: {0}")]
    Unsupported(&'static str),

    #[error("Invalid {quantity} unit: {unit}")]
    InvalidUnit { quantity: &'static str, unit: Unit },

    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

impl StationError {
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    pub fn conversion(message: impl Into<String>) -> Self {
        Self::Conversion(message.into())
    }

    /// Whether this error belongs to a fetch cycle (absorbed by the gate)
    /// rather than to the caller's request.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::Parse(_) | Self::Conversion(_)
        )
    }

    /// User-friendly error message for display.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network(e) => e.user_message().to_string(),
            Self::Parse(_) => "The weather page changed shape; readings unavailable.".to_string(),
            Self::Conversion(_) => "The weather station reported an unreadable value.".to_string(),
            Self::Unsupported(what) => format!("This station does not report {}.", what),
            Self::InvalidUnit { quantity, unit } => {
                format!("{} is not a valid {} unit.", unit, quantity)
            }
            Self::InvalidEndpoint(_) => "The weather station address is invalid.".to_string(),
        }
    }
}

impl From<UnitError> for StationError {
    fn from(e: UnitError) -> Self {
        match e {
            UnitError::Incompatible { from, to } => Self::InvalidUnit {
                quantity: from.quantity().name(),
                unit: to,
            },
        }
    }
}
