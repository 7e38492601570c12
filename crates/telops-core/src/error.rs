//! Shared error types for the Telops weather workspace.
//!
//! Station-specific failures live in `telops-weather`; this module holds the
//! pieces every crate needs:
//! - network failures with user-facing messages
//! - unit conversion failures raised by [`crate::units`]

use thiserror::Error;

use crate::units::Unit;

/// Network-related errors (HTTP, connectivity, malformed responses).
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl NetworkError {
    pub fn user_message(&self) -> &'static str {
        match self {
            NetworkError::ConnectionFailed(_) => {
                "Unable to reach the weather station. Check the network connection."
            }
            NetworkError::Timeout => "The weather station did not answer in time.",
            NetworkError::ServerError { status, .. } if *status >= 500 => {
                "The weather station server is having trouble. Try again later."
            }
            NetworkError::ServerError { .. } => "The weather station rejected the request.",
            NetworkError::InvalidResponse(_) => {
                "The weather station sent an unexpected response."
            }
        }
    }
}

/// Unit conversion errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UnitError {
    #[error("Cannot convert {from} to {to}")]
    Incompatible { from: Unit, to: Unit },
}

/// Extension trait for converting reqwest errors to our error types.
pub trait ReqwestErrorExt {
    fn into_network_error(self) -> NetworkError;
}

impl ReqwestErrorExt for reqwest::Error {
    fn into_network_error(self) -> NetworkError {
        if self.is_timeout() {
            NetworkError::Timeout
        } else if self.is_connect() {
            NetworkError::ConnectionFailed(self.to_string())
        } else if let Some(status) = self.status() {
            NetworkError::ServerError {
                status: status.as_u16(),
                message: self.to_string(),
            }
        } else if self.is_decode() || self.is_body() {
            NetworkError::InvalidResponse(self.to_string())
        } else {
            NetworkError::ConnectionFailed(self.to_string())
        }
    }
}
