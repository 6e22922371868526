//! Error types for the sensor monitor.
//!
//! This module defines a hierarchical error system:
//! - [`AppError`]: Top-level application errors
//! - [`IngestError`]: Sensor line acquisition and parsing errors
//! - [`TelemetryError`]: Telemetry forwarding errors
//! - [`NotifyError`]: Alert notification delivery errors
//! - [`ConfigError`]: Configuration errors
//!
//! The decision core itself is infallible; every error here originates in
//! a collaborator at the edge of the system.

use thiserror::Error;

/// Top-level application error.
#[derive(Debug, Error)]
pub enum AppError {
    /// Ingestion error.
    #[error("Ingestion error: {0}")]
    Ingest(#[from] IngestError),

    /// Telemetry error.
    #[error("Telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),

    /// Notification error.
    #[error("Notification error: {0}")]
    Notify(#[from] NotifyError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Sensor ingestion errors.
///
/// Malformed lines are rejected here and never reach the monitoring loop.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IngestError {
    /// Line did not split into the expected number of fields.
    #[error("Expected {expected} fields, found {found}")]
    WrongFieldCount {
        /// Number of fields required.
        expected: usize,
        /// Number of fields present.
        found: usize,
    },

    /// A field was not a number.
    #[error("Field {field} is not numeric: {value:?}")]
    NonNumeric {
        /// Channel name of the field.
        field: String,
        /// Raw field text.
        value: String,
    },

    /// A field parsed to NaN or infinity.
    #[error("Field {field} is not finite")]
    NonFinite {
        /// Channel name of the field.
        field: String,
    },

    /// The underlying transport failed.
    #[error("I/O error: {message}")]
    Io {
        /// Description of the failure.
        message: String,
    },

    /// The source reached end of stream.
    #[error("Sensor source closed")]
    Closed,
}

impl IngestError {
    /// Returns true if the error concerns a single bad line rather than
    /// the transport.
    #[must_use]
    pub const fn is_malformed_line(&self) -> bool {
        matches!(
            self,
            Self::WrongFieldCount { .. } | Self::NonNumeric { .. } | Self::NonFinite { .. }
        )
    }
}

/// Telemetry forwarding errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TelemetryError {
    /// Network communication error.
    #[error("Network error: {message}")]
    Network {
        /// Description of the network error.
        message: String,
    },

    /// The telemetry service refused a value.
    #[error("Feed {feed} rejected value with status {status}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Feed key that was written.
        feed: String,
    },
}

/// Notification delivery errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotifyError {
    /// Network communication error.
    #[error("Network error: {message}")]
    Network {
        /// Description of the network error.
        message: String,
    },

    /// The gateway refused the message.
    #[error("Gateway rejected message with status {status}: {body}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly truncated.
        body: String,
    },
}

/// Configuration errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Required configuration is missing.
    #[error("Missing required: {var}")]
    MissingRequired {
        /// The missing variable name.
        var: String,
    },

    /// Configuration value is invalid.
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue {
        /// The variable name.
        var: String,
        /// Why the value is invalid.
        reason: String,
    },
}
