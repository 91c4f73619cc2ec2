//! Error types for VRI handling and client operations

use crate::domain::error_report::ErrorReport;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Boxed transport cause carried by connection failures
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failures surfaced by this crate. None of them are retried internally.
#[derive(Error, Debug)]
pub enum ClientError {
    // Malformed input
    /// Input string is not a valid URI
    #[error("'{uri}' is not a valid URI: {reason}")]
    InvalidUri { uri: String, reason: String },

    /// Bad header names or values, unsupported schemes and similar
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    // Transport
    /// Connection could not be established or the transfer broke off
    #[error("Communication error with {address}")]
    Connection {
        address: String,
        #[source]
        source: Option<BoxError>,
    },

    /// The client has been closed and cannot issue another request
    #[error("Client for {address} is closed")]
    Closed { address: String },

    // Remote service
    /// 401 from the remote service
    #[error("Unauthorized access to {address}{}", describe(.report))]
    Unauthorized {
        address: String,
        report: Option<ErrorReport>,
    },

    /// 403 from the remote service
    #[error("Access to {address} is forbidden{}", describe(.report))]
    Forbidden {
        address: String,
        report: Option<ErrorReport>,
    },

    /// 404 from the remote service
    #[error("Resource {address} not found{}", describe(.report))]
    NotFound {
        address: String,
        report: Option<ErrorReport>,
    },

    /// Any other remote failure, including unusable response content
    #[error("Remote service error at {address} (status {status}): {message}{}", describe(.report))]
    RemoteService {
        address: String,
        status: u16,
        message: String,
        report: Option<ErrorReport>,
    },

    // Representation
    /// Response body does not parse as the expected representation
    #[error("Bad request: representation not parseable: {0}")]
    BadRequest(String),

    // Configuration
    /// Configuration file could not be loaded
    #[error("Failed to load config from {}: {reason}", .path.display())]
    Config { path: PathBuf, reason: String },
}

fn describe(report: &Option<ErrorReport>) -> String {
    report
        .as_ref()
        .map(|r| format!(" - {}", r))
        .unwrap_or_default()
}

impl ClientError {
    /// Build a connection failure for `address` with an underlying cause
    pub fn connection(address: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Connection {
            address: address.into(),
            source: Some(source.into()),
        }
    }

    /// Classify a non-success HTTP status into the matching remote kind
    pub fn from_status(status: u16, address: impl Into<String>, report: Option<ErrorReport>) -> Self {
        let address = address.into();
        match status {
            401 => Self::Unauthorized { address, report },
            403 => Self::Forbidden { address, report },
            404 => Self::NotFound { address, report },
            _ => {
                let message = report
                    .as_ref()
                    .and_then(|r| r.message.clone())
                    .unwrap_or_else(|| "unexpected response status".to_string());
                Self::RemoteService {
                    address,
                    status,
                    message,
                    report,
                }
            }
        }
    }

    /// Remote error report attached to this failure, if any
    pub fn report(&self) -> Option<&ErrorReport> {
        match self {
            Self::Unauthorized { report, .. }
            | Self::Forbidden { report, .. }
            | Self::NotFound { report, .. }
            | Self::RemoteService { report, .. } => report.as_ref(),
            _ => None,
        }
    }

    /// HTTP status behind a remote failure
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::Forbidden { .. } => Some(403),
            Self::NotFound { .. } => Some(404),
            Self::RemoteService { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether this failure came from the remote service rather than from
    /// local input or transport
    pub fn is_remote(&self) -> bool {
        self.status().is_some()
    }
}
