// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `led_panel` library.
//!
//! Network failures are modeled in detail by [`ProtocolError`] so they can be
//! logged, but the panel state model reacts to all of them the same way: the
//! connection is marked as lost. [`FailureKind`] gives the coarse category.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Error occurred during protocol communication.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Error occurred while parsing a payload or configuration value.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}

/// Errors related to value validation and constraints.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A numeric value is outside the allowed range.
    #[error("value {actual} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Minimum allowed value.
        min: u32,
        /// Maximum allowed value.
        max: u32,
        /// The actual value that was provided.
        actual: u32,
    },

    /// An invalid hex color string was provided.
    #[error("invalid hex color: {0}")]
    InvalidHexColor(String),

    /// No preset exists with the given name.
    #[error("unknown preset: {0}")]
    UnknownPreset(String),

    /// No command endpoint exists with the given name.
    #[error("unknown endpoint: {0}")]
    UnknownEndpoint(String),
}

/// Coarse category of a [`ProtocolError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The request did not complete within its timeout.
    Timeout,
    /// The device could not be reached (refused, unreachable, reset).
    Transport,
    /// The device answered with a non-success HTTP status.
    HttpStatus,
    /// The device answered successfully but the body could not be decoded.
    Malformed,
}

/// Errors related to communication with the device.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// HTTP request failed at the transport level.
    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Request timed out.
    #[error("request timed out after {0} ms")]
    Timeout(u64),

    /// The device responded with a non-success status.
    #[error("HTTP {status} - {reason}")]
    HttpStatus {
        /// Numeric status code.
        status: u16,
        /// Canonical reason phrase, or `Unknown`.
        reason: String,
    },

    /// Connection to the device failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The response body could not be decoded.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Invalid URL or address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

impl ProtocolError {
    /// Returns the coarse failure category of this error.
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            #[cfg(feature = "http")]
            Self::Http(err) if err.is_timeout() => FailureKind::Timeout,
            #[cfg(feature = "http")]
            Self::Http(err) if err.is_decode() => FailureKind::Malformed,
            #[cfg(feature = "http")]
            Self::Http(err) if err.is_status() => FailureKind::HttpStatus,
            #[cfg(feature = "http")]
            Self::Http(_) => FailureKind::Transport,
            Self::Timeout(_) => FailureKind::Timeout,
            Self::HttpStatus { .. } => FailureKind::HttpStatus,
            Self::ConnectionFailed(_) | Self::InvalidAddress(_) => FailureKind::Transport,
            Self::MalformedResponse(_) => FailureKind::Malformed,
        }
    }

    /// Builds an [`ProtocolError::HttpStatus`] from a numeric status code.
    #[must_use]
    pub fn http_status(status: u16, reason: Option<&str>) -> Self {
        Self::HttpStatus {
            status,
            reason: reason.unwrap_or("Unknown").to_string(),
        }
    }
}

/// Errors related to parsing payloads and configuration values.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to parse a specific value.
    #[error("failed to parse {field}: {message}")]
    InvalidValue {
        /// The field that failed to parse.
        field: String,
        /// Description of the parsing failure.
        message: String,
    },
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_error_display() {
        let err = ValueError::OutOfRange {
            min: 0,
            max: 255,
            actual: 300,
        };
        assert_eq!(err.to_string(), "value 300 is out of range [0, 255]");
    }

    #[test]
    fn error_from_value_error() {
        let err: Error = ValueError::UnknownPreset("Teal".to_string()).into();
        assert!(matches!(err, Error::Value(ValueError::UnknownPreset(_))));
    }

    #[test]
    fn http_status_display() {
        let err = ProtocolError::http_status(503, Some("Service Unavailable"));
        assert_eq!(err.to_string(), "HTTP 503 - Service Unavailable");

        let err = ProtocolError::http_status(599, None);
        assert_eq!(err.to_string(), "HTTP 599 - Unknown");
    }

    #[test]
    fn failure_kinds() {
        assert_eq!(ProtocolError::Timeout(2000).kind(), FailureKind::Timeout);
        assert_eq!(
            ProtocolError::http_status(500, None).kind(),
            FailureKind::HttpStatus
        );
        assert_eq!(
            ProtocolError::ConnectionFailed("refused".to_string()).kind(),
            FailureKind::Transport
        );
        assert_eq!(
            ProtocolError::MalformedResponse("eof".to_string()).kind(),
            FailureKind::Malformed
        );
    }

    #[test]
    fn timeout_display() {
        assert_eq!(
            ProtocolError::Timeout(2000).to_string(),
            "request timed out after 2000 ms"
        );
    }
}
