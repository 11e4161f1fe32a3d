// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Protocol implementations for communicating with the LED controller.
//!
//! # Implementations
//!
//! - [`HttpClient`]: the real device, over HTTP with JSON bodies
//! - [`SimulatedDevice`]: an in-process stand-in serving the same four
//!   endpoints, for development without hardware
//! - [`DeviceLink`]: either of the above, selected at runtime
//!
//! Implementations hold no device state. Every call either succeeds or
//! fails with a [`ProtocolError`]; callers decide what a failure means.

#[cfg(feature = "http")]
mod http;
mod simulated;

#[cfg(feature = "http")]
pub use http::{HttpClient, HttpConfig};
pub use simulated::{Method, SimulatedDevice, SimulatedResponse, SimulatedState};

use std::future::Future;
use std::time::Duration;

use crate::command::Command;
use crate::error::ProtocolError;
use crate::state::DeviceSnapshot;

/// Default timeout for `GET /api/status`.
pub const DEFAULT_STATUS_TIMEOUT: Duration = Duration::from_millis(2000);

/// Default timeout for command requests.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_millis(2000);

/// Trait for protocol implementations that can talk to the LED controller.
pub trait Protocol: Send + Sync {
    /// Fetches the device-confirmed state from `GET /api/status`.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` on timeout, transport failure, non-success
    /// status, or an undecodable body.
    fn check_status(&self) -> impl Future<Output = Result<DeviceSnapshot, ProtocolError>> + Send;

    /// Sends a command as `POST /api/<endpoint>` with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError` on timeout, transport failure, or a
    /// non-success status.
    fn send_command(
        &self,
        command: &Command,
    ) -> impl Future<Output = Result<(), ProtocolError>> + Send;
}

/// A protocol chosen at runtime: the real device or the simulator.
#[derive(Debug, Clone)]
pub enum DeviceLink {
    /// HTTP connection to a physical controller.
    #[cfg(feature = "http")]
    Http(HttpClient),
    /// In-process simulated controller.
    Simulated(SimulatedDevice),
}

impl Protocol for DeviceLink {
    async fn check_status(&self) -> Result<DeviceSnapshot, ProtocolError> {
        match self {
            #[cfg(feature = "http")]
            Self::Http(client) => client.check_status().await,
            Self::Simulated(device) => device.check_status().await,
        }
    }

    async fn send_command(&self, command: &Command) -> Result<(), ProtocolError> {
        match self {
            #[cfg(feature = "http")]
            Self::Http(client) => client.send_command(command).await,
            Self::Simulated(device) => device.send_command(command).await,
        }
    }
}

/// Converts a duration to whole milliseconds for error reporting.
pub(crate) fn duration_ms(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
