// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-process simulated LED controller.
//!
//! [`SimulatedDevice`] routes requests through the same four endpoints and
//! JSON bodies as the firmware, after an artificial delay. Its state lives
//! in a [`SimulatedState`] handle that the harness creates and keeps, so a
//! test can inspect or perturb the device while a panel talks to it.
//!
//! # Examples
//!
//! ```
//! use led_panel::command::Command;
//! use led_panel::protocol::{Protocol, SimulatedDevice, SimulatedState};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let state = SimulatedState::new();
//! let device = SimulatedDevice::new(state.clone());
//!
//! device.send_command(&Command::SetPower(false)).await.unwrap();
//! assert!(!state.snapshot().power);
//!
//! state.set_reachable(false);
//! assert!(device.check_status().await.is_err());
//! # }
//! ```

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::command::{Command, Endpoint, STATUS_PATH};
use crate::error::ProtocolError;
use crate::protocol::{DEFAULT_COMMAND_TIMEOUT, DEFAULT_STATUS_TIMEOUT, Protocol, duration_ms};
use crate::state::{DeviceSnapshot, DeviceState};

/// HTTP method understood by the simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// `GET`
    Get,
    /// `POST`
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Get => "GET",
            Self::Post => "POST",
        })
    }
}

/// A response produced by the simulator's router.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatedResponse {
    /// HTTP status code.
    pub status: u16,
    /// JSON response body.
    pub body: String,
}

impl SimulatedResponse {
    fn json(status: u16, body: &serde_json::Value) -> Self {
        Self {
            status,
            body: body.to_string(),
        }
    }

    fn ok() -> Self {
        Self::json(200, &serde_json::json!({ "status": "ok" }))
    }

    fn error(status: u16, message: &str) -> Self {
        Self::json(status, &serde_json::json!({ "error": message }))
    }

    /// Returns true for a 2xx status.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug)]
struct Inner {
    device: DeviceSnapshot,
    reachable: bool,
    forced_status: Option<u16>,
    status_requests: usize,
    command_requests: usize,
}

/// Shared, injectable state of a simulated controller.
///
/// Cloning yields another handle to the same device.
#[derive(Debug, Clone)]
pub struct SimulatedState {
    inner: Arc<Mutex<Inner>>,
}

impl SimulatedState {
    /// Creates a reachable device in its boot state.
    #[must_use]
    pub fn new() -> Self {
        Self::with_snapshot(DeviceState::new().into())
    }

    /// Creates a reachable device reporting the given state.
    #[must_use]
    pub fn with_snapshot(device: DeviceSnapshot) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                device,
                reachable: true,
                forced_status: None,
                status_requests: 0,
                command_requests: 0,
            })),
        }
    }

    /// Returns the current device state.
    #[must_use]
    pub fn snapshot(&self) -> DeviceSnapshot {
        self.inner.lock().device
    }

    /// Replaces the device state, as if changed by a physical button.
    pub fn set_snapshot(&self, device: DeviceSnapshot) {
        self.inner.lock().device = device;
    }

    /// Makes every request fail at the transport level when `false`.
    pub fn set_reachable(&self, reachable: bool) {
        self.inner.lock().reachable = reachable;
    }

    /// Answers every request with the given error status instead of
    /// routing it.
    ///
    /// A 2xx status, or `None`, leaves routing as normal.
    pub fn force_status(&self, status: Option<u16>) {
        self.inner.lock().forced_status = status;
    }

    /// Number of `GET /api/status` attempts seen so far.
    #[must_use]
    pub fn status_requests(&self) -> usize {
        self.inner.lock().status_requests
    }

    /// Number of command attempts seen so far.
    #[must_use]
    pub fn command_requests(&self) -> usize {
        self.inner.lock().command_requests
    }
}

impl Default for SimulatedState {
    fn default() -> Self {
        Self::new()
    }
}

/// In-process stand-in for the LED controller.
#[derive(Debug, Clone)]
pub struct SimulatedDevice {
    state: SimulatedState,
    status_delay: Duration,
    command_delay: Duration,
    status_timeout: Duration,
    command_timeout: Duration,
}

impl SimulatedDevice {
    /// Delay before answering a status request.
    pub const DEFAULT_STATUS_DELAY: Duration = Duration::from_millis(50);
    /// Delay before answering a command.
    pub const DEFAULT_COMMAND_DELAY: Duration = Duration::from_millis(100);

    /// Creates a simulated device backed by the given state handle.
    #[must_use]
    pub fn new(state: SimulatedState) -> Self {
        Self {
            state,
            status_delay: Self::DEFAULT_STATUS_DELAY,
            command_delay: Self::DEFAULT_COMMAND_DELAY,
            status_timeout: DEFAULT_STATUS_TIMEOUT,
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }

    /// Sets the artificial response delays.
    #[must_use]
    pub fn with_delays(mut self, status: Duration, command: Duration) -> Self {
        self.status_delay = status;
        self.command_delay = command;
        self
    }

    /// Sets the client-side timeouts applied when used as a [`Protocol`].
    #[must_use]
    pub fn with_timeouts(mut self, status: Duration, command: Duration) -> Self {
        self.status_timeout = status;
        self.command_timeout = command;
        self
    }

    /// Returns the state handle.
    #[must_use]
    pub fn state(&self) -> &SimulatedState {
        &self.state
    }

    /// Routes one request, as the firmware's web server would.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::ConnectionFailed` when the device is set
    /// unreachable.
    pub async fn handle(
        &self,
        method: Method,
        path: &str,
        body: &[u8],
    ) -> Result<SimulatedResponse, ProtocolError> {
        let is_status = method == Method::Get && path == STATUS_PATH;
        let delay = if is_status {
            self.status_delay
        } else {
            self.command_delay
        };

        {
            let mut inner = self.state.inner.lock();
            if is_status {
                inner.status_requests += 1;
            } else {
                inner.command_requests += 1;
            }
        }

        tokio::time::sleep(delay).await;

        let mut inner = self.state.inner.lock();

        if !inner.reachable {
            return Err(ProtocolError::ConnectionFailed(
                "simulated device unreachable".to_string(),
            ));
        }

        if let Some(status) = inner
            .forced_status
            .filter(|status| !(200..300).contains(status))
        {
            tracing::debug!(%method, path, status, "[simulated] forced response");
            return Ok(SimulatedResponse::error(status, "forced failure"));
        }

        let response = match (method, path) {
            (Method::Get, STATUS_PATH) => match serde_json::to_value(inner.device) {
                Ok(json) => SimulatedResponse::json(200, &json),
                Err(_) => SimulatedResponse::error(500, "Serialization failed"),
            },
            (Method::Post, _) => match Endpoint::from_path(path) {
                Some(endpoint) => route_command(&mut inner.device, endpoint, body),
                None => SimulatedResponse::error(404, "Not found"),
            },
            _ => SimulatedResponse::error(404, "Not found"),
        };

        tracing::debug!(%method, path, status = response.status, "[simulated] request handled");

        Ok(response)
    }

    async fn with_timeout<T>(
        timeout: Duration,
        fut: impl Future<Output = Result<T, ProtocolError>>,
    ) -> Result<T, ProtocolError> {
        tokio::time::timeout(timeout, fut)
            .await
            .map_err(|_| ProtocolError::Timeout(duration_ms(timeout)))?
    }
}

fn route_command(device: &mut DeviceSnapshot, endpoint: Endpoint, body: &[u8]) -> SimulatedResponse {
    if serde_json::from_slice::<serde_json::Value>(body).is_err() {
        return SimulatedResponse::error(400, "Invalid JSON");
    }

    match Command::from_body(endpoint, body) {
        Ok(command) => {
            let mut state = DeviceState::from(*device);
            state.apply(&command);
            *device = state.into();
            SimulatedResponse::ok()
        }
        Err(_) => SimulatedResponse::error(400, missing_field_message(endpoint)),
    }
}

fn missing_field_message(endpoint: Endpoint) -> &'static str {
    match endpoint {
        Endpoint::Power => "Missing state",
        Endpoint::Color => "Missing r, g, or b",
        Endpoint::Brightness => "Missing value",
    }
}

impl Protocol for SimulatedDevice {
    async fn check_status(&self) -> Result<DeviceSnapshot, ProtocolError> {
        Self::with_timeout(self.status_timeout, async {
            let response = self.handle(Method::Get, STATUS_PATH, &[]).await?;
            if !response.is_success() {
                return Err(ProtocolError::http_status(response.status, None));
            }
            serde_json::from_str(&response.body)
                .map_err(|e| ProtocolError::MalformedResponse(e.to_string()))
        })
        .await
    }

    async fn send_command(&self, command: &Command) -> Result<(), ProtocolError> {
        let body = command.body().to_string();
        Self::with_timeout(self.command_timeout, async {
            let response = self
                .handle(Method::Post, command.endpoint().path(), body.as_bytes())
                .await?;
            if response.is_success() {
                Ok(())
            } else {
                Err(ProtocolError::http_status(response.status, None))
            }
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;
    use crate::types::{Brightness, RgbColor};

    fn device() -> (SimulatedState, SimulatedDevice) {
        let state = SimulatedState::new();
        let device = SimulatedDevice::new(state.clone());
        (state, device)
    }

    #[tokio::test(start_paused = true)]
    async fn status_reports_boot_state() {
        let (_, device) = device();
        let response = device.handle(Method::Get, STATUS_PATH, &[]).await.unwrap();

        assert_eq!(response.status, 200);
        let json: serde_json::Value = serde_json::from_str(&response.body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"r": 255, "g": 255, "b": 255, "brightness": 128, "power": true})
        );
    }

    #[tokio::test(start_paused = true)]
    async fn commands_update_shared_state() {
        let (state, device) = device();

        device
            .send_command(&Command::SetColor(RgbColor::new(1, 2, 3)))
            .await
            .unwrap();
        device
            .send_command(&Command::SetBrightness(Brightness::new(9)))
            .await
            .unwrap();

        let snapshot = state.snapshot();
        assert_eq!((snapshot.r, snapshot.g, snapshot.b), (1, 2, 3));
        assert_eq!(snapshot.brightness, 9);
        assert_eq!(state.command_requests(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_json_is_rejected() {
        let (_, device) = device();
        let response = device
            .handle(Method::Post, "/api/power", b"{not json")
            .await
            .unwrap();
        assert_eq!(response.status, 400);
        assert!(response.body.contains("Invalid JSON"));
    }

    #[tokio::test(start_paused = true)]
    async fn missing_fields_are_rejected() {
        let (state, device) = device();
        let response = device
            .handle(Method::Post, "/api/color", br#"{"r": 1}"#)
            .await
            .unwrap();
        assert_eq!(response.status, 400);
        assert!(response.body.contains("Missing r, g, or b"));
        assert_eq!(state.snapshot(), DeviceSnapshot::default());
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_routes_are_not_found() {
        let (_, device) = device();
        let response = device.handle(Method::Post, "/api/status", b"{}").await.unwrap();
        assert_eq!(response.status, 404);
        let response = device.handle(Method::Get, "/api/power", &[]).await.unwrap();
        assert_eq!(response.status, 404);
    }

    #[tokio::test(start_paused = true)]
    async fn unreachable_device_fails_transport() {
        let (state, device) = device();
        state.set_reachable(false);

        let err = device.check_status().await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::Transport);
        assert_eq!(state.status_requests(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn forced_status_fails_with_http_status() {
        let (state, device) = device();
        state.force_status(Some(503));

        let err = device.send_command(&Command::SetPower(true)).await.unwrap_err();
        assert!(matches!(err, ProtocolError::HttpStatus { status: 503, .. }));

        state.force_status(None);
        assert!(device.send_command(&Command::SetPower(true)).await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn forced_success_status_routes_normally() {
        let (state, device) = device();
        state.force_status(Some(200));

        let snapshot = device.check_status().await.unwrap();
        assert_eq!(snapshot, DeviceSnapshot::from(DeviceState::new()));

        device.send_command(&Command::SetPower(false)).await.unwrap();
        assert!(!state.snapshot().power);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_device_times_out() {
        let (_, device) = device();
        let device = device.with_delays(Duration::from_secs(5), Duration::from_secs(5));

        let err = device.check_status().await.unwrap_err();
        assert!(matches!(err, ProtocolError::Timeout(2000)));
        assert_eq!(err.kind(), FailureKind::Timeout);

        let err = device.send_command(&Command::SetPower(true)).await.unwrap_err();
        assert!(matches!(err, ProtocolError::Timeout(2000)));
    }
}
