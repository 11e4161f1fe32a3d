// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP protocol implementation for the LED controller.

use std::time::Duration;

use reqwest::{Client, Response};

use crate::command::{Command, STATUS_PATH};
use crate::error::ProtocolError;
use crate::protocol::{DEFAULT_COMMAND_TIMEOUT, DEFAULT_STATUS_TIMEOUT, Protocol, duration_ms};
use crate::state::DeviceSnapshot;

// ============================================================================
// HttpConfig - Connection parameters
// ============================================================================

/// Configuration for an HTTP connection to the controller.
///
/// The controller runs its own Wi-Fi access point, so the default host is
/// the access point's address.
///
/// # Examples
///
/// ```
/// use led_panel::protocol::HttpConfig;
/// use std::time::Duration;
///
/// // Defaults: 192.168.4.1:80, 2 s timeouts
/// let config = HttpConfig::default();
/// assert_eq!(config.base_url(), "http://192.168.4.1");
///
/// let config = HttpConfig::new("10.0.0.7")
///     .with_port(8080)
///     .with_status_timeout(Duration::from_millis(500))
///     .with_command_timeout(Duration::from_secs(5));
/// assert_eq!(config.base_url(), "http://10.0.0.7:8080");
/// ```
#[derive(Debug, Clone)]
pub struct HttpConfig {
    host: String,
    port: u16,
    status_timeout: Duration,
    command_timeout: Duration,
}

impl HttpConfig {
    /// Address of the controller in access-point mode.
    pub const DEFAULT_HOST: &'static str = "192.168.4.1";
    /// Default HTTP port.
    pub const DEFAULT_PORT: u16 = 80;

    /// Creates a new HTTP configuration for the specified host.
    ///
    /// The host may carry an explicit `http://` or `https://` scheme and a
    /// `:port` suffix.
    #[must_use]
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: Self::DEFAULT_PORT,
            status_timeout: DEFAULT_STATUS_TIMEOUT,
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }

    /// Sets a custom port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the timeout for status polls.
    #[must_use]
    pub fn with_status_timeout(mut self, timeout: Duration) -> Self {
        self.status_timeout = timeout;
        self
    }

    /// Sets the timeout for command requests.
    #[must_use]
    pub fn with_command_timeout(mut self, timeout: Duration) -> Self {
        self.command_timeout = timeout;
        self
    }

    /// Returns the host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the port.
    #[must_use]
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns the status poll timeout.
    #[must_use]
    pub fn status_timeout(&self) -> Duration {
        self.status_timeout
    }

    /// Returns the command timeout.
    #[must_use]
    pub fn command_timeout(&self) -> Duration {
        self.command_timeout
    }

    /// Builds the base URL from this configuration.
    ///
    /// A non-default port replaces any port written into the host.
    #[must_use]
    pub fn base_url(&self) -> String {
        let host = self.host.trim().trim_end_matches('/');
        let (scheme, authority) = ["http://", "https://"]
            .into_iter()
            .find_map(|scheme| host.strip_prefix(scheme).map(|rest| (scheme, rest)))
            .unwrap_or(("http://", host));

        if self.port == Self::DEFAULT_PORT {
            format!("{scheme}{authority}")
        } else {
            format!("{scheme}{}:{}", strip_port(authority), self.port)
        }
    }

    /// Creates an `HttpClient` from this configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the host is empty or the HTTP client cannot be
    /// created.
    pub fn into_client(self) -> Result<HttpClient, ProtocolError> {
        if self.host.trim().is_empty() {
            return Err(ProtocolError::InvalidAddress("host is required".to_string()));
        }

        let client = Client::builder().build().map_err(ProtocolError::Http)?;

        Ok(HttpClient {
            base_url: self.base_url(),
            client,
            status_timeout: self.status_timeout,
            command_timeout: self.command_timeout,
        })
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_HOST)
    }
}

// ============================================================================
// HttpClient
// ============================================================================

/// HTTP client for the LED controller's `/api` endpoints.
///
/// Every request carries its own timeout; there is no client-wide one.
///
/// # Examples
///
/// ```no_run
/// use led_panel::command::Command;
/// use led_panel::protocol::{HttpClient, Protocol};
///
/// # async fn example() -> led_panel::Result<()> {
/// let client = HttpClient::new("192.168.4.1")?;
/// client.send_command(&Command::SetPower(true)).await?;
/// let snapshot = client.check_status().await?;
/// println!("power: {}", snapshot.power);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    base_url: String,
    client: Client,
    status_timeout: Duration,
    command_timeout: Duration,
}

impl HttpClient {
    /// Creates a new HTTP client for the specified host with default timeouts.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn new(host: impl Into<String>) -> Result<Self, ProtocolError> {
        HttpConfig::new(host).into_client()
    }

    /// Returns the base URL of the device.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

/// Removes a trailing `:port` from an authority, leaving IPv6 literals intact.
fn strip_port(authority: &str) -> &str {
    match authority.rsplit_once(':') {
        Some((host, port))
            if !port.is_empty()
                && port.bytes().all(|b| b.is_ascii_digit())
                && (!host.contains(':') || host.ends_with(']')) =>
        {
            host
        }
        _ => authority,
    }
}

/// Maps a reqwest failure, turning timeouts into [`ProtocolError::Timeout`].
fn map_send_error(err: reqwest::Error, timeout: Duration) -> ProtocolError {
    if err.is_timeout() {
        ProtocolError::Timeout(duration_ms(timeout))
    } else {
        ProtocolError::Http(err)
    }
}

fn ensure_success(response: &Response) -> Result<(), ProtocolError> {
    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(ProtocolError::http_status(
            status.as_u16(),
            status.canonical_reason(),
        ))
    }
}

impl Protocol for HttpClient {
    async fn check_status(&self) -> Result<DeviceSnapshot, ProtocolError> {
        let url = self.url(STATUS_PATH);

        tracing::debug!(url = %url, "Polling device status");

        let response = self
            .client
            .get(&url)
            .timeout(self.status_timeout)
            .send()
            .await
            .map_err(|e| map_send_error(e, self.status_timeout))?;

        ensure_success(&response)?;

        let body = response
            .text()
            .await
            .map_err(|e| map_send_error(e, self.status_timeout))?;

        tracing::debug!(body = %body, "Received status response");

        serde_json::from_str(&body).map_err(|e| ProtocolError::MalformedResponse(e.to_string()))
    }

    async fn send_command(&self, command: &Command) -> Result<(), ProtocolError> {
        let url = self.url(command.endpoint().path());
        let body = command.body();

        tracing::debug!(url = %url, body = %body, "Sending command");

        let response = self
            .client
            .post(&url)
            .timeout(self.command_timeout)
            .json(&body)
            .send()
            .await
            .map_err(|e| map_send_error(e, self.command_timeout))?;

        ensure_success(&response)?;

        tracing::debug!(status = response.status().as_u16(), "Command accepted");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_config_default_values() {
        let config = HttpConfig::default();
        assert_eq!(config.host(), "192.168.4.1");
        assert_eq!(config.port(), 80);
        assert_eq!(config.status_timeout(), Duration::from_millis(2000));
        assert_eq!(config.command_timeout(), Duration::from_millis(2000));
    }

    #[test]
    fn http_config_with_timeouts() {
        let config = HttpConfig::new("10.0.0.2")
            .with_status_timeout(Duration::from_millis(250))
            .with_command_timeout(Duration::from_secs(4));
        assert_eq!(config.status_timeout(), Duration::from_millis(250));
        assert_eq!(config.command_timeout(), Duration::from_secs(4));
    }

    #[test]
    fn http_config_base_url() {
        assert_eq!(HttpConfig::new("192.168.4.1").base_url(), "http://192.168.4.1");
        assert_eq!(
            HttpConfig::new("192.168.4.1").with_port(8080).base_url(),
            "http://192.168.4.1:8080"
        );
        assert_eq!(
            HttpConfig::new("http://127.0.0.1:4000/").base_url(),
            "http://127.0.0.1:4000"
        );
        assert_eq!(
            HttpConfig::new("https://lights.local").base_url(),
            "https://lights.local"
        );
    }

    #[test]
    fn explicit_port_replaces_port_in_host() {
        assert_eq!(
            HttpConfig::new("10.0.0.5:4000").with_port(8080).base_url(),
            "http://10.0.0.5:8080"
        );
        assert_eq!(
            HttpConfig::new("http://10.0.0.5:4000/").with_port(8080).base_url(),
            "http://10.0.0.5:8080"
        );
        assert_eq!(
            HttpConfig::new("10.0.0.5:4000").base_url(),
            "http://10.0.0.5:4000"
        );
        assert_eq!(
            HttpConfig::new("[fe80::1]:4000").with_port(8080).base_url(),
            "http://[fe80::1]:8080"
        );
        assert_eq!(
            HttpConfig::new("[fe80::1]").with_port(8080).base_url(),
            "http://[fe80::1]:8080"
        );
    }

    #[test]
    fn http_config_into_client() {
        let client = HttpConfig::new("192.168.4.1").into_client().unwrap();
        assert_eq!(client.base_url(), "http://192.168.4.1");
        assert_eq!(client.url(STATUS_PATH), "http://192.168.4.1/api/status");
    }

    #[test]
    fn http_config_rejects_empty_host() {
        let result = HttpConfig::new("  ").into_client();
        assert!(matches!(result, Err(ProtocolError::InvalidAddress(_))));
    }

    #[test]
    fn command_urls() {
        let client = HttpClient::new("192.168.4.1").unwrap();
        assert_eq!(
            client.url(Command::SetPower(true).endpoint().path()),
            "http://192.168.4.1/api/power"
        );
    }
}
