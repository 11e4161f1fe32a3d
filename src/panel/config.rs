// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Panel configuration types.

use std::time::Duration;

use crate::error::{Error, ParseError, ValueError};
#[cfg(feature = "http")]
use crate::protocol::HttpConfig;
use crate::protocol::{DeviceLink, SimulatedDevice, SimulatedState};

use super::Panel;

/// What happens to an optimistic update when its command fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReconciliationPolicy {
    /// Keep showing the attempted value. The user retries by issuing the
    /// intent again; the next successful poll replaces it with the device's
    /// value.
    #[default]
    OptimisticNoRollback,
    /// Restore the field the failed command touched to its previous value.
    RollbackOnFailure,
}

/// Configuration for a [`Panel`].
///
/// # Examples
///
/// ```
/// use led_panel::panel::{PanelConfig, ReconciliationPolicy};
/// use std::time::Duration;
///
/// let config = PanelConfig::default()
///     .with_poll_interval(Duration::from_secs(10))
///     .with_policy(ReconciliationPolicy::RollbackOnFailure);
///
/// assert_eq!(config.poll_interval(), Duration::from_secs(10));
/// assert!(!config.mock_mode());
/// ```
#[derive(Debug, Clone)]
pub struct PanelConfig {
    #[cfg(feature = "http")]
    http: HttpConfig,
    poll_interval: Duration,
    policy: ReconciliationPolicy,
    mock_mode: bool,
}

impl PanelConfig {
    /// Default status polling period.
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(5000);

    /// Environment variable overriding the device host.
    pub const ENV_HOST: &'static str = "LED_PANEL_HOST";
    /// Environment variable overriding the device port.
    pub const ENV_PORT: &'static str = "LED_PANEL_PORT";
    /// Environment variable overriding the status timeout, in milliseconds.
    pub const ENV_STATUS_TIMEOUT_MS: &'static str = "LED_PANEL_STATUS_TIMEOUT_MS";
    /// Environment variable overriding the command timeout, in milliseconds.
    pub const ENV_COMMAND_TIMEOUT_MS: &'static str = "LED_PANEL_COMMAND_TIMEOUT_MS";
    /// Environment variable overriding the poll interval, in milliseconds.
    pub const ENV_POLL_INTERVAL_MS: &'static str = "LED_PANEL_POLL_INTERVAL_MS";
    /// Environment variable selecting the simulated device (`true` or `1`).
    pub const ENV_MOCK: &'static str = "LED_PANEL_MOCK";

    /// Creates a configuration targeting the given HTTP device.
    #[cfg(feature = "http")]
    #[must_use]
    pub fn new(http: HttpConfig) -> Self {
        Self {
            http,
            poll_interval: Self::DEFAULT_POLL_INTERVAL,
            policy: ReconciliationPolicy::default(),
            mock_mode: false,
        }
    }

    /// Reads the configuration from `LED_PANEL_*` environment variables.
    ///
    /// Unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to an unparsable or zero value.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if a value is unparsable or zero.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        #[cfg(feature = "http")]
        {
            let mut http = match lookup(Self::ENV_HOST) {
                Some(host) => HttpConfig::new(host),
                None => HttpConfig::default(),
            };
            if let Some(port) = parse_number(&lookup, Self::ENV_PORT)? {
                let port = u16::try_from(port).map_err(|_| ValueError::OutOfRange {
                    min: 1,
                    max: u32::from(u16::MAX),
                    actual: u32::try_from(port).unwrap_or(u32::MAX),
                })?;
                http = http.with_port(port);
            }
            if let Some(ms) = parse_millis(&lookup, Self::ENV_STATUS_TIMEOUT_MS)? {
                http = http.with_status_timeout(ms);
            }
            if let Some(ms) = parse_millis(&lookup, Self::ENV_COMMAND_TIMEOUT_MS)? {
                http = http.with_command_timeout(ms);
            }
            config.http = http;
        }

        if let Some(interval) = parse_millis(&lookup, Self::ENV_POLL_INTERVAL_MS)? {
            config.poll_interval = interval;
        }

        if let Some(mock) = lookup(Self::ENV_MOCK) {
            let mock = mock.trim();
            config.mock_mode = mock.eq_ignore_ascii_case("true") || mock == "1";
        }

        Ok(config)
    }

    /// Sets the status polling period.
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Sets the reconciliation policy.
    #[must_use]
    pub fn with_policy(mut self, policy: ReconciliationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Selects the simulated device instead of the HTTP one.
    #[must_use]
    pub fn with_mock_mode(mut self, mock_mode: bool) -> Self {
        self.mock_mode = mock_mode;
        self
    }

    /// Returns the HTTP connection settings.
    #[cfg(feature = "http")]
    #[must_use]
    pub fn http(&self) -> &HttpConfig {
        &self.http
    }

    /// Returns the status polling period.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Returns the reconciliation policy.
    #[must_use]
    pub fn policy(&self) -> ReconciliationPolicy {
        self.policy
    }

    /// Returns whether the simulated device is selected.
    #[must_use]
    pub fn mock_mode(&self) -> bool {
        self.mock_mode
    }

    /// Builds a panel over the configured device.
    ///
    /// In mock mode (or without the `http` feature) the panel talks to a
    /// fresh [`SimulatedDevice`].
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn build_panel(self) -> Result<Panel<DeviceLink>, Error> {
        let link = self.link()?;
        Ok(Panel::builder(link)
            .poll_interval(self.poll_interval)
            .policy(self.policy)
            .build())
    }

    #[cfg(feature = "http")]
    fn link(&self) -> Result<DeviceLink, Error> {
        if self.mock_mode {
            return Ok(self.simulated_link());
        }
        tracing::info!(url = %self.http.base_url(), "Using HTTP device");
        Ok(DeviceLink::Http(self.http.clone().into_client()?))
    }

    #[cfg(not(feature = "http"))]
    #[allow(clippy::unnecessary_wraps)]
    fn link(&self) -> Result<DeviceLink, Error> {
        Ok(self.simulated_link())
    }

    fn simulated_link(&self) -> DeviceLink {
        tracing::info!("Using simulated device");
        let device = SimulatedDevice::new(SimulatedState::new());
        #[cfg(feature = "http")]
        let device = device.with_timeouts(self.http.status_timeout(), self.http.command_timeout());
        DeviceLink::Simulated(device)
    }
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            #[cfg(feature = "http")]
            http: HttpConfig::default(),
            poll_interval: Self::DEFAULT_POLL_INTERVAL,
            policy: ReconciliationPolicy::default(),
            mock_mode: false,
        }
    }
}

fn parse_number<F>(lookup: &F, key: &str) -> Result<Option<u64>, Error>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    let value: u64 = raw.trim().parse().map_err(|e: std::num::ParseIntError| {
        ParseError::InvalidValue {
            field: key.to_string(),
            message: e.to_string(),
        }
    })?;
    if value == 0 {
        return Err(ValueError::OutOfRange {
            min: 1,
            max: u32::MAX,
            actual: 0,
        }
        .into());
    }
    Ok(Some(value))
}

fn parse_millis<F>(lookup: &F, key: &str) -> Result<Option<Duration>, Error>
where
    F: Fn(&str) -> Option<String>,
{
    Ok(parse_number(lookup, key)?.map(Duration::from_millis))
}
