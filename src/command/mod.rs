// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! LED controller command definitions.
//!
//! Each [`Command`] maps to one `POST /api/<endpoint>` request:
//!
//! | Command | Endpoint | Body |
//! |---------|----------|------|
//! | [`Command::SetPower`] | `/api/power` | `{"state": true}` |
//! | [`Command::SetColor`] | `/api/color` | `{"r": 255, "g": 0, "b": 0}` |
//! | [`Command::SetBrightness`] | `/api/brightness` | `{"value": 128}` |
//!
//! # Examples
//!
//! ```
//! use led_panel::command::{Command, Endpoint};
//! use led_panel::types::Brightness;
//!
//! let cmd = Command::SetBrightness(Brightness::new(128));
//! assert_eq!(cmd.endpoint(), Endpoint::Brightness);
//! assert_eq!(cmd.endpoint().path(), "/api/brightness");
//! assert_eq!(cmd.body(), serde_json::json!({"value": 128}));
//! ```

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{ParseError, ValueError};
use crate::types::{Brightness, RgbColor};

/// Path of the status endpoint.
pub const STATUS_PATH: &str = "/api/status";

/// A command endpoint exposed by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// `/api/power`
    Power,
    /// `/api/color`
    Color,
    /// `/api/brightness`
    Brightness,
}

impl Endpoint {
    /// All command endpoints.
    pub const ALL: [Self; 3] = [Self::Power, Self::Color, Self::Brightness];

    /// Returns the endpoint name as used in the URL.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Power => "power",
            Self::Color => "color",
            Self::Brightness => "brightness",
        }
    }

    /// Returns the absolute request path.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Power => "/api/power",
            Self::Color => "/api/color",
            Self::Brightness => "/api/brightness",
        }
    }

    /// Resolves an endpoint from its request path.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|e| e.path() == path)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Endpoint {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|e| e.name() == s)
            .ok_or_else(|| ValueError::UnknownEndpoint(s.to_string()))
    }
}

/// A state-changing request for the controller.
///
/// Commands are transient: created per intent and consumed by a
/// [`Protocol`](crate::protocol::Protocol) implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Switch the strip on or off.
    SetPower(bool),
    /// Set the strip color.
    SetColor(RgbColor),
    /// Set the global strip brightness.
    SetBrightness(Brightness),
}

#[derive(Deserialize)]
struct PowerBody {
    state: bool,
}

#[derive(Deserialize)]
struct BrightnessBody {
    value: Brightness,
}

impl Command {
    /// Returns the endpoint this command is addressed to.
    #[must_use]
    pub const fn endpoint(&self) -> Endpoint {
        match self {
            Self::SetPower(_) => Endpoint::Power,
            Self::SetColor(_) => Endpoint::Color,
            Self::SetBrightness(_) => Endpoint::Brightness,
        }
    }

    /// Returns the JSON request body.
    #[must_use]
    pub fn body(&self) -> serde_json::Value {
        match self {
            Self::SetPower(state) => serde_json::json!({ "state": state }),
            Self::SetColor(color) => serde_json::json!({
                "r": color.red(),
                "g": color.green(),
                "b": color.blue(),
            }),
            Self::SetBrightness(value) => serde_json::json!({ "value": value.value() }),
        }
    }

    /// Decodes a command from an endpoint and a raw JSON request body.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Json` if the body is not valid JSON or lacks the
    /// fields the endpoint requires.
    pub fn from_body(endpoint: Endpoint, body: &[u8]) -> Result<Self, ParseError> {
        let command = match endpoint {
            Endpoint::Power => {
                let PowerBody { state } = serde_json::from_slice(body)?;
                Self::SetPower(state)
            }
            Endpoint::Color => Self::SetColor(serde_json::from_slice(body)?),
            Endpoint::Brightness => {
                let BrightnessBody { value } = serde_json::from_slice(body)?;
                Self::SetBrightness(value)
            }
        };
        Ok(command)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SetPower(true) => f.write_str("power on"),
            Self::SetPower(false) => f.write_str("power off"),
            Self::SetColor(color) => write!(f, "color {color}"),
            Self::SetBrightness(value) => write!(f, "brightness {}", value.value()),
        }
    }
}
