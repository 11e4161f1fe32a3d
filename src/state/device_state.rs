// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device state tracking.

use serde::{Deserialize, Serialize};

use crate::command::Command;
use crate::types::{Brightness, RgbColor};

/// Desired state of the LED controller as known to the client.
///
/// This is what the client last commanded or last confirmed. It is not
/// authoritative; the device is the source of truth and the state is
/// replaced whenever a status poll succeeds.
///
/// # Examples
///
/// ```
/// use led_panel::command::Command;
/// use led_panel::state::DeviceState;
///
/// let mut state = DeviceState::new();
/// assert!(state.power());
///
/// // Apply returns true if state actually changed
/// assert!(state.apply(&Command::SetPower(false)));
/// assert!(!state.apply(&Command::SetPower(false)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceState {
    power: bool,
    color: RgbColor,
    brightness: Brightness,
}

impl DeviceState {
    /// Creates the state the firmware boots with: on, white, half brightness.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            power: true,
            color: RgbColor::WHITE,
            brightness: Brightness::BOOT,
        }
    }

    /// Returns whether the strip is on.
    #[must_use]
    pub const fn power(&self) -> bool {
        self.power
    }

    /// Returns the strip color.
    #[must_use]
    pub const fn color(&self) -> RgbColor {
        self.color
    }

    /// Returns the strip brightness.
    #[must_use]
    pub const fn brightness(&self) -> Brightness {
        self.brightness
    }

    /// Applies a command to the state.
    ///
    /// Returns `true` if the state changed.
    pub fn apply(&mut self, command: &Command) -> bool {
        let before = *self;
        match *command {
            Command::SetPower(power) => self.power = power,
            Command::SetColor(color) => self.color = color,
            Command::SetBrightness(brightness) => self.brightness = brightness,
        }
        *self != before
    }

    /// Returns `true` if the field `command` targets already holds the
    /// command's value.
    #[must_use]
    pub fn reflects(&self, command: &Command) -> bool {
        match *command {
            Command::SetPower(power) => self.power == power,
            Command::SetColor(color) => self.color == color,
            Command::SetBrightness(brightness) => self.brightness == brightness,
        }
    }
}

impl Default for DeviceState {
    fn default() -> Self {
        Self::new()
    }
}

/// Device state as reported by `GET /api/status`.
///
/// The wire shape is flat: `{"r":..,"g":..,"b":..,"brightness":..,"power":..}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceSnapshot {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Global brightness.
    pub brightness: u8,
    /// Whether the strip is on.
    pub power: bool,
}

impl From<DeviceSnapshot> for DeviceState {
    fn from(snapshot: DeviceSnapshot) -> Self {
        Self {
            power: snapshot.power,
            color: RgbColor::new(snapshot.r, snapshot.g, snapshot.b),
            brightness: Brightness::new(snapshot.brightness),
        }
    }
}

impl From<DeviceState> for DeviceSnapshot {
    fn from(state: DeviceState) -> Self {
        Self {
            r: state.color.red(),
            g: state.color.green(),
            b: state.color.blue(),
            brightness: state.brightness.value(),
            power: state.power,
        }
    }
}

impl Default for DeviceSnapshot {
    fn default() -> Self {
        DeviceState::new().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boot_state() {
        let state = DeviceState::new();
        assert!(state.power());
        assert_eq!(state.color(), RgbColor::WHITE);
        assert_eq!(state.brightness(), Brightness::new(128));
    }

    #[test]
    fn apply_each_command() {
        let mut state = DeviceState::new();

        assert!(state.apply(&Command::SetColor(RgbColor::new(1, 2, 3))));
        assert_eq!(state.color(), RgbColor::new(1, 2, 3));

        assert!(state.apply(&Command::SetBrightness(Brightness::new(5))));
        assert_eq!(state.brightness().value(), 5);

        assert!(state.apply(&Command::SetPower(false)));
        assert!(!state.power());
    }

    #[test]
    fn apply_same_value_reports_no_change() {
        let mut state = DeviceState::new();
        assert!(!state.apply(&Command::SetBrightness(Brightness::BOOT)));
        assert!(!state.apply(&Command::SetColor(RgbColor::WHITE)));
    }

    #[test]
    fn reflects_checks_only_the_targeted_field() {
        let state = DeviceState::new();
        assert!(state.reflects(&Command::SetPower(true)));
        assert!(!state.reflects(&Command::SetPower(false)));
        assert!(state.reflects(&Command::SetBrightness(Brightness::BOOT)));
        assert!(!state.reflects(&Command::SetColor(RgbColor::BLACK)));
    }

    #[test]
    fn snapshot_parses_status_body() {
        let body = r#"{"r":10,"g":20,"b":30,"brightness":5,"power":false}"#;
        let snapshot: DeviceSnapshot = serde_json::from_str(body).unwrap();
        assert_eq!(
            snapshot,
            DeviceSnapshot {
                r: 10,
                g: 20,
                b: 30,
                brightness: 5,
                power: false
            }
        );
    }

    #[test]
    fn snapshot_rejects_incomplete_body() {
        let body = r#"{"r":10,"g":20,"b":30,"power":false}"#;
        assert!(serde_json::from_str::<DeviceSnapshot>(body).is_err());
    }

    #[test]
    fn snapshot_state_conversion_is_lossless() {
        let snapshot = DeviceSnapshot {
            r: 200,
            g: 0,
            b: 77,
            brightness: 255,
            power: true,
        };
        let state = DeviceState::from(snapshot);
        assert_eq!(DeviceSnapshot::from(state), snapshot);
    }
}
