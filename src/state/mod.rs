// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device and connection state types.
//!
//! [`DeviceState`] is the desired state of the strip as the client knows it,
//! [`DeviceSnapshot`] is the wire form reported by the device, and
//! [`ConnectionStatus`] tracks reachability.
//!
//! # Examples
//!
//! ```
//! use led_panel::state::{DeviceSnapshot, DeviceState};
//!
//! let snapshot = DeviceSnapshot { r: 10, g: 20, b: 30, brightness: 5, power: false };
//! let state = DeviceState::from(snapshot);
//!
//! assert!(!state.power());
//! assert_eq!(state.brightness().value(), 5);
//! ```

mod connection;
mod device_state;

pub use connection::ConnectionStatus;
pub use device_state::{DeviceSnapshot, DeviceState};
