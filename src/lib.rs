// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `led_panel` - A Rust library to control a networked RGB LED controller.
//!
//! The controller is a microcontroller running a small HTTP server, usually
//! reached through its own Wi-Fi access point at `192.168.4.1`. This library
//! provides async APIs to switch it on and off, set color and brightness,
//! apply color presets, and track whether it is reachable.
//!
//! # Components
//!
//! - [`protocol`]: the device client. [`HttpClient`] talks to hardware,
//!   [`SimulatedDevice`] stands in for it during development.
//! - [`Panel`]: the connection and command state model. It applies intents
//!   optimistically, sends them, and reconciles with the device's status.
//!
//! # Quick Start
//!
//! ```no_run
//! use led_panel::{Panel, PanelConfig};
//! use led_panel::types::Brightness;
//!
//! #[tokio::main]
//! async fn main() -> led_panel::Result<()> {
//!     // LED_PANEL_HOST, LED_PANEL_MOCK, ... override the defaults
//!     let panel = PanelConfig::from_env()?.build_panel()?;
//!
//!     // Poll status every 5 seconds while the handle lives
//!     let _poller = panel.start_polling();
//!
//!     panel.set_power(true).await;
//!     panel.set_brightness(Brightness::new(200)).await;
//!     panel.apply_preset("orange").await?;
//!
//!     println!("{:?}", panel.snapshot());
//!     Ok(())
//! }
//! ```
//!
//! ## Simulated device
//!
//! ```
//! use led_panel::Panel;
//! use led_panel::protocol::{SimulatedDevice, SimulatedState};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let device = SimulatedState::new();
//! let panel = Panel::new(SimulatedDevice::new(device.clone()));
//!
//! assert!(panel.set_power(false).await.is_applied());
//! assert!(!device.snapshot().power);
//! assert!(panel.connection().is_connected());
//! # }
//! ```

pub mod command;
pub mod error;
pub mod event;
pub mod panel;
pub mod protocol;
pub mod state;
pub mod types;

pub use command::{Command, Endpoint};
pub use error::{Error, FailureKind, ParseError, ProtocolError, Result, ValueError};
pub use event::{EventBus, PanelEvent};
pub use panel::{
    CommandOutcome, Panel, PanelBuilder, PanelConfig, PanelSnapshot, PollerHandle,
    ReconciliationPolicy,
};
#[cfg(feature = "http")]
pub use protocol::{HttpClient, HttpConfig};
pub use protocol::{DeviceLink, Protocol, SimulatedDevice, SimulatedState};
pub use state::{ConnectionStatus, DeviceSnapshot, DeviceState};
pub use types::{Brightness, Preset, RgbColor};
