// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Panel event types.

use crate::command::Command;
use crate::error::FailureKind;
use crate::state::{ConnectionStatus, DeviceState};

/// Events emitted by a [`Panel`](crate::Panel).
///
/// # Examples
///
/// ```
/// use led_panel::event::PanelEvent;
/// use led_panel::state::ConnectionStatus;
///
/// let event = PanelEvent::ConnectionChanged {
///     status: ConnectionStatus::Disconnected,
///     error: Some("request timed out after 2000 ms".to_string()),
/// };
/// assert!(event.is_connection_change());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum PanelEvent {
    /// Connection status changed.
    ConnectionChanged {
        /// The new status.
        status: ConnectionStatus,
        /// Error message if the change was caused by a failure.
        error: Option<String>,
    },

    /// The desired device state changed, either optimistically or from a
    /// confirmed status poll.
    StateChanged {
        /// The complete new state.
        state: DeviceState,
        /// Whether the new state came from the device.
        confirmed: bool,
    },

    /// A command could not be delivered.
    CommandFailed {
        /// The command that failed.
        command: Command,
        /// Category of the failure.
        kind: FailureKind,
        /// Error message.
        error: String,
    },
}

impl PanelEvent {
    /// Returns true if this is a connection change event.
    #[must_use]
    pub fn is_connection_change(&self) -> bool {
        matches!(self, Self::ConnectionChanged { .. })
    }

    /// Returns true if this is a state change event.
    #[must_use]
    pub fn is_state_change(&self) -> bool {
        matches!(self, Self::StateChanged { .. })
    }
}
