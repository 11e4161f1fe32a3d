// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Connection status tracking.

use std::fmt;

/// Reachability of the device, as derived from the last network exchange.
///
/// Starts as [`Unknown`](Self::Unknown) and is only ever changed by the
/// outcome of a status poll or a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConnectionStatus {
    /// No exchange has completed yet.
    #[default]
    Unknown,
    /// The last exchange succeeded.
    Connected,
    /// The last exchange failed.
    Disconnected,
}

impl ConnectionStatus {
    /// Returns true if the device is connected.
    #[must_use]
    pub const fn is_connected(self) -> bool {
        matches!(self, Self::Connected)
    }

    /// Returns true if the last exchange failed.
    #[must_use]
    pub const fn is_disconnected(self) -> bool {
        matches!(self, Self::Disconnected)
    }

    pub(crate) const fn from_outcome(success: bool) -> Self {
        if success {
            Self::Connected
        } else {
            Self::Disconnected
        }
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unknown => "unknown",
            Self::Connected => "connected",
            Self::Disconnected => "disconnected",
        })
    }
}
