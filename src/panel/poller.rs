// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Periodic status polling.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::protocol::Protocol;

use super::Panel;

/// Handle to a running status poller.
///
/// Polling stops when the handle is stopped or dropped.
#[derive(Debug)]
pub struct PollerHandle {
    task: JoinHandle<()>,
}

impl PollerHandle {
    pub(crate) fn spawn<P>(panel: Panel<P>, period: Duration) -> Self
    where
        P: Protocol + 'static,
    {
        // tokio::time::interval panics on a zero period
        let period = period.max(Duration::from_millis(1));

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            tracing::debug!(?period, "Status poller started");

            loop {
                // First tick completes immediately
                ticker.tick().await;
                panel.check_status().await;
            }
        });

        Self { task }
    }

    /// Returns true while the poller task is alive.
    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Stops polling.
    ///
    /// A status check in flight is cancelled and its result discarded.
    pub fn stop(self) {
        drop(self);
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.task.abort();
        tracing::debug!("Status poller stopped");
    }
}
