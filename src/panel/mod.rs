// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Connection and command state model.
//!
//! A [`Panel`] owns the two pieces of client-side state: the
//! [`ConnectionStatus`] and the desired [`DeviceState`]. Callers read
//! snapshots and issue intents; they never write either value directly.
//!
//! # Intent lifecycle
//!
//! 1. The intent is applied to the local state immediately (optimistic).
//! 2. The command is sent to the device.
//! 3. On success, one status check follows and its result replaces the
//!    local state. On failure, the connection is marked lost and the
//!    configured [`ReconciliationPolicy`] decides what happens to the
//!    optimistic value.
//!
//! Responses are applied in the order they arrive. Both values sit behind
//! a single lock, so the last response observed wins and never tears.
//!
//! # Examples
//!
//! ```no_run
//! use led_panel::Panel;
//! use led_panel::protocol::HttpClient;
//! use led_panel::types::RgbColor;
//!
//! # async fn example() -> led_panel::Result<()> {
//! let panel = Panel::new(HttpClient::new("192.168.4.1")?);
//! let _poller = panel.start_polling();
//!
//! panel.set_color(RgbColor::new(255, 0, 0)).await;
//!
//! let snapshot = panel.snapshot();
//! if snapshot.show_connection_warning() {
//!     println!("Check that you are on the LED-Control Wi-Fi network");
//! }
//! # Ok(())
//! # }
//! ```

mod config;
mod poller;

pub use config::{PanelConfig, ReconciliationPolicy};
pub use poller::PollerHandle;

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::{broadcast, watch};

use crate::command::Command;
use crate::error::{FailureKind, ProtocolError, ValueError};
use crate::event::{EventBus, PanelEvent};
use crate::protocol::Protocol;
use crate::state::{ConnectionStatus, DeviceState};
use crate::types::{Brightness, Preset, RgbColor};

/// Point-in-time view of the panel state, for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelSnapshot {
    /// Reachability of the device.
    pub connection: ConnectionStatus,
    /// Desired device state.
    pub device: DeviceState,
}

impl PanelSnapshot {
    /// Returns true when the "not connected" warning should be visible.
    #[must_use]
    pub fn show_connection_warning(&self) -> bool {
        self.connection.is_disconnected()
    }
}

/// Result of dispatching an intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The device accepted the command. `connection` is the result of the
    /// reconciling status check that followed.
    Applied {
        /// Connection status after reconciliation.
        connection: ConnectionStatus,
    },
    /// The command was not delivered.
    Failed {
        /// Category of the failure.
        kind: FailureKind,
        /// Whether the optimistic update was undone.
        rolled_back: bool,
    },
}

impl CommandOutcome {
    /// Returns true if the device accepted the command.
    #[must_use]
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Model {
    connection: ConnectionStatus,
    device: DeviceState,
}

#[derive(Debug)]
struct Inner<P> {
    protocol: P,
    policy: ReconciliationPolicy,
    poll_interval: Duration,
    model: Mutex<Model>,
    snapshot_tx: watch::Sender<PanelSnapshot>,
    events: EventBus,
}

/// The connection and command state model for one LED controller.
///
/// Cloning is cheap and yields a handle to the same state.
#[derive(Debug)]
pub struct Panel<P: Protocol> {
    inner: Arc<Inner<P>>,
}

impl<P: Protocol> Clone for Panel<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

/// Builder for a [`Panel`].
#[derive(Debug)]
pub struct PanelBuilder<P: Protocol> {
    protocol: P,
    policy: ReconciliationPolicy,
    poll_interval: Duration,
    initial_state: DeviceState,
}

impl<P: Protocol> PanelBuilder<P> {
    /// Sets the reconciliation policy.
    #[must_use]
    pub fn policy(mut self, policy: ReconciliationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the status polling period.
    #[must_use]
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Sets the local state shown before the first successful poll.
    #[must_use]
    pub fn initial_state(mut self, state: DeviceState) -> Self {
        self.initial_state = state;
        self
    }

    /// Builds the panel.
    #[must_use]
    pub fn build(self) -> Panel<P> {
        let model = Model {
            connection: ConnectionStatus::Unknown,
            device: self.initial_state,
        };
        let (snapshot_tx, _) = watch::channel(PanelSnapshot {
            connection: model.connection,
            device: model.device,
        });

        Panel {
            inner: Arc::new(Inner {
                protocol: self.protocol,
                policy: self.policy,
                poll_interval: self.poll_interval,
                model: Mutex::new(model),
                snapshot_tx,
                events: EventBus::new(),
            }),
        }
    }
}

impl<P: Protocol> Panel<P> {
    /// Creates a panel with the default policy and poll interval.
    #[must_use]
    pub fn new(protocol: P) -> Self {
        Self::builder(protocol).build()
    }

    /// Creates a builder for a panel over the given protocol.
    #[must_use]
    pub fn builder(protocol: P) -> PanelBuilder<P> {
        PanelBuilder {
            protocol,
            policy: ReconciliationPolicy::default(),
            poll_interval: PanelConfig::DEFAULT_POLL_INTERVAL,
            initial_state: DeviceState::new(),
        }
    }

    /// Returns the underlying protocol.
    #[must_use]
    pub fn protocol(&self) -> &P {
        &self.inner.protocol
    }

    /// Returns the reconciliation policy.
    #[must_use]
    pub fn policy(&self) -> ReconciliationPolicy {
        self.inner.policy
    }

    // ========== Reading ==========

    /// Returns a snapshot of the current state.
    #[must_use]
    pub fn snapshot(&self) -> PanelSnapshot {
        let model = *self.inner.model.lock();
        PanelSnapshot {
            connection: model.connection,
            device: model.device,
        }
    }

    /// Returns the current connection status.
    #[must_use]
    pub fn connection(&self) -> ConnectionStatus {
        self.inner.model.lock().connection
    }

    /// Returns the current desired device state.
    #[must_use]
    pub fn device_state(&self) -> DeviceState {
        self.inner.model.lock().device
    }

    /// Watches snapshots. The receiver always holds the latest one.
    ///
    /// Release each borrow before calling back into the panel.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<PanelSnapshot> {
        self.inner.snapshot_tx.subscribe()
    }

    /// Subscribes to panel events.
    #[must_use]
    pub fn events(&self) -> broadcast::Receiver<PanelEvent> {
        self.inner.events.subscribe()
    }

    // ========== Status ==========

    /// Polls the device status and reconciles the local state with it.
    ///
    /// On success the connection becomes `Connected` and the device-reported
    /// values replace the local state. On any failure the connection becomes
    /// `Disconnected` and the local state is left as is.
    pub async fn check_status(&self) -> ConnectionStatus {
        match self.inner.protocol.check_status().await {
            Ok(snapshot) => {
                let confirmed = DeviceState::from(snapshot);
                self.update(None, |model| model.device = confirmed, true);
                ConnectionStatus::Connected
            }
            Err(err) => {
                tracing::debug!(error = %err, "Status check failed");
                self.update(Some(&err), |_| {}, false);
                ConnectionStatus::Disconnected
            }
        }
    }

    // ========== Intents ==========

    /// Applies a command optimistically, sends it, and reconciles.
    pub async fn dispatch(&self, command: Command) -> CommandOutcome {
        self.dispatch_with(|_| command).await
    }

    /// Switches the strip on or off.
    pub async fn set_power(&self, on: bool) -> CommandOutcome {
        self.dispatch(Command::SetPower(on)).await
    }

    /// Flips the power state as currently known locally.
    pub async fn toggle_power(&self) -> CommandOutcome {
        self.dispatch_with(|state| Command::SetPower(!state.power()))
            .await
    }

    /// Sets the strip color.
    pub async fn set_color(&self, color: RgbColor) -> CommandOutcome {
        self.dispatch(Command::SetColor(color)).await
    }

    /// Sets the strip brightness.
    pub async fn set_brightness(&self, brightness: Brightness) -> CommandOutcome {
        self.dispatch(Command::SetBrightness(brightness)).await
    }

    /// Sets the strip color to a named preset.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::UnknownPreset` if no preset has that name; no
    /// command is sent in that case.
    pub async fn apply_preset(&self, name: &str) -> Result<CommandOutcome, ValueError> {
        let preset = Preset::find(name)?;
        Ok(self.set_color(preset.color()).await)
    }

    /// Builds a command from the current local state, applies it
    /// optimistically and sends it.
    async fn dispatch_with<F>(&self, make: F) -> CommandOutcome
    where
        F: FnOnce(&DeviceState) -> Command,
    {
        let (command, previous) = {
            let mut model = self.inner.model.lock();
            let before = *model;
            let command = make(&before.device);
            model.device.apply(&command);
            self.publish(&before, &model, None, false);
            (command, before.device)
        };

        tracing::debug!(%command, "Dispatching command");

        match self.inner.protocol.send_command(&command).await {
            Ok(()) => {
                let connection = self.check_status().await;
                CommandOutcome::Applied { connection }
            }
            Err(err) => {
                tracing::warn!(%command, error = %err, "Command failed");
                let kind = err.kind();
                let rollback = self.inner.policy == ReconciliationPolicy::RollbackOnFailure;
                let mut rolled_back = false;

                self.update(
                    Some(&err),
                    |model| {
                        // A newer intent or poll owns the field once it no
                        // longer holds the failed value
                        if rollback && model.device.reflects(&command) {
                            model.device.apply(&restore_command(&command, &previous));
                            rolled_back = true;
                        }
                    },
                    false,
                );

                self.inner.events.publish(PanelEvent::CommandFailed {
                    command,
                    kind,
                    error: err.to_string(),
                });

                CommandOutcome::Failed { kind, rolled_back }
            }
        }
    }

    /// Polls status now and then every poll interval until the returned
    /// handle is stopped or dropped.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use = "polling stops when the handle is dropped"]
    pub fn start_polling(&self) -> PollerHandle
    where
        P: 'static,
    {
        PollerHandle::spawn(self.clone(), self.inner.poll_interval)
    }

    // ========== Internals ==========

    /// Applies a network outcome to the model and publishes the transition,
    /// all under the model lock.
    fn update<F>(&self, error: Option<&ProtocolError>, mutate: F, confirmed: bool)
    where
        F: FnOnce(&mut Model),
    {
        let mut model = self.inner.model.lock();
        let before = *model;
        model.connection = ConnectionStatus::from_outcome(error.is_none());
        mutate(&mut model);
        self.publish(&before, &model, error, confirmed);
    }

    /// Publishes the transition from `before` to `after` to event
    /// subscribers and snapshot watchers.
    ///
    /// Must be called with the model lock held, so that transitions reach
    /// every observer in the order they were applied.
    fn publish(
        &self,
        before: &Model,
        after: &Model,
        error: Option<&ProtocolError>,
        confirmed: bool,
    ) {
        if before.connection != after.connection {
            tracing::info!(
                from = %before.connection,
                to = %after.connection,
                "Connection status changed"
            );
            self.inner.events.publish(PanelEvent::ConnectionChanged {
                status: after.connection,
                error: error.map(ToString::to_string),
            });
        }

        if before.device != after.device {
            self.inner.events.publish(PanelEvent::StateChanged {
                state: after.device,
                confirmed,
            });
        }

        let snapshot = PanelSnapshot {
            connection: after.connection,
            device: after.device,
        };
        self.inner.snapshot_tx.send_if_modified(|current| {
            if *current == snapshot {
                false
            } else {
                *current = snapshot;
                true
            }
        });
    }
}

/// The command that puts back the field `command` touched.
fn restore_command(command: &Command, previous: &DeviceState) -> Command {
    match command {
        Command::SetPower(_) => Command::SetPower(previous.power()),
        Command::SetColor(_) => Command::SetColor(previous.color()),
        Command::SetBrightness(_) => Command::SetBrightness(previous.brightness()),
    }
}
