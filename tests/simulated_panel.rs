// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the panel state model against the simulated device.
//!
//! All tests run on a paused clock, so simulated delays and poll periods
//! elapse instantly.

use std::time::Duration;

use led_panel::protocol::{SimulatedDevice, SimulatedState};
use led_panel::state::{ConnectionStatus, DeviceSnapshot, DeviceState};
use led_panel::types::{Brightness, RgbColor};
use led_panel::{CommandOutcome, FailureKind, Panel, PanelConfig, PanelEvent, ReconciliationPolicy};
use tokio::sync::broadcast;

fn panel_for(state: &SimulatedState) -> Panel<SimulatedDevice> {
    Panel::new(SimulatedDevice::new(state.clone()))
}

fn drain(rx: &mut broadcast::Receiver<PanelEvent>) -> Vec<PanelEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

// ============================================================================
// Status Tests
// ============================================================================

mod status {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn success_adopts_reported_values_exactly() {
        let reported = DeviceSnapshot {
            r: 12,
            g: 0,
            b: 200,
            brightness: 255,
            power: false,
        };
        let state = SimulatedState::with_snapshot(reported);
        let panel = panel_for(&state);

        assert_eq!(panel.check_status().await, ConnectionStatus::Connected);

        let snapshot = panel.snapshot();
        assert_eq!(DeviceSnapshot::from(snapshot.device), reported);
        assert!(!snapshot.show_connection_warning());
    }

    #[tokio::test(start_paused = true)]
    async fn failure_keeps_local_state() {
        let state = SimulatedState::new();
        let panel = panel_for(&state);
        panel.check_status().await;

        state.set_snapshot(DeviceSnapshot {
            r: 0,
            g: 0,
            b: 0,
            brightness: 0,
            power: false,
        });
        state.force_status(Some(500));

        assert_eq!(panel.check_status().await, ConnectionStatus::Disconnected);
        assert_eq!(panel.device_state(), DeviceState::new());
        assert!(panel.snapshot().show_connection_warning());
    }

    #[tokio::test(start_paused = true)]
    async fn slow_status_counts_as_disconnected() {
        let state = SimulatedState::new();
        let device = SimulatedDevice::new(state.clone())
            .with_delays(Duration::from_secs(3), Duration::from_millis(100));
        let panel = Panel::new(device);

        assert_eq!(panel.check_status().await, ConnectionStatus::Disconnected);
    }

    #[tokio::test(start_paused = true)]
    async fn external_change_is_picked_up() {
        let state = SimulatedState::new();
        let panel = panel_for(&state);
        panel.check_status().await;

        // Someone presses a button on the controller
        state.set_snapshot(DeviceSnapshot {
            power: false,
            ..state.snapshot()
        });

        panel.check_status().await;
        assert!(!panel.device_state().power());
    }
}

// ============================================================================
// Command Tests
// ============================================================================

mod commands {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn success_is_followed_by_one_status_check() {
        let state = SimulatedState::new();
        let panel = panel_for(&state);

        let outcome = panel.set_color(RgbColor::new(255, 0, 0)).await;

        assert_eq!(
            outcome,
            CommandOutcome::Applied {
                connection: ConnectionStatus::Connected
            }
        );
        assert_eq!(state.command_requests(), 1);
        assert_eq!(state.status_requests(), 1);
        assert_eq!(panel.device_state().color(), RgbColor::new(255, 0, 0));
    }

    #[tokio::test(start_paused = true)]
    async fn optimistic_value_is_visible_before_response() {
        let state = SimulatedState::new();
        let panel = panel_for(&state);
        let mut rx = panel.subscribe();

        let task = tokio::spawn({
            let panel = panel.clone();
            async move { panel.set_brightness(Brightness::new(42)).await }
        });

        rx.changed().await.unwrap();
        let snapshot = *rx.borrow_and_update();
        assert_eq!(snapshot.device.brightness(), Brightness::new(42));
        // Nothing has reached the device yet
        assert_eq!(state.snapshot().brightness, 128);

        assert!(task.await.unwrap().is_applied());
        assert_eq!(state.snapshot().brightness, 42);
    }

    #[tokio::test(start_paused = true)]
    async fn always_failing_device_keeps_optimistic_state() {
        let state = SimulatedState::new();
        state.set_reachable(false);
        let panel = panel_for(&state);

        let outcome = panel.set_color(RgbColor::new(0, 0, 255)).await;

        assert_eq!(
            outcome,
            CommandOutcome::Failed {
                kind: FailureKind::Transport,
                rolled_back: false
            }
        );
        assert_eq!(panel.connection(), ConnectionStatus::Disconnected);
        assert_eq!(panel.device_state().color(), RgbColor::new(0, 0, 255));
        // No reconciling status check after a failed command
        assert_eq!(state.status_requests(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn rejected_command_rolls_back_when_configured() {
        let state = SimulatedState::new();
        state.force_status(Some(400));
        let panel = Panel::builder(SimulatedDevice::new(state.clone()))
            .policy(ReconciliationPolicy::RollbackOnFailure)
            .build();

        let outcome = panel.set_power(false).await;

        assert_eq!(
            outcome,
            CommandOutcome::Failed {
                kind: FailureKind::HttpStatus,
                rolled_back: true
            }
        );
        assert!(panel.device_state().power());
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_brightness_is_idempotent() {
        let state = SimulatedState::new();
        let panel = panel_for(&state);

        for _ in 0..2 {
            assert!(panel.set_brightness(Brightness::new(128)).await.is_applied());
            assert_eq!(panel.device_state().brightness(), Brightness::new(128));
        }
        assert_eq!(state.command_requests(), 2);
        assert_eq!(state.snapshot().brightness, 128);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_commands_settle_on_device_state() {
        let state = SimulatedState::new();
        let panel = panel_for(&state);

        let (a, b) = tokio::join!(
            panel.set_color(RgbColor::new(255, 0, 0)),
            panel.set_brightness(Brightness::new(10)),
        );

        assert!(a.is_applied());
        assert!(b.is_applied());
        assert_eq!(DeviceSnapshot::from(panel.device_state()), state.snapshot());
    }

    #[tokio::test(start_paused = true)]
    async fn preset_sends_its_color() {
        let state = SimulatedState::new();
        let panel = panel_for(&state);

        let outcome = panel.apply_preset("Purple").await.unwrap();

        assert!(outcome.is_applied());
        let snapshot = state.snapshot();
        assert_eq!((snapshot.r, snapshot.g, snapshot.b), (128, 0, 128));
    }
}

// ============================================================================
// Event Tests
// ============================================================================

mod events {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn successful_command_events() {
        let state = SimulatedState::new();
        let panel = panel_for(&state);
        let mut rx = panel.events();

        panel.set_power(false).await;

        let events = drain(&mut rx);
        assert_eq!(events.len(), 2);
        assert!(matches!(
            &events[0],
            PanelEvent::StateChanged { state, confirmed: false } if !state.power()
        ));
        assert_eq!(
            events[1],
            PanelEvent::ConnectionChanged {
                status: ConnectionStatus::Connected,
                error: None
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn failed_command_events() {
        let state = SimulatedState::new();
        let panel = panel_for(&state);
        panel.check_status().await;
        let mut rx = panel.events();

        state.set_reachable(false);
        panel.set_brightness(Brightness::new(1)).await;

        let events = drain(&mut rx);
        assert_eq!(events.len(), 3);
        assert!(events[0].is_state_change());
        assert!(matches!(
            &events[1],
            PanelEvent::ConnectionChanged {
                status: ConnectionStatus::Disconnected,
                error: Some(_)
            }
        ));
        assert!(matches!(
            &events[2],
            PanelEvent::CommandFailed {
                kind: FailureKind::Transport,
                ..
            }
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn unchanged_poll_is_silent() {
        let state = SimulatedState::new();
        let panel = panel_for(&state);
        panel.check_status().await;
        let mut rx = panel.events();

        panel.check_status().await;

        assert!(drain(&mut rx).is_empty());
    }
}

// ============================================================================
// Polling Tests
// ============================================================================

mod polling {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn polls_immediately_then_periodically() {
        let state = SimulatedState::new();
        let panel = panel_for(&state);

        let poller = panel.start_polling();
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(state.status_requests(), 1);
        assert!(panel.connection().is_connected());

        tokio::time::sleep(PanelConfig::DEFAULT_POLL_INTERVAL).await;
        assert_eq!(state.status_requests(), 2);

        tokio::time::sleep(PanelConfig::DEFAULT_POLL_INTERVAL).await;
        assert_eq!(state.status_requests(), 3);

        assert!(poller.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn tracks_connection_loss_and_recovery() {
        let state = SimulatedState::new();
        let panel = Panel::builder(SimulatedDevice::new(state.clone()))
            .poll_interval(Duration::from_secs(1))
            .build();
        let _poller = panel.start_polling();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(panel.connection(), ConnectionStatus::Connected);

        state.set_reachable(false);
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(panel.connection(), ConnectionStatus::Disconnected);

        state.set_reachable(true);
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(panel.connection(), ConnectionStatus::Connected);
    }

    #[tokio::test(start_paused = true)]
    async fn stopping_ends_polling() {
        let state = SimulatedState::new();
        let panel = panel_for(&state);

        let poller = panel.start_polling();
        tokio::time::sleep(Duration::from_millis(100)).await;
        poller.stop();

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(state.status_requests(), 1);
    }
}

// ============================================================================
// Configuration Tests
// ============================================================================

mod config {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn mock_mode_builds_simulated_panel() {
        let config = PanelConfig::from_lookup(|key| {
            (key == PanelConfig::ENV_MOCK).then(|| "TRUE".to_string())
        })
        .unwrap();
        assert!(config.mock_mode());

        let panel = config.build_panel().unwrap();
        assert_eq!(panel.check_status().await, ConnectionStatus::Connected);
        assert!(panel.set_power(false).await.is_applied());
    }
}
