// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event system for connection and state changes.
//!
//! A [`Panel`](crate::Panel) publishes [`PanelEvent`]s on an [`EventBus`]
//! so a presentation layer can react without polling snapshots.

mod event_bus;
mod panel_event;

pub use event_bus::EventBus;
pub use panel_event::PanelEvent;
