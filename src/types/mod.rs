// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for LED control.
//!
//! - [`RgbColor`] - 8-bit RGB color with `#rrggbb` conversion
//! - [`Brightness`] - Global strip brightness (0-255)
//! - [`Preset`] - Named shortcut colors

mod brightness;
mod preset;
mod rgb_color;

pub use brightness::Brightness;
pub use preset::Preset;
pub use rgb_color::RgbColor;
