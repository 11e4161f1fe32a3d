// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Named color presets.

use crate::error::ValueError;

use super::RgbColor;

/// A named, fixed color offered as a one-click shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Preset {
    name: &'static str,
    color: RgbColor,
}

impl Preset {
    /// All presets, in display order.
    pub const ALL: [Self; 10] = [
        Self::new("White", RgbColor::new(255, 255, 255)),
        Self::new("Red", RgbColor::new(255, 0, 0)),
        Self::new("Green", RgbColor::new(0, 255, 0)),
        Self::new("Blue", RgbColor::new(0, 0, 255)),
        Self::new("Yellow", RgbColor::new(255, 255, 0)),
        Self::new("Cyan", RgbColor::new(0, 255, 255)),
        Self::new("Magenta", RgbColor::new(255, 0, 255)),
        Self::new("Orange", RgbColor::new(255, 165, 0)),
        Self::new("Purple", RgbColor::new(128, 0, 128)),
        Self::new("Pink", RgbColor::new(255, 192, 203)),
    ];

    const fn new(name: &'static str, color: RgbColor) -> Self {
        Self { name, color }
    }

    /// Looks up a preset by name, ignoring ASCII case.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::UnknownPreset` if no preset has that name.
    ///
    /// # Examples
    ///
    /// ```
    /// use led_panel::types::{Preset, RgbColor};
    ///
    /// let orange = Preset::find("orange").unwrap();
    /// assert_eq!(orange.color(), RgbColor::new(255, 165, 0));
    /// assert!(Preset::find("teal").is_err());
    /// ```
    pub fn find(name: &str) -> Result<Self, ValueError> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| ValueError::UnknownPreset(name.to_string()))
    }

    /// Returns the display name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the preset color.
    #[must_use]
    pub const fn color(&self) -> RgbColor {
        self.color
    }
}
