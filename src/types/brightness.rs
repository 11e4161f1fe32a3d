// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Brightness type for the LED strip.
//!
//! The controller takes a raw 8-bit brightness (0-255) and applies it as a
//! global scale to the strip. Panels usually show it as a percentage.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ParseError, ValueError};

/// Global strip brightness (0-255).
///
/// # Examples
///
/// ```
/// use led_panel::types::Brightness;
///
/// let half = Brightness::new(128);
/// assert_eq!(half.value(), 128);
/// assert_eq!(half.percent(), 50);
///
/// // Wider inputs are range checked
/// assert!(Brightness::try_from(256u32).is_err());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Brightness(u8);

impl Brightness {
    /// Strip fully dark.
    pub const MIN: Self = Self(0);

    /// Strip at full brightness.
    pub const MAX: Self = Self(255);

    /// Brightness the firmware boots with.
    pub const BOOT: Self = Self(128);

    /// Creates a new brightness value.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    /// Returns the raw brightness value.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }

    /// Returns the brightness as a rounded percentage (0-100).
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn percent(&self) -> u8 {
        // Result lies in [0.0, 100.0]
        (f32::from(self.0) / 255.0 * 100.0).round() as u8
    }
}

impl fmt::Display for Brightness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percent())
    }
}

impl From<u8> for Brightness {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

impl TryFrom<u32> for Brightness {
    type Error = ValueError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .map(Self)
            .map_err(|_| ValueError::OutOfRange {
                min: 0,
                max: 255,
                actual: value,
            })
    }
}

impl FromStr for Brightness {
    type Err = crate::Error;

    /// Parses slider-style input such as `"128"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw: u32 = s.trim().parse().map_err(|e: std::num::ParseIntError| {
            ParseError::InvalidValue {
                field: "brightness".to_string(),
                message: e.to_string(),
            }
        })?;
        Ok(Self::try_from(raw)?)
    }
}
