// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! RGB color type with hex parsing.
//!
//! The device speaks plain `{r, g, b}` channels; color pickers speak
//! `#rrggbb`. [`RgbColor`] converts losslessly between the two.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// RGB color with 8-bit channels (0-255).
///
/// Serializes as `{"r": .., "g": .., "b": ..}`, which is the body of a
/// `POST /api/color` request.
///
/// # Examples
///
/// ```
/// use led_panel::types::RgbColor;
///
/// let color = RgbColor::new(255, 128, 0);
/// assert_eq!(color.red(), 255);
/// assert_eq!(color.to_hex(), "#ff8000");
///
/// let parsed = RgbColor::from_hex("#FF8000").unwrap();
/// assert_eq!(parsed, color);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RgbColor {
    #[serde(rename = "r")]
    red: u8,
    #[serde(rename = "g")]
    green: u8,
    #[serde(rename = "b")]
    blue: u8,
}

impl RgbColor {
    /// Pure white, the device's boot color.
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Black (all channels off).
    pub const BLACK: Self = Self::new(0, 0, 0);

    /// Creates a new RGB color.
    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Parses an RGB color from a hex string.
    ///
    /// Accepts `#RRGGBB`, `RRGGBB`, `#RGB` and `RGB`, in either case.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::InvalidHexColor` if the string is not a valid
    /// hex color.
    ///
    /// # Examples
    ///
    /// ```
    /// use led_panel::types::RgbColor;
    ///
    /// let color = RgbColor::from_hex("#0a141e").unwrap();
    /// assert_eq!(color, RgbColor::new(10, 20, 30));
    ///
    /// let short = RgbColor::from_hex("F00").unwrap();
    /// assert_eq!(short, RgbColor::new(255, 0, 0));
    ///
    /// assert!(RgbColor::from_hex("#12345").is_err());
    /// ```
    pub fn from_hex(hex: &str) -> Result<Self, ValueError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);

        if !digits.is_ascii() {
            return Err(ValueError::InvalidHexColor(hex.to_string()));
        }

        match digits.len() {
            3 => {
                let mut channels = [0u8; 3];
                for (channel, c) in channels.iter_mut().zip(digits.chars()) {
                    // 0-F expands to 0-255
                    *channel = parse_hex_char(c, hex)? * 17;
                }
                Ok(Self::new(channels[0], channels[1], channels[2]))
            }
            6 => Ok(Self::new(
                parse_hex_pair(&digits[0..2], hex)?,
                parse_hex_pair(&digits[2..4], hex)?,
                parse_hex_pair(&digits[4..6], hex)?,
            )),
            _ => Err(ValueError::InvalidHexColor(hex.to_string())),
        }
    }

    /// Returns the red component.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Returns the green component.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Returns the blue component.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }

    /// Returns the color as a lowercase `#rrggbb` string.
    ///
    /// This is the value format of an HTML color input.
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }
}

impl Default for RgbColor {
    fn default() -> Self {
        Self::WHITE
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for RgbColor {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl From<(u8, u8, u8)> for RgbColor {
    fn from((red, green, blue): (u8, u8, u8)) -> Self {
        Self::new(red, green, blue)
    }
}

fn parse_hex_char(c: char, original: &str) -> Result<u8, ValueError> {
    c.to_digit(16)
        .and_then(|d| u8::try_from(d).ok())
        .ok_or_else(|| ValueError::InvalidHexColor(original.to_string()))
}

fn parse_hex_pair(s: &str, original: &str) -> Result<u8, ValueError> {
    // from_str_radix tolerates a leading '+', which is not a hex digit
    if !s.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ValueError::InvalidHexColor(original.to_string()));
    }
    u8::from_str_radix(s, 16).map_err(|_| ValueError::InvalidHexColor(original.to_string()))
}
