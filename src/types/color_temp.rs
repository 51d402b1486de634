//! Color temperature control.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::errors::Error;

/// Color temperature in mireds (`ct`), from 153 (coolest) to 500 (warmest).
///
/// Kelvin values convert with `mireds = 1_000_000 / kelvin`. Typical values:
/// - 2700K: Warm white (370 mireds)
/// - 4000K: Neutral white (250 mireds)
/// - 6500K: Daylight (154 mireds)
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(try_from = "u16", into = "u16")]
pub struct ColorTemp {
    pub(crate) mireds: u16,
}

impl ColorTemp {
    const MIN: u16 = 153;
    const MAX: u16 = 500;
    const MIN_KELVIN: u32 = 2000;
    const MAX_KELVIN: u32 = 6500;

    pub fn mireds(&self) -> u16 {
        self.mireds
    }

    /// Temperature in Kelvin, rounded to the nearest degree.
    pub fn kelvin(&self) -> u32 {
        mired_kelvin(u32::from(self.mireds))
    }

    /// Returns `None` if value is outside the valid range (153-500).
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_lights_rs::ColorTemp;
    ///
    /// assert!(ColorTemp::create(152).is_none());
    /// assert!(ColorTemp::create(153).is_some());
    /// assert!(ColorTemp::create(500).is_some());
    /// assert!(ColorTemp::create(501).is_none());
    /// ```
    pub fn create(mireds: u16) -> Option<Self> {
        if (Self::MIN..=Self::MAX).contains(&mireds) {
            Some(ColorTemp { mireds })
        } else {
            None
        }
    }

    /// Convert from Kelvin, clamping to 2000K-6500K.
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_lights_rs::ColorTemp;
    ///
    /// assert_eq!(ColorTemp::from_kelvin(2700).mireds(), 370);
    /// assert_eq!(ColorTemp::from_kelvin(10_000).mireds(), 154);
    /// assert_eq!(ColorTemp::from_kelvin(1000).mireds(), 500);
    /// ```
    pub fn from_kelvin(kelvin: u32) -> Self {
        let clamped = kelvin.clamp(Self::MIN_KELVIN, Self::MAX_KELVIN);
        if clamped != kelvin {
            warn!("{kelvin} K is outside {}-{} K, using {clamped} K", Self::MIN_KELVIN, Self::MAX_KELVIN);
        }
        // 1e6 / 2000 = 500, so the result always fits.
        let mireds = mired_kelvin(clamped) as u16;
        ColorTemp { mireds }
    }
}

impl TryFrom<u16> for ColorTemp {
    type Error = Error;

    fn try_from(mireds: u16) -> Result<Self, Self::Error> {
        ColorTemp::create(mireds)
            .ok_or_else(|| Error::invalid_value("ct", &format!("{mireds} is outside 153-500")))
    }
}

impl From<ColorTemp> for u16 {
    fn from(ct: ColorTemp) -> Self {
        ct.mireds
    }
}

// The conversion is its own inverse.
fn mired_kelvin(value: u32) -> u32 {
    (1_000_000 + value / 2) / value
}
