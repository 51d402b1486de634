//! Brightness control for Hue lights.

use serde::{Deserialize, Serialize};

use crate::errors::Error;

/// Brightness level from 1 to 254, as used by the `bri` attribute.
///
/// A brightness of 1 is the dimmest setting, not off.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(try_from = "u8", into = "u8")]
pub struct Brightness {
    pub(crate) value: u8,
}

impl Brightness {
    const MIN: u8 = 1;
    const MAX: u8 = 254;

    pub fn new() -> Self {
        Brightness { value: Self::MAX }
    }

    pub fn value(&self) -> u8 {
        self.value
    }

    /// Returns None if value is outside valid range (1-254).
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_lights_rs::Brightness;
    ///
    /// assert!(Brightness::create(0).is_none());
    /// assert_eq!(Brightness::create(254).unwrap().value(), 254);
    /// assert!(Brightness::create(255).is_none());
    /// ```
    pub fn create(value: u8) -> Option<Self> {
        if Self::is_valid(value) {
            Some(Brightness { value })
        } else {
            None
        }
    }

    /// Returns the closest valid brightness.
    pub fn clamped(value: u8) -> Self {
        Brightness {
            value: value.clamp(Self::MIN, Self::MAX),
        }
    }

    fn is_valid(value: u8) -> bool {
        (Self::MIN..=Self::MAX).contains(&value)
    }
}

impl Default for Brightness {
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<u8> for Brightness {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Brightness::create(value)
            .ok_or_else(|| Error::invalid_value("bri", &format!("{value} is outside 1-254")))
    }
}

impl From<Brightness> for u8 {
    fn from(brightness: Brightness) -> Self {
        brightness.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_checks_range() {
        let bri: Brightness = serde_json::from_value(json!(200)).unwrap();
        assert_eq!(bri.value(), 200);
        assert!(serde_json::from_value::<Brightness>(json!(0)).is_err());
        assert!(serde_json::from_value::<Brightness>(json!(255)).is_err());
    }
}
