//! Color saturation.

use serde::{Deserialize, Serialize};

use crate::errors::Error;

/// Saturation from 0 (white) to 254 (most saturated).
#[derive(Default, Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(try_from = "u8", into = "u8")]
pub struct Saturation {
    pub(crate) value: u8,
}

impl Saturation {
    const MAX: u8 = 254;

    pub fn value(&self) -> u8 {
        self.value
    }

    /// Returns None if value is above 254.
    pub fn create(value: u8) -> Option<Self> {
        (value <= Self::MAX).then_some(Saturation { value })
    }
}

impl TryFrom<u8> for Saturation {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Saturation::create(value)
            .ok_or_else(|| Error::invalid_value("sat", &format!("{value} is above 254")))
    }
}

impl From<Saturation> for u8 {
    fn from(saturation: Saturation) -> Self {
        saturation.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_checks_range() {
        assert_eq!(serde_json::from_value::<Saturation>(json!(254)).unwrap().value(), 254);
        assert!(serde_json::from_value::<Saturation>(json!(255)).is_err());
    }
}
