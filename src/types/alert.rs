//! Alert and effect modes.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Temporary alert effect of a light.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Alert {
    /// Stop any running alert
    None,
    /// One breathe cycle
    Select,
    /// Breathe cycles for 15 seconds
    LSelect,
}

/// Dynamic effect of a light.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Effect {
    None,
    /// Cycle through all hues at the current brightness and saturation
    ColorLoop,
}
