//! CIE xy color coordinates.

use serde::{Deserialize, Serialize};

/// A color as coordinates in the bridge's CIE-like color space.
#[derive(Default, Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(from = "[f32; 2]", into = "[f32; 2]")]
pub struct Xy {
    x: f32,
    y: f32,
}

impl Xy {
    /// Returns `None` unless both coordinates are within 0.0-1.0.
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_lights_rs::Xy;
    ///
    /// assert!(Xy::create(0.3227, 0.329).is_some());
    /// assert!(Xy::create(1.2, 0.5).is_none());
    /// ```
    pub fn create(x: f32, y: f32) -> Option<Self> {
        let valid = |v: f32| (0.0..=1.0).contains(&v);
        (valid(x) && valid(y)).then_some(Xy { x, y })
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }
}

impl From<[f32; 2]> for Xy {
    fn from([x, y]: [f32; 2]) -> Self {
        Xy { x, y }
    }
}

impl From<Xy> for [f32; 2] {
    fn from(xy: Xy) -> Self {
        [xy.x, xy.y]
    }
}
