//! State payload for lights and groups.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::Error;
use crate::types::{Alert, Brightness, ColorTemp, Effect, Saturation, Xy};

type Result<T> = std::result::Result<T, Error>;

/// A state change to send to one or more lights or groups.
///
/// Payloads can contain multiple attributes that the bridge applies in a
/// single request.
///
/// # Creating Payloads
///
/// 1. **From a single attribute** using the [`From`] trait:
///    ```
///    use hue_lights_rs::{Payload, Brightness};
///    let payload = Payload::from(&Brightness::create(128).unwrap());
///    ```
///
/// 2. **Builder pattern** for combining multiple attributes:
///    ```
///    use hue_lights_rs::{Payload, ColorTemp};
///    let mut payload = Payload::new();
///    payload.on(true);
///    payload.color_temp(&ColorTemp::from_kelvin(2700));
///    payload.transition(10);
///    ```
#[serde_with::skip_serializing_none]
#[derive(Default, Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Payload {
    pub(crate) on: Option<bool>,
    pub(crate) bri: Option<u8>,
    pub(crate) hue: Option<u16>,
    pub(crate) sat: Option<u8>,
    pub(crate) xy: Option<Xy>,
    pub(crate) ct: Option<u16>,
    pub(crate) alert: Option<Alert>,
    pub(crate) effect: Option<Effect>,
    pub(crate) scene: Option<String>,
    #[serde(rename = "transitiontime")]
    pub(crate) transition: Option<u16>,
}

impl Payload {
    /// Create a new empty payload.
    ///
    /// At least one attribute other than the transition time must be set for
    /// the payload to be valid.
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_lights_rs::Payload;
    ///
    /// let mut payload = Payload::new();
    /// assert_eq!(payload.is_valid(), false);
    ///
    /// payload.transition(4);
    /// assert_eq!(payload.is_valid(), false);
    ///
    /// payload.on(false);
    /// assert_eq!(payload.is_valid(), true);
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.on.is_some()
            || self.bri.is_some()
            || self.hue.is_some()
            || self.sat.is_some()
            || self.xy.is_some()
            || self.ct.is_some()
            || self.alert.is_some()
            || self.effect.is_some()
            || self.scene.is_some()
    }

    pub fn on(&mut self, on: bool) {
        self.on = Some(on);
    }

    pub fn brightness(&mut self, brightness: &Brightness) {
        self.bri = Some(brightness.value);
    }

    /// Set the hue (0-65535, wrapping around from red to red).
    pub fn hue(&mut self, hue: u16) {
        self.hue = Some(hue);
    }

    pub fn saturation(&mut self, saturation: &Saturation) {
        self.sat = Some(saturation.value);
    }

    pub fn xy(&mut self, xy: &Xy) {
        self.xy = Some(*xy);
    }

    pub fn color_temp(&mut self, ct: &ColorTemp) {
        self.ct = Some(ct.mireds);
    }

    pub fn alert(&mut self, alert: Alert) {
        self.alert = Some(alert);
    }

    pub fn effect(&mut self, effect: Effect) {
        self.effect = Some(effect);
    }

    /// Recall a scene; only meaningful for group actions.
    pub fn scene(&mut self, scene_id: &str) {
        self.scene = Some(scene_id.to_string());
    }

    /// Set the transition time in deciseconds.
    ///
    /// The transition only applies to this command and is not stored by
    /// the bridge.
    pub fn transition(&mut self, deciseconds: u16) {
        self.transition = Some(deciseconds);
    }

    /// Request body for the bridge.
    ///
    /// # Examples
    ///
    /// ```
    /// use hue_lights_rs::{Payload, Saturation};
    /// use serde_json::json;
    ///
    /// let mut payload = Payload::new();
    /// payload.on(true);
    /// payload.saturation(&Saturation::create(200).unwrap());
    /// assert_eq!(
    ///     serde_json::Value::Object(payload.to_body().unwrap()),
    ///     json!({"on": true, "sat": 200})
    /// );
    /// ```
    pub fn to_body(&self) -> Result<Map<String, Value>> {
        if !self.is_valid() {
            return Err(Error::invalid_value("payload", "no attributes set"));
        }
        match serde_json::to_value(self).map_err(Error::JsonDump)? {
            Value::Object(body) => Ok(body),
            other => Err(Error::UnexpectedResponse(other.to_string())),
        }
    }
}

impl From<&Brightness> for Payload {
    fn from(brightness: &Brightness) -> Self {
        let mut p = Payload::new();
        p.brightness(brightness);
        p
    }
}

impl From<&ColorTemp> for Payload {
    fn from(ct: &ColorTemp) -> Self {
        let mut p = Payload::new();
        p.color_temp(ct);
        p
    }
}

impl From<&Xy> for Payload {
    fn from(xy: &Xy) -> Self {
        let mut p = Payload::new();
        p.xy(xy);
        p
    }
}

impl From<Alert> for Payload {
    fn from(alert: Alert) -> Self {
        let mut p = Payload::new();
        p.alert(alert);
        p
    }
}
