//! Attribute accessors shared by lights and groups.

use log::warn;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::errors::Error;
use crate::payload::Payload;
use crate::response::ApiResponse;
use crate::types::{Alert, Brightness, ColorTemp, Effect, Saturation, Xy};

type Result<T> = std::result::Result<T, Error>;

/// Typed getters and setters for anything that takes a light state.
///
/// Implementors provide raw attribute access; the provided methods decode
/// and encode the individual attributes. Each setter is one request to the
/// bridge, carrying the implementor's transition time if it has one.
pub trait LightControl {
    /// Decode one attribute from the cached bridge state.
    fn attr<T: DeserializeOwned>(&self, attribute: &str) -> Result<T>;

    /// Send a single attribute to the bridge.
    fn put(&self, attribute: &str, value: impl Serialize) -> Result<ApiResponse>;

    /// Send several attributes in one request.
    fn apply(&self, payload: &Payload) -> Result<ApiResponse>;

    fn name(&self) -> Result<String> {
        self.attr("name")
    }

    fn set_name(&self, name: &str) -> Result<ApiResponse> {
        self.put("name", name)
    }

    fn on(&self) -> Result<bool> {
        self.attr("on")
    }

    fn set_on(&self, on: bool) -> Result<ApiResponse> {
        self.put("on", on)
    }

    fn brightness(&self) -> Result<u8> {
        self.attr("bri")
    }

    fn set_brightness(&self, brightness: Brightness) -> Result<ApiResponse> {
        self.put("bri", brightness)
    }

    /// Hue from 0 to 65535; both ends are red.
    fn hue(&self) -> Result<u16> {
        self.attr("hue")
    }

    fn set_hue(&self, hue: u16) -> Result<ApiResponse> {
        self.put("hue", hue)
    }

    fn saturation(&self) -> Result<u8> {
        self.attr("sat")
    }

    fn set_saturation(&self, saturation: Saturation) -> Result<ApiResponse> {
        self.put("sat", saturation)
    }

    /// CIE xy color coordinates.
    fn xy(&self) -> Result<Xy> {
        self.attr("xy")
    }

    fn set_xy(&self, xy: Xy) -> Result<ApiResponse> {
        self.put("xy", xy)
    }

    /// Color temperature in mireds.
    fn colortemp(&self) -> Result<u16> {
        self.attr("ct")
    }

    /// Set the color temperature in mireds.
    ///
    /// Most lights accept 154 to 500; other values are sent as given and may
    /// be rejected by the bridge.
    fn set_colortemp(&self, mireds: u16) -> Result<ApiResponse> {
        if !(154..=500).contains(&mireds) {
            warn!("{} mireds is outside the usual 154-500 range", mireds);
        }
        self.put("ct", mireds)
    }

    /// Color temperature in Kelvin.
    fn colortemp_k(&self) -> Result<u32> {
        let mireds: u16 = self.colortemp()?;
        if mireds == 0 {
            return Err(Error::invalid_value("ct", "bridge reported 0 mireds"));
        }
        Ok(ColorTemp { mireds }.kelvin())
    }

    /// Set the color temperature in Kelvin, clamped to 2000K-6500K.
    fn set_colortemp_k(&self, kelvin: u32) -> Result<ApiResponse> {
        self.put("ct", ColorTemp::from_kelvin(kelvin))
    }

    fn colormode(&self) -> Result<String> {
        self.attr("colormode")
    }

    fn effect(&self) -> Result<Effect> {
        self.attr("effect")
    }

    fn set_effect(&self, effect: Effect) -> Result<ApiResponse> {
        self.put("effect", effect)
    }

    fn alert(&self) -> Result<Alert> {
        self.attr("alert")
    }

    fn set_alert(&self, alert: Alert) -> Result<ApiResponse> {
        self.put("alert", alert)
    }
}
