//! Individual light control.

use reqwest::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::bridge::Bridge;
use crate::control::LightControl;
use crate::errors::Error;
use crate::payload::Payload;
use crate::response::ApiResponse;
use crate::state::Category;
use crate::target::Target;

type Result<T> = std::result::Result<T, Error>;

/// A handle to one light on a bridge.
///
/// A `Light` holds no state of its own: every getter reads the bridge
/// session's snapshot and every setter is a request to the bridge. The
/// attribute accessors come from [`LightControl`].
///
/// # Example
///
/// ```no_run
/// use hue_lights_rs::{Bridge, BridgeConfig, Brightness, LightControl};
///
/// # fn main() -> Result<(), hue_lights_rs::Error> {
/// let bridge = Bridge::new(BridgeConfig::new("192.168.1.2").with_username("user"))?;
/// let light = bridge.light("Kitchen")?.with_transition(10);
/// light.set_on(true)?;
/// light.set_brightness(Brightness::clamped(127))?;
/// println!("{} is at {}", light.name()?, light.brightness()?);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Light<'a> {
    bridge: &'a Bridge,
    id: u32,
    transition: Option<u16>,
}

impl<'a> Light<'a> {
    pub fn new(bridge: &'a Bridge, id: u32) -> Self {
        Light {
            bridge,
            id,
            transition: None,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    /// Transition time in deciseconds applied to every setter of this handle.
    pub fn with_transition(mut self, deciseconds: u16) -> Self {
        self.transition = Some(deciseconds);
        self
    }

    pub fn transition(&self) -> Option<u16> {
        self.transition
    }

    /// The light's full entry from the snapshot.
    pub fn value(&self) -> Result<Value> {
        self.bridge.get_light(self.id, None)
    }

    pub fn reachable(&self) -> Result<bool> {
        self.attr("reachable")
    }

    /// Product type reported by the bridge, e.g. "Extended color light".
    pub fn light_type(&self) -> Result<String> {
        self.attr("type")
    }

    pub fn modelid(&self) -> Result<String> {
        self.attr("modelid")
    }

    pub fn uniqueid(&self) -> Result<String> {
        self.attr("uniqueid")
    }

    pub fn swversion(&self) -> Result<String> {
        self.attr("swversion")
    }
}

impl LightControl for Light<'_> {
    fn attr<T: DeserializeOwned>(&self, attribute: &str) -> Result<T> {
        self.bridge
            .attribute(Category::Lights, &self.id.to_string(), attribute)
    }

    fn put(&self, attribute: &str, value: impl Serialize) -> Result<ApiResponse> {
        first(self.bridge.set_light(self.id, attribute, value, self.transition)?)
    }

    fn apply(&self, payload: &Payload) -> Result<ApiResponse> {
        let mut payload = payload.clone();
        if let (None, Some(transition)) = (payload.transition, self.transition) {
            payload.transition(transition);
        }
        first(self.bridge.apply_light(self.id, &payload)?)
    }
}

impl Bridge {
    /// A handle to the light with the given id or name.
    pub fn light(&self, target: impl Into<Target>) -> Result<Light<'_>> {
        let id = self.resolve_id(Category::Lights, target)?;
        Ok(Light::new(self, parse_id(Category::Lights, &id)?))
    }

    /// Handles to all lights, in ascending id order.
    pub fn lights(&self) -> Result<Vec<Light<'_>>> {
        self.ids(Category::Lights)?
            .iter()
            .map(|id| Ok(Light::new(self, parse_id(Category::Lights, id)?)))
            .collect()
    }

    /// Find lights the bridge has not seen yet.
    ///
    /// The search runs on the bridge for about 40 seconds; use
    /// [`Bridge::new_lights`] afterwards to read the results.
    pub fn search_lights(&self) -> Result<ApiResponse> {
        self.write(Method::POST, "/lights", &json!({}))
    }

    /// Lights found by the last [`Bridge::search_lights`].
    pub fn new_lights(&self) -> Result<Value> {
        self.read("/lights/new")
    }
}

/// The single answer of a one-target write.
pub(crate) fn first(responses: Vec<ApiResponse>) -> Result<ApiResponse> {
    responses
        .into_iter()
        .next()
        .ok_or_else(|| Error::UnexpectedResponse("no response for write".to_string()))
}

pub(crate) fn parse_id(category: Category, id: &str) -> Result<u32> {
    id.parse().map_err(|_| Error::not_found(category, id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BridgeConfig;

    #[test]
    fn test_transition_is_per_handle() {
        let bridge = Bridge::new(BridgeConfig::new("127.0.0.1:9")).unwrap();
        let light = Light::new(&bridge, 3);
        let slow = light.with_transition(40);
        assert_eq!(light.transition(), None);
        assert_eq!(slow.transition(), Some(40));
        assert_eq!(slow.id(), 3);
    }

    #[test]
    fn test_getters_need_registration() {
        let bridge = Bridge::new(BridgeConfig::new("127.0.0.1:9")).unwrap();
        let light = Light::new(&bridge, 1);
        assert_eq!(light.on().unwrap_err(), Error::Authentication);
        assert_eq!(light.set_on(true).unwrap_err(), Error::Authentication);
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id(Category::Lights, "12").unwrap(), 12);
        assert!(parse_id(Category::Lights, "abc").is_err());
    }
}
