//! Light groups, including the implicit group of all lights.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::bridge::Bridge;
use crate::control::LightControl;
use crate::errors::Error;
use crate::light::{Light, first, parse_id};
use crate::payload::Payload;
use crate::response::ApiResponse;
use crate::state::Category;
use crate::target::Target;

type Result<T> = std::result::Result<T, Error>;

/// A handle to one group on a bridge.
///
/// Attribute writes other than `name` and `lights` are sent as group actions
/// and change every light in the group. Reads search the group's `state` and
/// then its last `action`.
///
/// Group 0 always exists and contains every light; see [`Bridge::all_lights`].
#[derive(Debug, Clone, Copy)]
pub struct Group<'a> {
    bridge: &'a Bridge,
    id: u32,
    transition: Option<u16>,
}

impl<'a> Group<'a> {
    pub fn new(bridge: &'a Bridge, id: u32) -> Self {
        Group {
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

    pub fn value(&self) -> Result<Value> {
        self.bridge.get_group(self.id, None)
    }

    /// Handles to the member lights, in the order the bridge lists them.
    pub fn lights(&self) -> Result<Vec<Light<'a>>> {
        let ids: Vec<String> = self.attr("lights")?;
        ids.iter()
            .map(|id| Ok(Light::new(self.bridge, parse_id(Category::Lights, id)?)))
            .collect()
    }

    /// Replace the member lights.
    pub fn set_lights(&self, lights: &[u32]) -> Result<ApiResponse> {
        self.put("lights", lights)
    }

    /// Whether at least one light in the group is on.
    pub fn any_on(&self) -> Result<bool> {
        self.attr("any_on")
    }

    pub fn all_on(&self) -> Result<bool> {
        self.attr("all_on")
    }

    /// Group type, e.g. "Room" or "LightGroup".
    pub fn group_type(&self) -> Result<String> {
        self.attr("type")
    }

    /// Room class such as "Living room"; only present on rooms.
    pub fn class(&self) -> Result<String> {
        self.attr("class")
    }

    /// Recall a scene on this group.
    pub fn recall_scene(&self, scene_id: &str) -> Result<ApiResponse> {
        let mut payload = Payload::new();
        payload.scene(scene_id);
        self.apply(&payload)
    }
}

impl LightControl for Group<'_> {
    fn attr<T: DeserializeOwned>(&self, attribute: &str) -> Result<T> {
        self.bridge
            .attribute(Category::Groups, &self.id.to_string(), attribute)
    }

    fn put(&self, attribute: &str, value: impl Serialize) -> Result<ApiResponse> {
        first(self.bridge.set_group(self.id, attribute, value, self.transition)?)
    }

    fn apply(&self, payload: &Payload) -> Result<ApiResponse> {
        let mut payload = payload.clone();
        if let (None, Some(transition)) = (payload.transition, self.transition) {
            payload.transition(transition);
        }
        first(self.bridge.apply_group(self.id, &payload)?)
    }
}

impl Bridge {
    /// A handle to the group with the given id or name.
    pub fn group(&self, target: impl Into<Target>) -> Result<Group<'_>> {
        let target = target.into();
        if target == Target::Id("0".to_string()) {
            return Ok(self.all_lights());
        }
        let id = self.resolve_id(Category::Groups, target)?;
        Ok(Group::new(self, parse_id(Category::Groups, &id)?))
    }

    /// Handles to all groups listed by the bridge, in ascending id order.
    ///
    /// Group 0 is not part of the listing.
    pub fn groups(&self) -> Result<Vec<Group<'_>>> {
        self.ids(Category::Groups)?
            .iter()
            .filter(|id| id.as_str() != "0")
            .map(|id| Ok(Group::new(self, parse_id(Category::Groups, id)?)))
            .collect()
    }

    /// The implicit group 0, which contains every light.
    pub fn all_lights(&self) -> Group<'_> {
        Group::new(self, 0)
    }

    /// Create a group of lights and return its id.
    ///
    /// ```no_run
    /// # use hue_lights_rs::{Bridge, BridgeConfig, LightControl};
    /// # fn main() -> Result<(), hue_lights_rs::Error> {
    /// # let bridge = Bridge::new(BridgeConfig::new("192.168.1.2").with_username("user"))?;
    /// let id = bridge.create_group("Desk", &[3, 4])?;
    /// bridge.group(id)?.set_on(true)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn create_group(&self, name: &str, lights: &[u32]) -> Result<u32> {
        let lights: Vec<String> = lights.iter().map(u32::to_string).collect();
        let id = self.create(
            Category::Groups,
            &json!({"name": name, "lights": lights, "type": "LightGroup"}),
        )?;
        parse_id(Category::Groups, &id)
    }

    pub fn delete_group(&self, id: u32) -> Result<ApiResponse> {
        self.remove(Category::Groups, &id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BridgeConfig;

    #[test]
    fn test_all_lights_is_group_zero() {
        let bridge = Bridge::new(BridgeConfig::new("127.0.0.1:9")).unwrap();
        assert_eq!(bridge.all_lights().id(), 0);
        assert_eq!(bridge.group(0u32).unwrap().id(), 0);
    }

    #[test]
    fn test_group_needs_registration() {
        let bridge = Bridge::new(BridgeConfig::new("127.0.0.1:9")).unwrap();
        assert_eq!(bridge.group("Living room").unwrap_err(), Error::Authentication);
        assert_eq!(
            bridge.all_lights().set_on(false).unwrap_err(),
            Error::Authentication
        );
    }
}
