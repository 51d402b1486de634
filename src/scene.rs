//! Scenes stored on the bridge.

use log::{info, warn};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::bridge::Bridge;
use crate::errors::Error;
use crate::light::{first, parse_id};
use crate::payload::Payload;
use crate::response::ApiResponse;
use crate::state::{BridgeState, Category};
use crate::target::Target;

type Result<T> = std::result::Result<T, Error>;

/// A handle to one scene. Scene ids are strings assigned by the bridge.
#[derive(Debug, Clone)]
pub struct Scene<'a> {
    bridge: &'a Bridge,
    id: String,
}

impl<'a> Scene<'a> {
    pub fn new(bridge: &'a Bridge, id: &str) -> Self {
        Scene {
            bridge,
            id: id.to_string(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn value(&self) -> Result<Value> {
        self.bridge.get_scene(Target::Id(self.id.clone()), None)
    }

    pub fn name(&self) -> Result<String> {
        self.attr("name")
    }

    /// Ids of the lights in the scene, in ascending order.
    pub fn lights(&self) -> Result<Vec<u32>> {
        let ids: Vec<String> = self.attr("lights")?;
        let mut lights = ids
            .iter()
            .map(|id| parse_id(Category::Lights, id))
            .collect::<Result<Vec<_>>>()?;
        lights.sort_unstable();
        Ok(lights)
    }

    /// The group a `GroupScene` belongs to.
    pub fn group(&self) -> Result<Option<String>> {
        match self.attr::<String>("group") {
            Ok(group) => Ok(Some(group)),
            Err(Error::AttributeNotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// "LightScene" or "GroupScene".
    pub fn scene_type(&self) -> Result<String> {
        self.attr("type")
    }

    pub fn locked(&self) -> Result<bool> {
        self.attr("locked")
    }

    pub fn owner(&self) -> Result<String> {
        self.attr("owner")
    }

    /// Recall this scene on a group.
    pub fn activate(&self, group: u32, transition: Option<u16>) -> Result<ApiResponse> {
        self.bridge.activate_scene(group, &self.id, transition)
    }

    fn attr<T: DeserializeOwned>(&self, attribute: &str) -> Result<T> {
        self.bridge.attribute(Category::Scenes, &self.id, attribute)
    }
}

impl Bridge {
    /// A handle to the scene with the given id or name.
    pub fn scene(&self, target: impl Into<Target>) -> Result<Scene<'_>> {
        let id = self.resolve_id(Category::Scenes, target)?;
        Ok(Scene::new(self, &id))
    }

    pub fn scenes(&self) -> Result<Vec<Scene<'_>>> {
        Ok(self
            .ids(Category::Scenes)?
            .iter()
            .map(|id| Scene::new(self, id))
            .collect())
    }

    /// Store the current state of a group's lights as a new scene.
    pub fn create_group_scene(&self, name: &str, group: u32) -> Result<String> {
        self.create(
            Category::Scenes,
            &json!({
                "name": name,
                "group": group.to_string(),
                "recycle": true,
                "type": "GroupScene",
            }),
        )
    }

    /// Change scene attributes such as `name` or `lights`.
    pub fn modify_scene(&self, id: &str, data: &Value) -> Result<ApiResponse> {
        self.write(Method::PUT, &format!("/scenes/{id}"), data)
    }

    /// Recall a scene on a group.
    pub fn activate_scene(
        &self,
        group: u32,
        scene: &str,
        transition: Option<u16>,
    ) -> Result<ApiResponse> {
        let mut payload = Payload::new();
        payload.scene(scene);
        if let Some(transition) = transition {
            payload.transition(transition);
        }
        first(self.apply_group(group, &payload)?)
    }

    /// Recall a scene by group and scene name.
    ///
    /// Exactly one group must carry `group_name`. When several scenes carry
    /// `scene_name`, the first one whose lights match the group's lights is
    /// used. Returns `false` when no suitable pair is found.
    pub fn run_scene(
        &self,
        group_name: &str,
        scene_name: &str,
        transition: Option<u16>,
    ) -> Result<bool> {
        let found = self.with_state(|state| Ok(pick_scene(state, group_name, scene_name)))?;
        let Some((group, scene)) = found else {
            return Ok(false);
        };

        info!("Running scene {} on group {}", scene, group);
        let response = self.activate_scene(parse_id(Category::Groups, &group)?, &scene, transition)?;
        Ok(response.is_success())
    }

    pub fn delete_scene(&self, id: &str) -> Result<ApiResponse> {
        self.remove(Category::Scenes, id)
    }
}

fn pick_scene(state: &BridgeState, group_name: &str, scene_name: &str) -> Option<(String, String)> {
    let named = |category: Category, name: &str| -> Vec<String> {
        state
            .ids(category)
            .into_iter()
            .filter(|id| {
                state
                    .entity(category, id)
                    .and_then(|e| e.get("name"))
                    .and_then(Value::as_str)
                    == Some(name)
            })
            .collect()
    };

    let groups = named(Category::Groups, group_name);
    let [group] = groups.as_slice() else {
        warn!(
            "Expected exactly one group named {:?}, found {}",
            group_name,
            groups.len()
        );
        return None;
    };

    let scenes = named(Category::Scenes, scene_name);
    match scenes.as_slice() {
        [] => {
            warn!("No scene named {:?}", scene_name);
            None
        }
        [scene] => Some((group.clone(), scene.clone())),
        _ => {
            let group_lights = sorted_lights(state.entity(Category::Groups, group));
            let scene = scenes
                .iter()
                .find(|id| sorted_lights(state.entity(Category::Scenes, id)) == group_lights);
            if scene.is_none() {
                warn!(
                    "No scene named {:?} matches the lights of group {:?}",
                    scene_name, group_name
                );
            }
            scene.map(|scene| (group.clone(), scene.clone()))
        }
    }
}

fn sorted_lights(entity: Option<&Value>) -> Vec<u32> {
    let mut lights: Vec<u32> = entity
        .and_then(|e| e.get("lights"))
        .and_then(Value::as_array)
        .map(|ids| {
            ids.iter()
                .filter_map(Value::as_str)
                .filter_map(|id| id.parse().ok())
                .collect()
        })
        .unwrap_or_default();
    lights.sort_unstable();
    lights
}
