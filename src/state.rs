//! Cached bridge state.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

use crate::errors::Error;
use crate::response::error_in;

type Result<T> = std::result::Result<T, Error>;

/// A category of bridge resources.
///
/// The string form is the path segment used by the bridge API.
///
/// ```
/// use std::str::FromStr;
/// use hue_lights_rs::Category;
///
/// assert_eq!(Category::Lights.as_ref(), "lights");
/// assert_eq!(Category::from_str("groups").unwrap(), Category::Groups);
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Category {
    Lights,
    Groups,
    Scenes,
    Sensors,
    Schedules,
}

impl Category {
    /// Nested objects searched for an attribute after the entity's top level.
    pub(crate) fn sections(&self) -> &'static [&'static str] {
        match self {
            Category::Lights => &["state"],
            Category::Groups => &["state", "action"],
            Category::Sensors => &["state", "config"],
            Category::Scenes | Category::Schedules => &[],
        }
    }

    /// Whether ids in this category are bridge-assigned numbers.
    pub(crate) fn numeric_ids(&self) -> bool {
        !matches!(self, Category::Scenes)
    }
}

/// Snapshot of the full `/api/<username>` answer.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct BridgeState {
    root: Map<String, Value>,
}

impl BridgeState {
    /// Build a snapshot from the bridge answer, rejecting error lists.
    pub fn from_value(value: Value) -> Result<Self> {
        if let Some(err) = error_in(&value) {
            return Err(Error::Bridge(err));
        }
        match value {
            Value::Object(root) => Ok(BridgeState { root }),
            other => Err(Error::UnexpectedResponse(other.to_string())),
        }
    }

    pub fn as_value(&self) -> Value {
        Value::Object(self.root.clone())
    }

    /// The `config` object of the bridge.
    pub fn config(&self) -> Option<&Map<String, Value>> {
        self.root.get("config").and_then(Value::as_object)
    }

    pub fn category(&self, category: Category) -> Option<&Map<String, Value>> {
        self.root.get(category.as_ref()).and_then(Value::as_object)
    }

    pub fn entity(&self, category: Category, id: &str) -> Option<&Value> {
        self.category(category).and_then(|entries| entries.get(id))
    }

    /// Entity ids of a category, numeric ids in ascending order first.
    pub fn ids(&self, category: Category) -> Vec<String> {
        let mut ids: Vec<String> = self
            .category(category)
            .map(|entries| entries.keys().cloned().collect())
            .unwrap_or_default();
        ids.sort_by(|a, b| compare_ids(a, b));
        ids
    }

    /// Id of the first entity (in [`BridgeState::ids`] order) named exactly `name`.
    pub fn find_by_name(&self, category: Category, name: &str) -> Option<String> {
        let entries = self.category(category)?;
        self.ids(category).into_iter().find(|id| {
            entries
                .get(id)
                .and_then(|entity| entity.get("name"))
                .and_then(Value::as_str)
                == Some(name)
        })
    }

    pub(crate) fn insert_entity(&mut self, category: Category, id: &str, entity: Value) {
        let entries = self
            .root
            .entry(category.as_ref())
            .or_insert_with(|| Value::Object(Map::new()));
        if let Some(entries) = entries.as_object_mut() {
            entries.insert(id.to_string(), entity);
        }
    }

    pub(crate) fn remove_entity(&mut self, category: Category, id: &str) -> Option<Value> {
        self.root
            .get_mut(category.as_ref())
            .and_then(Value::as_object_mut)
            .and_then(|entries| entries.remove(id))
    }

    pub(crate) fn replace_category(&mut self, category: Category, entries: Value) {
        self.root.insert(category.as_ref().to_string(), entries);
    }

    /// Write `value` at a bridge resource address such as `/lights/1/state/on`.
    ///
    /// Only existing parent objects are followed; returns `false` when the
    /// address does not lead into the snapshot.
    pub(crate) fn apply(&mut self, address: &str, value: &Value) -> bool {
        let mut segments: Vec<&str> = address.split('/').filter(|s| !s.is_empty()).collect();
        let Some(last) = segments.pop() else {
            return false;
        };

        let mut current = &mut self.root;
        for segment in segments {
            match current.get_mut(segment).and_then(Value::as_object_mut) {
                Some(next) => current = next,
                None => return false,
            }
        }
        current.insert(last.to_string(), value.clone());
        true
    }
}

fn compare_ids(a: &str, b: &str) -> Ordering {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => Ordering::Less,
        (Err(_), Ok(_)) => Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

/// Look up `attribute` in an entity: top level first, then the category's
/// nested sections.
pub(crate) fn lookup_attribute<'a>(
    category: Category,
    entity: &'a Value,
    attribute: &str,
) -> Option<&'a Value> {
    entity.get(attribute).or_else(|| {
        category
            .sections()
            .iter()
            .find_map(|section| entity.get(*section).and_then(|s| s.get(attribute)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> BridgeState {
        BridgeState::from_value(json!({
            "lights": {
                "10": {"name": "Desk", "state": {"on": false, "bri": 10}},
                "2": {"name": "Desk", "state": {"on": true, "bri": 200}},
                "1": {"name": "Kitchen", "state": {"on": true, "bri": 254}, "type": "Extended color light"}
            },
            "groups": {
                "1": {"name": "Living", "lights": ["1", "2"], "state": {"any_on": true, "all_on": false}, "action": {"on": true, "bri": 100}}
            },
            "scenes": {},
            "config": {"name": "Philips hue"}
        }))
        .unwrap()
    }

    #[test]
    fn test_ids_sorted_numerically() {
        assert_eq!(sample().ids(Category::Lights), vec!["1", "2", "10"]);
        assert!(sample().ids(Category::Sensors).is_empty());
    }

    #[test]
    fn test_find_by_name_first_match_wins() {
        let state = sample();
        assert_eq!(state.find_by_name(Category::Lights, "Desk").as_deref(), Some("2"));
        assert_eq!(state.find_by_name(Category::Lights, "Kitchen").as_deref(), Some("1"));
        assert!(state.find_by_name(Category::Lights, "kitchen").is_none());
        assert!(state.find_by_name(Category::Sensors, "Desk").is_none());
    }

    #[test]
    fn test_apply_existing_path() {
        let mut state = sample();
        assert!(state.apply("/lights/1/state/bri", &json!(42)));
        assert_eq!(state.entity(Category::Lights, "1").unwrap()["state"]["bri"], 42);

        assert!(state.apply("/lights/1/name", &json!("Pantry")));
        assert_eq!(state.find_by_name(Category::Lights, "Pantry").as_deref(), Some("1"));
    }

    #[test]
    fn test_apply_missing_parent() {
        let mut state = sample();
        assert!(!state.apply("/lights/99/state/on", &json!(true)));
        assert!(!state.apply("/", &json!(true)));
        assert!(state.entity(Category::Lights, "99").is_none());
    }

    #[test]
    fn test_lookup_attribute_sections() {
        let state = sample();
        let group = state.entity(Category::Groups, "1").unwrap();
        assert_eq!(lookup_attribute(Category::Groups, group, "any_on"), Some(&json!(true)));
        assert_eq!(lookup_attribute(Category::Groups, group, "bri"), Some(&json!(100)));
        assert_eq!(lookup_attribute(Category::Groups, group, "name"), Some(&json!("Living")));
        assert!(lookup_attribute(Category::Groups, group, "hue").is_none());
    }

    #[test]
    fn test_error_list_is_rejected() {
        let err = BridgeState::from_value(json!([
            {"error": {"type": 1, "address": "/", "description": "unauthorized user"}}
        ]))
        .unwrap_err();
        assert!(matches!(err, Error::Bridge(e) if e.kind == 1));
    }

    #[test]
    fn test_insert_and_remove() {
        let mut state = sample();
        state.insert_entity(Category::Sensors, "5", json!({"name": "Switch"}));
        assert_eq!(state.ids(Category::Sensors), vec!["5"]);
        assert!(state.remove_entity(Category::Sensors, "5").is_some());
        assert!(state.remove_entity(Category::Sensors, "5").is_none());
    }
}
