//! Bridge session: registration, requests and the cached bridge state.

use std::cell::RefCell;

use log::{debug, info, warn};
use reqwest::Method;
use reqwest::blocking::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use strum::IntoEnumIterator;

use crate::config::{BridgeConfig, BridgeInfo};
use crate::errors::Error;
use crate::history::{MessageType, RequestHistory};
use crate::payload::Payload;
use crate::response::{ApiError, ApiResponse, ResponseItem, error_in};
use crate::state::{BridgeState, Category, lookup_attribute};
use crate::target::{Target, Targets, resolve, resolve_for_write};

type Result<T> = std::result::Result<T, Error>;

/// A session with one Hue bridge.
///
/// A `Bridge` starts out unregistered unless its [`BridgeConfig`] carries a
/// username. [`Bridge::connect`] performs the registration handshake; every
/// other operation needs a username and fails with
/// [`Error::Authentication`] without one.
///
/// The session keeps a snapshot of the full bridge state. Reads are served
/// from the snapshot (fetching it on first use); writes go to the bridge
/// immediately and the changes the bridge reports are applied to the
/// snapshot. Call [`Bridge::refresh`] to pick up changes made elsewhere.
///
/// All calls block for the duration of their HTTP round-trips. The session is
/// not `Sync`; callers sharing it across threads must serialize access.
///
/// # Example
///
/// ```no_run
/// use hue_lights_rs::{Bridge, BridgeConfig};
///
/// # fn main() -> Result<(), hue_lights_rs::Error> {
/// let mut bridge = Bridge::new(BridgeConfig::new("192.168.1.2"))?;
/// bridge.connect()?; // press the link button first
/// println!("username: {}", bridge.username().unwrap_or_default());
///
/// bridge.set_light([1u32, 2], "on", true, None)?;
/// let bri = bridge.get_light("Kitchen", Some("bri"))?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Bridge {
    config: BridgeConfig,
    client: Client,
    state: RefCell<Option<BridgeState>>,
    history: RefCell<RequestHistory>,
}

impl Bridge {
    /// Create a session. No request is made until the first operation.
    pub fn new(config: BridgeConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::transport("INIT", &config.address, e))?;

        Ok(Bridge {
            config,
            client,
            state: RefCell::new(None),
            history: RefCell::new(RequestHistory::new()),
        })
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn address(&self) -> &str {
        &self.config.address
    }

    pub fn username(&self) -> Option<&str> {
        self.config.username.as_deref()
    }

    pub fn is_registered(&self) -> bool {
        self.config.username.is_some()
    }

    /// Register with the bridge unless a username is already known.
    ///
    /// Fails with [`Error::Registration`] when the link button was not
    /// pressed in the last 30 seconds, and with [`Error::Bridge`] for any
    /// other refusal. The session then stays unregistered and the call can
    /// be retried.
    pub fn connect(&mut self) -> Result<()> {
        if let Some(username) = &self.config.username {
            info!("Using username {} for bridge at {}", username, self.config.address);
            return Ok(());
        }

        info!(
            "Registering {} with bridge at {}",
            self.config.devicetype(),
            self.config.address
        );
        let body = json!({"devicetype": self.config.devicetype()});
        let response = ApiResponse::parse(self.request(Method::POST, "/api", Some(&body))?)?;

        for item in response.items() {
            match item {
                ResponseItem::Success(value) => {
                    if let Some(username) = value.get("username").and_then(Value::as_str) {
                        info!("Registered with bridge at {}", self.config.address);
                        self.config.username = Some(username.to_string());
                        return Ok(());
                    }
                }
                ResponseItem::Error(err) if err.kind == ApiError::LINK_BUTTON_NOT_PRESSED => {
                    warn!("The link button on the bridge has not been pressed");
                    return Err(Error::Registration(err.clone()));
                }
                ResponseItem::Error(err) => return Err(Error::Bridge(err.clone())),
            }
        }

        Err(Error::UnexpectedResponse(format!(
            "no username in registration response: {:?}",
            response
        )))
    }

    /// Fetch the full bridge state, replace the snapshot and return it.
    pub fn get_api(&self) -> Result<Value> {
        self.refresh()?;
        Ok(self
            .state
            .borrow()
            .as_ref()
            .map(BridgeState::as_value)
            .unwrap_or(Value::Null))
    }

    /// Replace the snapshot with a fresh copy of the bridge state.
    ///
    /// On failure the previous snapshot is kept.
    pub fn refresh(&self) -> Result<()> {
        let address = self.user_path("")?;
        let state = BridgeState::from_value(self.request(Method::GET, &address, None)?)?;
        *self.state.borrow_mut() = Some(state);
        Ok(())
    }

    /// A copy of the current snapshot, without contacting the bridge.
    pub fn cached_state(&self) -> Option<BridgeState> {
        self.state.borrow().clone()
    }

    /// Drop the snapshot; the next read fetches it again.
    pub fn invalidate(&self) {
        self.state.borrow_mut().take();
    }

    /// Resolve a target to the id of an existing entity.
    pub fn resolve_id(&self, category: Category, target: impl Into<Target>) -> Result<String> {
        let target = target.into();
        self.with_state(|state| resolve(state, category, &target))
    }

    /// Ids of all entities of a category, in ascending order.
    pub fn ids(&self, category: Category) -> Result<Vec<String>> {
        self.with_state(|state| Ok(state.ids(category)))
    }

    /// Read an entity, or one of its attributes, from the snapshot.
    ///
    /// Attributes are searched at the top level of the entity first, then in
    /// its nested `state`/`action`/`config` objects.
    pub fn get(
        &self,
        category: Category,
        target: impl Into<Target>,
        attribute: Option<&str>,
    ) -> Result<Value> {
        let target = target.into();
        self.ensure_registered()?;
        if category == Category::Groups && target == Target::Id("0".to_string()) {
            self.load_group_zero()?;
        }

        self.with_state(|state| {
            let id = resolve(state, category, &target)?;
            let entity = state
                .entity(category, &id)
                .ok_or_else(|| Error::not_found(category, &id))?;
            match attribute {
                None => Ok(entity.clone()),
                Some(attribute) => lookup_attribute(category, entity, attribute)
                    .cloned()
                    .ok_or_else(|| Error::attribute_not_found(category, &id, attribute)),
            }
        })
    }

    pub fn get_light(&self, target: impl Into<Target>, attribute: Option<&str>) -> Result<Value> {
        self.get(Category::Lights, target, attribute)
    }

    pub fn get_group(&self, target: impl Into<Target>, attribute: Option<&str>) -> Result<Value> {
        self.get(Category::Groups, target, attribute)
    }

    pub fn get_scene(&self, target: impl Into<Target>, attribute: Option<&str>) -> Result<Value> {
        self.get(Category::Scenes, target, attribute)
    }

    pub fn get_sensor(&self, target: impl Into<Target>, attribute: Option<&str>) -> Result<Value> {
        self.get(Category::Sensors, target, attribute)
    }

    /// Set one attribute on one or more lights.
    ///
    /// Names are resolved before any request is made; an unknown name fails
    /// the whole call with [`Error::NotFound`]. Each light then gets its own
    /// PUT, and the bridge's answer for each is returned in order. Errors the
    /// bridge reports for individual lights are returned inline, not raised.
    ///
    /// `transitiontime` is in deciseconds.
    pub fn set_light(
        &self,
        targets: impl Into<Targets>,
        parameter: &str,
        value: impl Serialize,
        transitiontime: Option<u16>,
    ) -> Result<Vec<ApiResponse>> {
        let suffix = if parameter == "name" { "" } else { "/state" };
        let body = single_body(parameter, value, state_only(suffix, transitiontime))?;
        self.put_each(Category::Lights, &targets.into(), &body, suffix)
    }

    /// Apply a multi-attribute [`Payload`] to one or more lights.
    pub fn apply_light(
        &self,
        targets: impl Into<Targets>,
        payload: &Payload,
    ) -> Result<Vec<ApiResponse>> {
        let body = payload.to_body()?;
        self.put_each(Category::Lights, &targets.into(), &body, "/state")
    }

    /// Set one attribute on one or more groups.
    ///
    /// `name` and `lights` change the group itself; anything else is sent as
    /// an action to all lights of the group. Light ids for `lights` may be
    /// given as numbers. Partial failures behave as in [`Bridge::set_light`].
    pub fn set_group(
        &self,
        targets: impl Into<Targets>,
        parameter: &str,
        value: impl Serialize,
        transitiontime: Option<u16>,
    ) -> Result<Vec<ApiResponse>> {
        let suffix = match parameter {
            "name" | "lights" => "",
            _ => "/action",
        };
        let mut body = single_body(parameter, value, state_only(suffix, transitiontime))?;
        if let Some(lights) = body.get_mut("lights") {
            *lights = light_id_list(lights);
        }
        self.put_each(Category::Groups, &targets.into(), &body, suffix)
    }

    /// Apply a multi-attribute [`Payload`] as an action on one or more groups.
    pub fn apply_group(
        &self,
        targets: impl Into<Targets>,
        payload: &Payload,
    ) -> Result<Vec<ApiResponse>> {
        let body = payload.to_body()?;
        self.put_each(Category::Groups, &targets.into(), &body, "/action")
    }

    /// The bridge's name.
    pub fn name(&self) -> Result<String> {
        let config = self.request(Method::GET, &self.user_path("/config")?, None)?;
        if let Some(err) = error_in(&config) {
            return Err(Error::Bridge(err));
        }
        config
            .get("name")
            .and_then(Value::as_str)
            .map(String::from)
            .ok_or_else(|| Error::UnexpectedResponse(config.to_string()))
    }

    pub fn set_name(&self, name: &str) -> Result<ApiResponse> {
        self.write(Method::PUT, "/config", &json!({"name": name}))
    }

    /// Selected fields of the bridge configuration.
    pub fn info(&self) -> Result<BridgeInfo> {
        let config = self.request(Method::GET, &self.user_path("/config")?, None)?;
        if let Some(err) = error_in(&config) {
            return Err(Error::Bridge(err));
        }
        serde_json::from_value(config).map_err(Error::JsonLoad)
    }

    /// A copy of the recent request history.
    pub fn history(&self) -> RequestHistory {
        self.history.borrow().clone()
    }

    pub fn clear_history(&self) {
        self.history.borrow_mut().clear();
    }

    /// Returns diagnostics including connection details, snapshot and history.
    pub fn diagnostics(&self) -> Value {
        let mut diag = json!({
            "address": self.config.address,
            "devicetype": self.config.devicetype(),
            "registered": self.is_registered(),
            "timeout_secs": self.config.timeout.as_secs_f64(),
        });

        diag["history"] =
            serde_json::to_value(self.history.borrow().summary()).unwrap_or(Value::Null);

        if let Some(state) = self.state.borrow().as_ref() {
            let counts: Map<String, Value> = Category::iter()
                .map(|category| (category.to_string(), json!(state.ids(category).len())))
                .collect();
            diag["cached"] = Value::Object(counts);
        }

        diag
    }

    /// Decode one attribute of an entity.
    pub(crate) fn attribute<T: DeserializeOwned>(
        &self,
        category: Category,
        id: &str,
        attribute: &str,
    ) -> Result<T> {
        let value = self.get(category, Target::Id(id.to_string()), Some(attribute))?;
        serde_json::from_value(value).map_err(Error::JsonLoad)
    }

    /// Send a write for a path below `/api/<username>` and apply its changes.
    pub(crate) fn write(&self, method: Method, suffix: &str, body: &Value) -> Result<ApiResponse> {
        let address = self.user_path(suffix)?;
        let response = ApiResponse::parse(self.request(method, &address, Some(body))?)?;
        self.apply_changes(&response);
        Ok(response)
    }

    /// Send a DELETE for a path below `/api/<username>`.
    pub(crate) fn delete(&self, suffix: &str) -> Result<ApiResponse> {
        let address = self.user_path(suffix)?;
        ApiResponse::parse(self.request(Method::DELETE, &address, None)?)
    }

    /// Send a GET for a path below `/api/<username>`, rejecting error lists.
    pub(crate) fn read(&self, suffix: &str) -> Result<Value> {
        let value = self.request(Method::GET, &self.user_path(suffix)?, None)?;
        match error_in(&value) {
            Some(err) => Err(Error::Bridge(err)),
            None => Ok(value),
        }
    }

    pub(crate) fn with_state<T>(&self, f: impl FnOnce(&BridgeState) -> Result<T>) -> Result<T> {
        self.ensure_registered()?;
        if self.state.borrow().is_none() {
            self.refresh()?;
        }
        let state = self.state.borrow();
        match state.as_ref() {
            Some(state) => f(state),
            None => Err(Error::UnexpectedResponse("bridge state unavailable".to_string())),
        }
    }

    /// Re-read one category into the snapshot, if there is a snapshot.
    pub(crate) fn refresh_category(&self, category: Category) -> Result<()> {
        if self.state.borrow().is_none() {
            return Ok(());
        }
        let entries = self.read(&format!("/{category}"))?;
        self.update_state(|state| state.replace_category(category, entries));
        Ok(())
    }

    /// POST a new entity and return the id the bridge assigned.
    pub(crate) fn create(&self, category: Category, body: &Value) -> Result<String> {
        let response = self
            .write(Method::POST, &format!("/{category}"), body)?
            .into_result()?;
        let id = response
            .created_id()
            .map(String::from)
            .ok_or_else(|| Error::UnexpectedResponse(format!("{:?}", response)))?;
        info!("Created {} {}", category, id);
        self.refresh_category(category)?;
        Ok(id)
    }

    /// DELETE an entity and drop it from the snapshot.
    pub(crate) fn remove(&self, category: Category, id: &str) -> Result<ApiResponse> {
        let response = self.delete(&format!("/{category}/{id}"))?;
        if response.is_success() {
            self.update_state(|state| {
                state.remove_entity(category, id);
            });
        }
        Ok(response)
    }

    pub(crate) fn update_state(&self, f: impl FnOnce(&mut BridgeState)) {
        if let Some(state) = self.state.borrow_mut().as_mut() {
            f(state);
        }
    }

    fn put_each(
        &self,
        category: Category,
        targets: &Targets,
        body: &Map<String, Value>,
        suffix: &str,
    ) -> Result<Vec<ApiResponse>> {
        self.ensure_registered()?;
        let ids = self.resolve_targets(category, targets)?;
        let body = Value::Object(body.clone());

        let mut results = Vec::with_capacity(ids.len());
        for id in ids {
            let response = self.write(Method::PUT, &format!("/{category}/{id}{suffix}"), &body)?;
            for err in response.errors() {
                warn!("ERROR: {} for {} {}", err.description, category, id);
            }
            results.push(response);
        }

        debug!("{:?}", results);
        Ok(results)
    }

    fn resolve_targets(&self, category: Category, targets: &Targets) -> Result<Vec<String>> {
        if targets.has_names() {
            self.with_state(|state| {
                targets
                    .iter()
                    .map(|target| resolve_for_write(Some(state), category, target))
                    .collect()
            })
        } else {
            targets
                .iter()
                .map(|target| resolve_for_write(None, category, target))
                .collect()
        }
    }

    fn apply_changes(&self, response: &ApiResponse) {
        self.update_state(|state| {
            for (address, value) in response.changed_paths() {
                if !state.apply(address, value) {
                    debug!("{} is not in the cached state", address);
                }
            }
        });
    }

    // Group 0 holds all lights and is not part of the `/groups` listing.
    fn load_group_zero(&self) -> Result<()> {
        let cached = self.with_state(|state| Ok(state.entity(Category::Groups, "0").is_some()))?;
        if !cached {
            let group = self.read("/groups/0")?;
            self.update_state(|state| state.insert_entity(Category::Groups, "0", group));
        }
        Ok(())
    }

    fn ensure_registered(&self) -> Result<()> {
        if self.is_registered() {
            Ok(())
        } else {
            Err(Error::Authentication)
        }
    }

    fn user_path(&self, suffix: &str) -> Result<String> {
        match &self.config.username {
            Some(username) => Ok(format!("/api/{}{}", username, suffix)),
            None => Err(Error::Authentication),
        }
    }

    fn request(&self, method: Method, address: &str, body: Option<&Value>) -> Result<Value> {
        let url = format!("http://{}{}", self.config.address, address);
        debug!("{} {} {:?}", method, address, body);
        self.history
            .borrow_mut()
            .record(MessageType::Request, method.as_str(), address, body);

        let mut builder = self.client.request(method.clone(), &url);
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let result = builder
            .send()
            .map_err(|e| Error::transport(method.as_str(), &url, e))
            .and_then(|response| {
                let status = response.status();
                if !status.is_success() {
                    return Err(Error::Status {
                        method: method.to_string(),
                        url: url.clone(),
                        status: status.as_u16(),
                    });
                }
                response
                    .text()
                    .map_err(|e| Error::transport(method.as_str(), &url, e))
            })
            .and_then(|text| serde_json::from_str::<Value>(&text).map_err(Error::JsonLoad));

        let mut history = self.history.borrow_mut();
        match &result {
            Ok(value) => history.record(MessageType::Response, method.as_str(), address, Some(value)),
            Err(e) => {
                warn!("{}", e);
                history.record_error(&e.to_string());
            }
        }
        result
    }
}

/// Attribute writes on the entity resource itself take no transition time.
fn state_only(suffix: &str, transitiontime: Option<u16>) -> Option<u16> {
    if suffix.is_empty() && transitiontime.is_some() {
        debug!("Ignoring transition time for an attribute write");
        return None;
    }
    transitiontime
}

fn single_body(
    parameter: &str,
    value: impl Serialize,
    transitiontime: Option<u16>,
) -> Result<Map<String, Value>> {
    let mut body = Map::new();
    body.insert(
        parameter.to_string(),
        serde_json::to_value(value).map_err(Error::JsonDump)?,
    );
    if let Some(transitiontime) = transitiontime {
        body.insert("transitiontime".to_string(), json!(transitiontime));
    }
    Ok(body)
}

/// The bridge expects light ids in a group as strings.
fn light_id_list(value: &Value) -> Value {
    let to_id = |v: &Value| match v {
        Value::Number(n) => Value::String(n.to_string()),
        other => other.clone(),
    };
    match value {
        Value::Array(items) => Value::Array(items.iter().map(to_id).collect()),
        single => Value::Array(vec![to_id(single)]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unregistered() -> Bridge {
        Bridge::new(BridgeConfig::new("127.0.0.1:9")).unwrap()
    }

    #[test]
    fn test_operations_require_registration() {
        let bridge = unregistered();
        assert_eq!(bridge.get_light(1u32, None).unwrap_err(), Error::Authentication);
        assert_eq!(
            bridge.set_light([1u32, 2], "on", true, None).unwrap_err(),
            Error::Authentication
        );
        assert_eq!(bridge.get_api().unwrap_err(), Error::Authentication);
        assert_eq!(bridge.name().unwrap_err(), Error::Authentication);
        assert!(bridge.history().is_empty());
    }

    #[test]
    fn test_single_body_with_transition() {
        let body = single_body("bri", 120, Some(5)).unwrap();
        assert_eq!(Value::Object(body), json!({"bri": 120, "transitiontime": 5}));
    }

    #[test]
    fn test_light_id_list() {
        assert_eq!(light_id_list(&json!([1, "2", 3])), json!(["1", "2", "3"]));
        assert_eq!(light_id_list(&json!(4)), json!(["4"]));
    }

    #[test]
    fn test_diagnostics_without_state() {
        let bridge = unregistered();
        let diag = bridge.diagnostics();
        assert_eq!(diag["registered"], false);
        assert_eq!(diag["devicetype"], "hue_lights_rs#rust");
        assert!(diag.get("cached").is_none());
    }
}
