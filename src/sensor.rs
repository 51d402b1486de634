//! Sensors, including the virtual CLIP sensors apps can create.

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::bridge::Bridge;
use crate::errors::Error;
use crate::light::parse_id;
use crate::response::ApiResponse;
use crate::state::Category;
use crate::target::Target;

type Result<T> = std::result::Result<T, Error>;

/// A handle to one sensor on a bridge.
#[derive(Debug, Clone, Copy)]
pub struct Sensor<'a> {
    bridge: &'a Bridge,
    id: u32,
}

impl<'a> Sensor<'a> {
    pub fn new(bridge: &'a Bridge, id: u32) -> Self {
        Sensor { bridge, id }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn value(&self) -> Result<Value> {
        self.bridge.get_sensor(self.id, None)
    }

    pub fn name(&self) -> Result<String> {
        self.attr("name")
    }

    pub fn set_name(&self, name: &str) -> Result<ApiResponse> {
        self.bridge.set_sensor(self.id, "name", name)
    }

    /// Sensor type, e.g. "ZLLPresence" or "CLIPGenericStatus".
    pub fn sensor_type(&self) -> Result<String> {
        self.attr("type")
    }

    pub fn modelid(&self) -> Result<String> {
        self.attr("modelid")
    }

    pub fn manufacturername(&self) -> Result<String> {
        self.attr("manufacturername")
    }

    pub fn uniqueid(&self) -> Result<String> {
        self.attr("uniqueid")
    }

    pub fn swversion(&self) -> Result<String> {
        self.attr("swversion")
    }

    pub fn state(&self) -> Result<Map<String, Value>> {
        self.attr("state")
    }

    pub fn set_state(&self, state: Map<String, Value>) -> Result<ApiResponse> {
        self.bridge.set_sensor_state(self.id, state)
    }

    pub fn config(&self) -> Result<Map<String, Value>> {
        self.attr("config")
    }

    pub fn set_config(&self, config: Map<String, Value>) -> Result<ApiResponse> {
        self.bridge.set_sensor_config(self.id, config)
    }

    /// Whether the bridge may delete the sensor once nothing references it.
    pub fn recycle(&self) -> Result<Option<bool>> {
        match self.attr("recycle") {
            Ok(recycle) => Ok(Some(recycle)),
            Err(Error::AttributeNotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn attr<T: DeserializeOwned>(&self, attribute: &str) -> Result<T> {
        self.bridge
            .attribute(Category::Sensors, &self.id.to_string(), attribute)
    }
}

/// A sensor to create on the bridge.
///
/// ```
/// use hue_lights_rs::NewSensor;
/// use serde_json::json;
///
/// let sensor = NewSensor::new("Movie mode", "CLIPGenericFlag", "movie-mode-1")
///     .with_state(json!({"flag": false}));
/// assert_eq!(sensor.modelid, "CLIPGenericFlag");
/// ```
#[serde_with::skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct NewSensor {
    pub name: String,
    pub modelid: String,
    pub swversion: String,
    #[serde(rename = "type")]
    pub sensor_type: String,
    pub uniqueid: String,
    pub manufacturername: String,
    pub state: Option<Value>,
    pub config: Option<Value>,
    pub recycle: Option<bool>,
}

impl NewSensor {
    /// A CLIP sensor; the type doubles as the model id.
    pub fn new(name: &str, sensor_type: &str, uniqueid: &str) -> Self {
        NewSensor {
            name: name.to_string(),
            modelid: sensor_type.to_string(),
            swversion: "1.0".to_string(),
            sensor_type: sensor_type.to_string(),
            uniqueid: uniqueid.to_string(),
            manufacturername: env!("CARGO_PKG_NAME").to_string(),
            state: None,
            config: None,
            recycle: None,
        }
    }

    pub fn with_state(mut self, state: Value) -> Self {
        self.state = Some(state);
        self
    }

    pub fn with_config(mut self, config: Value) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_recycle(mut self, recycle: bool) -> Self {
        self.recycle = Some(recycle);
        self
    }
}

impl Bridge {
    /// A handle to the sensor with the given id or name.
    pub fn sensor(&self, target: impl Into<Target>) -> Result<Sensor<'_>> {
        let id = self.resolve_id(Category::Sensors, target)?;
        Ok(Sensor::new(self, parse_id(Category::Sensors, &id)?))
    }

    pub fn sensors(&self) -> Result<Vec<Sensor<'_>>> {
        self.ids(Category::Sensors)?
            .iter()
            .map(|id| Ok(Sensor::new(self, parse_id(Category::Sensors, id)?)))
            .collect()
    }

    /// Set a top-level sensor attribute such as `name`.
    pub fn set_sensor(
        &self,
        id: u32,
        parameter: &str,
        value: impl Serialize,
    ) -> Result<ApiResponse> {
        let mut body = Map::new();
        body.insert(
            parameter.to_string(),
            serde_json::to_value(value).map_err(Error::JsonDump)?,
        );
        self.write(Method::PUT, &format!("/sensors/{id}"), &Value::Object(body))
    }

    /// Update the `state` section of a sensor.
    pub fn set_sensor_state(&self, id: u32, state: Map<String, Value>) -> Result<ApiResponse> {
        self.set_sensor_section(id, "state", state)
    }

    /// Update the `config` section of a sensor.
    pub fn set_sensor_config(&self, id: u32, config: Map<String, Value>) -> Result<ApiResponse> {
        self.set_sensor_section(id, "config", config)
    }

    /// Create a sensor and return its id.
    pub fn create_sensor(&self, sensor: &NewSensor) -> Result<u32> {
        let body = serde_json::to_value(sensor).map_err(Error::JsonDump)?;
        let id = self.create(Category::Sensors, &body)?;
        parse_id(Category::Sensors, &id)
    }

    pub fn delete_sensor(&self, id: u32) -> Result<ApiResponse> {
        self.remove(Category::Sensors, &id.to_string())
    }

    fn set_sensor_section(
        &self,
        id: u32,
        section: &str,
        mut data: Map<String, Value>,
    ) -> Result<ApiResponse> {
        // Read-only on the bridge; sending it fails the whole request.
        data.remove("lastupdated");
        self.write(
            Method::PUT,
            &format!("/sensors/{id}/{section}"),
            &Value::Object(data),
        )
    }
}
