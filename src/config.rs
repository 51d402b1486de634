//! Bridge connection settings and bridge configuration info.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_with::DurationSecondsWithFrac;

/// Settings needed to talk to one bridge.
///
/// The username is issued by the bridge during registration and must be
/// persisted by the caller between runs.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use hue_lights_rs::BridgeConfig;
///
/// let config = BridgeConfig::new("192.168.1.2")
///     .with_username("1028d66426293e821ecfd9ef1a0731df")
///     .with_timeout(Duration::from_secs(3));
/// assert_eq!(config.devicetype(), "hue_lights_rs#rust");
/// ```
#[serde_with::serde_as]
#[serde_with::skip_serializing_none]
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BridgeConfig {
    /// Host or `host:port` of the bridge
    pub address: String,
    pub app_name: String,
    pub device_name: String,
    pub username: Option<String>,
    #[serde_as(as = "DurationSecondsWithFrac<f64>")]
    #[serde(default = "default_timeout")]
    pub timeout: Duration,
}

impl BridgeConfig {
    pub const DEFAULT_APP_NAME: &'static str = "hue_lights_rs";
    pub const DEFAULT_DEVICE_NAME: &'static str = "rust";
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new(address: &str) -> Self {
        BridgeConfig {
            address: address.to_string(),
            app_name: Self::DEFAULT_APP_NAME.to_string(),
            device_name: Self::DEFAULT_DEVICE_NAME.to_string(),
            username: None,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    pub fn with_username(mut self, username: &str) -> Self {
        self.username = Some(username.to_string());
        self
    }

    /// Application and device names sent during registration.
    pub fn with_app(mut self, app_name: &str, device_name: &str) -> Self {
        self.app_name = app_name.to_string();
        self.device_name = device_name.to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The `devicetype` sent with the registration request.
    pub fn devicetype(&self) -> String {
        format!("{}#{}", self.app_name, self.device_name)
    }
}

fn default_timeout() -> Duration {
    BridgeConfig::DEFAULT_TIMEOUT
}

/// Selected fields of the bridge `config` object.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct BridgeInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub bridgeid: Option<String>,
    #[serde(default)]
    pub mac: Option<String>,
    #[serde(default)]
    pub ipaddress: Option<String>,
    #[serde(default)]
    pub modelid: Option<String>,
    #[serde(default)]
    pub swversion: Option<String>,
    #[serde(default)]
    pub apiversion: Option<String>,
    #[serde(default)]
    pub zigbeechannel: Option<u8>,
    #[serde(default)]
    pub linkbutton: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let config = BridgeConfig::new("10.0.0.2");
        assert!(config.username.is_none());
        assert_eq!(config.timeout, BridgeConfig::DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_devicetype() {
        let config = BridgeConfig::new("10.0.0.2").with_app("kitchen-panel", "pi");
        assert_eq!(config.devicetype(), "kitchen-panel#pi");
    }

    #[test]
    fn test_config_serde() {
        let config: BridgeConfig = serde_json::from_value(json!({
            "address": "10.0.0.2",
            "app_name": "a",
            "device_name": "b",
            "timeout": 2.5
        }))
        .unwrap();
        assert_eq!(config.timeout, Duration::from_millis(2500));
        assert!(config.username.is_none());

        let value = serde_json::to_value(&config).unwrap();
        assert!(value.get("username").is_none());
        assert_eq!(value["timeout"], json!(2.5));

        let config: BridgeConfig = serde_json::from_value(json!({
            "address": "10.0.0.2",
            "app_name": "a",
            "device_name": "b"
        }))
        .unwrap();
        assert_eq!(config.timeout, BridgeConfig::DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_bridge_info_partial() {
        let info: BridgeInfo = serde_json::from_value(json!({
            "name": "Philips hue",
            "apiversion": "1.50.0",
            "whitelist": {}
        }))
        .unwrap();
        assert_eq!(info.name, "Philips hue");
        assert_eq!(info.apiversion.as_deref(), Some("1.50.0"));
        assert!(info.mac.is_none());
    }
}
