//! Bridge response types.
//!
//! Write operations on the bridge answer with a list of items, each either a
//! `success` object or an `error` object. Multi-target calls return one such
//! list per target, so partial failures stay visible to the caller.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::Error;

type Result<T> = std::result::Result<T, Error>;

/// A structured error reported by the bridge.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ApiError {
    #[serde(rename = "type")]
    pub kind: u16,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub description: String,
}

impl ApiError {
    pub const UNAUTHORIZED_USER: u16 = 1;
    pub const RESOURCE_NOT_AVAILABLE: u16 = 3;
    pub const INVALID_VALUE: u16 = 7;
    pub const LINK_BUTTON_NOT_PRESSED: u16 = 101;

    pub fn new(kind: u16, address: &str, description: &str) -> Self {
        ApiError {
            kind,
            address: address.to_string(),
            description: description.to_string(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error {}: {}", self.kind, self.description)
    }
}

/// One item of a bridge response list.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ResponseItem {
    Success(Value),
    Error(ApiError),
}

/// The raw response of a single write request.
///
/// # Example
///
/// ```
/// use hue_lights_rs::ApiResponse;
/// use serde_json::json;
///
/// let resp = ApiResponse::parse(json!([
///     {"success": {"/lights/1/state/on": true}},
///     {"error": {"type": 7, "address": "/lights/1/state/bri", "description": "invalid value"}}
/// ])).unwrap();
/// assert!(!resp.is_success());
/// assert_eq!(resp.errors().count(), 1);
/// ```
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(transparent)]
pub struct ApiResponse(Vec<ResponseItem>);

impl ApiResponse {
    /// Parse a bridge answer; a bare object is treated as a single success item.
    pub fn parse(value: Value) -> Result<Self> {
        match value {
            Value::Array(_) => serde_json::from_value(value).map_err(Error::JsonLoad),
            Value::Object(_) => Ok(ApiResponse(vec![ResponseItem::Success(value)])),
            other => Err(Error::UnexpectedResponse(other.to_string())),
        }
    }

    pub fn items(&self) -> &[ResponseItem] {
        &self.0
    }

    pub fn successes(&self) -> impl Iterator<Item = &Value> {
        self.0.iter().filter_map(|item| match item {
            ResponseItem::Success(value) => Some(value),
            ResponseItem::Error(_) => None,
        })
    }

    pub fn errors(&self) -> impl Iterator<Item = &ApiError> {
        self.0.iter().filter_map(|item| match item {
            ResponseItem::Error(err) => Some(err),
            ResponseItem::Success(_) => None,
        })
    }

    pub fn is_success(&self) -> bool {
        self.errors().next().is_none()
    }

    /// Turn the first error item into an [`Error::Bridge`].
    pub fn into_result(self) -> Result<Self> {
        let first = self.errors().next().cloned();
        match first {
            Some(err) => Err(Error::Bridge(err)),
            None => Ok(self),
        }
    }

    /// The id reported by a successful create request.
    pub fn created_id(&self) -> Option<&str> {
        self.successes()
            .find_map(|value| value.get("id"))
            .and_then(Value::as_str)
    }

    /// Iterate over `(address, value)` pairs of success items that report a
    /// changed resource path, such as `/lights/1/state/on`.
    pub(crate) fn changed_paths(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.successes()
            .filter_map(|value| value.as_object())
            .flat_map(|object| object.iter())
            .filter(|(key, _)| key.starts_with('/'))
            .map(|(key, value)| (key.as_str(), value))
    }
}

/// Return the first error object if `value` is a bridge error list.
///
/// Read endpoints answer with an object on success and with an error list on
/// failure.
pub(crate) fn error_in(value: &Value) -> Option<ApiError> {
    value
        .as_array()?
        .iter()
        .find_map(|item| item.get("error"))
        .and_then(|err| serde_json::from_value(err.clone()).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_success_and_error() {
        let resp = ApiResponse::parse(json!([
            {"success": {"/groups/1/action/on": true}},
            {"error": {"type": 201, "address": "/groups/1/action/bri", "description": "parameter not modifiable"}}
        ]))
        .unwrap();

        assert_eq!(resp.items().len(), 2);
        assert_eq!(resp.successes().count(), 1);
        let err = resp.errors().next().unwrap();
        assert_eq!(err.kind, 201);
        assert_eq!(err.address, "/groups/1/action/bri");
        assert!(matches!(resp.into_result(), Err(Error::Bridge(_))));
    }

    #[test]
    fn test_changed_paths_skip_plain_values() {
        let resp = ApiResponse::parse(json!([
            {"success": {"/lights/2/state/bri": 100}},
            {"success": {"id": "7"}},
            {"success": "/sensors/3 deleted"}
        ]))
        .unwrap();

        let paths: Vec<_> = resp.changed_paths().collect();
        assert_eq!(paths, vec![("/lights/2/state/bri", &json!(100))]);
    }

    #[test]
    fn test_created_id() {
        let resp = ApiResponse::parse(json!([{"success": {"id": "7"}}])).unwrap();
        assert_eq!(resp.created_id(), Some("7"));
        let resp = ApiResponse::parse(json!([{"success": "/groups/7 deleted"}])).unwrap();
        assert_eq!(resp.created_id(), None);
    }

    #[test]
    fn test_error_in() {
        let value = json!([{"error": {"type": 1, "address": "/", "description": "unauthorized user"}}]);
        assert_eq!(error_in(&value).unwrap().kind, ApiError::UNAUTHORIZED_USER);
        assert!(error_in(&json!({"lights": {}})).is_none());
    }

    #[test]
    fn test_into_result_keeps_successes() {
        let resp = ApiResponse::parse(json!([{"success": {"id": "3"}}])).unwrap();
        let resp = resp.into_result().unwrap();
        assert_eq!(resp.created_id(), Some("3"));

        let resp = ApiResponse::parse(json!([
            {"error": {"type": 7, "address": "/groups/lights", "description": "invalid value"}}
        ]))
        .unwrap();
        assert_eq!(
            resp.into_result().unwrap_err().to_string(),
            "bridge error 7: invalid value"
        );
    }

    #[test]
    fn test_parse_rejects_scalars() {
        assert!(matches!(
            ApiResponse::parse(json!(42)),
            Err(Error::UnexpectedResponse(_))
        ));
    }
}
