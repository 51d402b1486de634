//! Timed commands stored on the bridge.

use reqwest::Method;
use serde_json::{Value, json};

use crate::bridge::Bridge;
use crate::errors::Error;
use crate::light::parse_id;
use crate::payload::Payload;
use crate::response::ApiResponse;
use crate::state::Category;
use crate::target::Target;

type Result<T> = std::result::Result<T, Error>;

/// What a schedule acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleTarget {
    Light(u32),
    Group(u32),
}

/// A schedule to create on the bridge.
///
/// `localtime` uses the bridge's time pattern syntax, for example
/// `2026-11-01T07:30:00` for a single run or `W127/T07:30:00` for every day.
///
/// ```
/// use hue_lights_rs::{NewSchedule, Payload, ScheduleTarget};
///
/// let mut wake = Payload::new();
/// wake.on(true);
/// wake.transition(600);
/// let schedule = NewSchedule::new("Wake up", "W124/T06:45:00", ScheduleTarget::Group(1), wake)
///     .with_description("Weekday sunrise");
/// assert_eq!(schedule.target, ScheduleTarget::Group(1));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NewSchedule {
    pub name: String,
    pub description: String,
    pub localtime: String,
    pub target: ScheduleTarget,
    pub payload: Payload,
    pub autodelete: Option<bool>,
}

impl NewSchedule {
    pub fn new(name: &str, localtime: &str, target: ScheduleTarget, payload: Payload) -> Self {
        NewSchedule {
            name: name.to_string(),
            description: " ".to_string(),
            localtime: localtime.to_string(),
            target,
            payload,
            autodelete: None,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// Remove the schedule after its single run.
    pub fn with_autodelete(mut self, autodelete: bool) -> Self {
        self.autodelete = Some(autodelete);
        self
    }

    fn command_address(&self, username: &str) -> String {
        match self.target {
            ScheduleTarget::Light(id) => format!("/api/{username}/lights/{id}/state"),
            ScheduleTarget::Group(id) => format!("/api/{username}/groups/{id}/action"),
        }
    }
}

impl Bridge {
    /// Read a schedule, or one of its attributes.
    pub fn get_schedule(&self, target: impl Into<Target>, attribute: Option<&str>) -> Result<Value> {
        self.get(Category::Schedules, target, attribute)
    }

    /// Create a schedule and return its id.
    pub fn create_schedule(&self, schedule: &NewSchedule) -> Result<u32> {
        let username = self.username().ok_or(Error::Authentication)?;
        let mut body = json!({
            "name": schedule.name,
            "description": schedule.description,
            "localtime": schedule.localtime,
            "command": {
                "address": schedule.command_address(username),
                "method": "PUT",
                "body": Value::Object(schedule.payload.to_body()?),
            },
        });
        if let Some(autodelete) = schedule.autodelete {
            body["autodelete"] = json!(autodelete);
        }

        let id = self.create(Category::Schedules, &body)?;
        parse_id(Category::Schedules, &id)
    }

    /// Change schedule attributes such as `localtime` or `status`.
    pub fn set_schedule_attributes(&self, id: u32, data: &Value) -> Result<ApiResponse> {
        self.write(Method::PUT, &format!("/schedules/{id}"), data)
    }

    pub fn delete_schedule(&self, id: u32) -> Result<ApiResponse> {
        self.remove(Category::Schedules, &id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_address() {
        let mut payload = Payload::new();
        payload.on(false);
        let light = NewSchedule::new("Off", "W127/T23:00:00", ScheduleTarget::Light(4), payload.clone());
        let group = NewSchedule::new("Off", "W127/T23:00:00", ScheduleTarget::Group(2), payload);
        assert_eq!(light.command_address("abc"), "/api/abc/lights/4/state");
        assert_eq!(group.command_address("abc"), "/api/abc/groups/2/action");
    }

    #[test]
    fn test_description_defaults_to_blank() {
        let schedule = NewSchedule::new("Off", "W127/T23:00:00", ScheduleTarget::Light(4), Payload::new());
        assert_eq!(schedule.description, " ");
        assert_eq!(schedule.with_description("Night").description, "Night");
    }
}
