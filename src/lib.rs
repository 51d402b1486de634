//! # hue_lights_rs
//!
//! A blocking Rust client for the local HTTP API of Philips Hue bridges.
//!
//! A [`Bridge`] is a session with one bridge. It registers an application
//! user, keeps a snapshot of the bridge state, and offers getters and setters
//! for lights, groups, scenes, sensors and schedules. Entities can be
//! addressed by numeric id or by name.
//!
//! ## Quick Start
//!
//! ```no_run
//! use hue_lights_rs::{Bridge, BridgeConfig, LightControl, Payload};
//!
//! fn main() -> Result<(), hue_lights_rs::Error> {
//!     let mut bridge = Bridge::new(BridgeConfig::new("192.168.1.2"))?;
//!
//!     // Press the link button on the bridge before registering.
//!     bridge.connect()?;
//!
//!     // Turn two lights on, identified by id and by name
//!     bridge.set_light(vec!["1", "Desk lamp"], "on", true, None)?;
//!
//!     // Dim a whole room over two seconds
//!     let room = bridge.group("Living room")?.with_transition(20);
//!     let mut payload = Payload::new();
//!     payload.on(true);
//!     payload.brightness(&hue_lights_rs::Brightness::clamped(80));
//!     room.apply(&payload)?;
//!
//!     println!("{:?}", bridge.get_light("Desk lamp", Some("bri"))?);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Registration**: [`Bridge::connect`] obtains a username once the link button is pressed
//! - **Lights and groups**: typed accessors through [`Light`], [`Group`] and [`LightControl`]
//! - **Multi-target writes**: one call, one request per target, results in order
//! - **Scenes**: create, recall by id or by group and scene name
//! - **Sensors and schedules**: create, update and delete
//! - **Diagnostics**: recent requests via [`Bridge::history`] and [`Bridge::diagnostics`]
//!
//! ## Communication
//!
//! Every operation is a blocking HTTP request to `http://<address>/api/...`
//! with the timeout configured in [`BridgeConfig`]. There are no retries.
//! A [`Bridge`] is not `Sync`; share it between threads behind a lock.
//!
//! ## Feature Flags
//!
//! - `cli` (default): builds the `hue` command line tool

mod bridge;
mod config;
mod control;
mod errors;
mod group;
mod history;
mod light;
mod payload;
mod response;
mod scene;
mod schedule;
mod sensor;
mod state;
mod target;
mod types;

// Re-export public API
pub use bridge::Bridge;
pub use config::{BridgeConfig, BridgeInfo};
pub use control::LightControl;
pub use errors::Error;
pub use group::Group;
pub use history::{HistoryEntry, HistorySummary, MessageType, RequestHistory};
pub use light::Light;
pub use payload::Payload;
pub use response::{ApiError, ApiResponse, ResponseItem};
pub use scene::Scene;
pub use schedule::{NewSchedule, ScheduleTarget};
pub use sensor::{NewSensor, Sensor};
pub use state::{BridgeState, Category};
pub use target::{Target, Targets, resolve};
pub use types::{Alert, Brightness, ColorTemp, Effect, Saturation, Xy};
