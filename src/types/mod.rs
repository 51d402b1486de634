//! Value types for light control parameters.

mod alert;
mod brightness;
mod color_temp;
mod saturation;
mod xy;

pub use alert::{Alert, Effect};
pub use brightness::Brightness;
pub use color_temp::ColorTemp;
pub use saturation::Saturation;
pub use xy::Xy;
