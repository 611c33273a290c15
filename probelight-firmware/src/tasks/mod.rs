//! Embassy async tasks
//!
//! One worker task per actor plus the supervisor that drives them.

pub mod light;
pub mod sensor;
pub mod supervisor;

pub use light::{light_task, LightDevice};
pub use sensor::{sensor_task, SensorDevice};
pub use supervisor::{supervisor_task, SupervisorConfig};
