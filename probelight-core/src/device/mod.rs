//! Request types and typed operations for each device kind
//!
//! The actor framework is generic over the request type. This module pins
//! it down per device kind and adds the caller-facing operations on top of
//! [`Actor::enqueue`](crate::actor::Actor::enqueue).

pub mod light;
pub mod sensor;

pub use light::{LightActor, LightRequest, MAX_BRIGHTNESS};
pub use sensor::{
    ConfigError, GuardCause, GuardFault, LockState, SensorActor, SensorRequest, WriteOutcome,
    TEMPERATURE_SENTINEL,
};
