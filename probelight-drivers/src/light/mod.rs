//! Indicator light drivers

pub mod pwm_light;
pub mod waveform;

pub use pwm_light::PwmLight;
pub use waveform::{brightness_to_duty, pulse_ramp};
