//! RP2040-specific HAL for the probelight firmware
//!
//! Implements the shared `probelight-hal` traits on RP2040 peripherals:
//!
//! - Async I2C with a per-exchange timeout
//! - PWM slice channel output for the indicator light

#![no_std]

pub mod i2c;
pub mod pwm;

pub use i2c::TimedI2c;
pub use pwm::{PwmChannel, SlicePwm};
