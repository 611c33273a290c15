//! Peripheral drivers
//!
//! Concrete [`Device`](probelight_core::Device) implementations that the
//! actor workers run:
//!
//! - TMP117 precision temperature sensor (memory guard, verified EEPROM
//!   values, multi-sample averaging)
//! - PWM indicator light (steady brightness, blink, pulse)

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
#[macro_use]
extern crate std;

// Must stay first so the logging macros are in scope below
#[macro_use]
mod fmt;

pub mod light;
pub mod sensor;

pub use light::PwmLight;
pub use sensor::Tmp117;
