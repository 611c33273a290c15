//! Probelight Hardware Abstraction Layer
//!
//! This crate defines the hardware seams the rest of the firmware is written
//! against. Chip-specific crates implement them, and test doubles implement
//! them on the host.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  probelight-drivers / firmware          │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  probelight-hal (this crate - traits)   │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ probelight-   │       │ embedded-hal  │
//! │ hal-rp2040    │       │ I2C (EhI2c)   │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`i2c::I2cBus`] - one bounded write/read exchange with classified failures
//! - [`pwm::PwmOutput`] - duty-cycle output that can be started and stopped

#![no_std]
#![deny(unsafe_code)]

pub mod i2c;
pub mod pwm;

// Re-export key traits at crate root for convenience
pub use i2c::{EhI2c, I2cBus, I2cConfig, I2cFailure};
pub use pwm::PwmOutput;
