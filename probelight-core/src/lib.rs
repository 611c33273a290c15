//! Board-agnostic core logic for the probelight firmware
//!
//! This crate contains everything that does not depend on a specific chip:
//!
//! - The per-device actor: status gate, pending-request slot, worker loop
//! - Cooperative cancellation for repeating operations
//! - Request types and typed operations for the sensor and the light
//! - Device profiles, timing policy and board configuration parsing

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
#[macro_use]
extern crate std;

pub mod actor;
pub mod config;
pub mod device;

pub use actor::{Actor, CancelToken, Device, Enqueue, Identity, Status};
