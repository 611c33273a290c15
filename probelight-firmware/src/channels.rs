//! Actors and output slots shared between tasks
//!
//! Each output slot is a `Signal`: a worker overwrites it, the supervisor
//! takes the latest value.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

use probelight_core::device::{LightActor, SensorActor};

/// Sensor actor as shared with the tasks
pub type Sensor = SensorActor<'static, CriticalSectionRawMutex>;

/// Light actor as shared with the tasks
pub type Light = LightActor<CriticalSectionRawMutex>;

/// Sensor detection result
pub static SENSOR_FOUND: Signal<CriticalSectionRawMutex, bool> = Signal::new();

/// Running average of the current reading in °C, or the sentinel for a failed tick
pub static TEMPERATURE: Signal<CriticalSectionRawMutex, f32> = Signal::new();

/// Masked device id
pub static DEVICE_ID: Signal<CriticalSectionRawMutex, u16> = Signal::new();

/// Stored calibration offset in °C
pub static OFFSET: Signal<CriticalSectionRawMutex, f32> = Signal::new();

/// Stored serial number
pub static SERIAL: Signal<CriticalSectionRawMutex, u32> = Signal::new();
