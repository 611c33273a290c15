//! Board wiring and startup behaviour

use heapless::String;

use crate::actor::{bounded_name, MAX_NAME_LEN};

/// Temperature sensor wiring
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorConfig {
    /// Display name
    pub name: String<MAX_NAME_LEN>,
    /// 7-bit I2C address
    pub address: u8,
    /// Bus clock in Hz
    pub i2c_frequency: u32,
    /// SDA pin
    pub sda_pin: u8,
    /// SCL pin
    pub scl_pin: u8,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            name: bounded_name("Probe"),
            address: 0x48,
            i2c_frequency: 400_000,
            sda_pin: 4,
            scl_pin: 5,
        }
    }
}

/// Indicator light wiring
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LightConfig {
    /// Display name
    pub name: String<MAX_NAME_LEN>,
    /// PWM output pin
    pub pin: u8,
    /// PWM counter top (duty resolution)
    pub pwm_top: u16,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            name: bounded_name("Light"),
            pin: 25,
            pwm_top: 10_000,
        }
    }
}

/// What the firmware does on its own after boot
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StartupConfig {
    /// Pulses shown once the sensor has been detected
    pub pulse_count: u8,
    /// Samples averaged per periodic reading
    pub sample_count: u8,
    /// Seconds between periodic readings
    pub sample_period_s: u16,
    /// Blinks shown when the sensor cannot be reached
    pub error_blinks: u8,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            pulse_count: 1,
            sample_count: 3,
            sample_period_s: 30,
            error_blinks: 3,
        }
    }
}

/// Complete board configuration
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BoardConfig {
    /// Temperature sensor
    pub sensor: SensorConfig,
    /// Indicator light
    pub light: LightConfig,
    /// Startup behaviour
    pub startup: StartupConfig,
}

impl BoardConfig {
    /// Create a configuration with default wiring
    pub fn new() -> Self {
        Self::default()
    }
}
