//! Device profiles and timing policy

/// Register map and bit layout of a guarded-EEPROM temperature sensor
///
/// Registers are 16 bits wide and transferred MSB first. Bit positions refer
/// to the 16-bit register value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorProfile {
    /// Temperature result register
    pub result_reg: u8,
    /// Device identification register
    pub id_reg: u8,
    /// Bits of the identification register that hold the id
    pub id_mask: u16,
    /// EEPROM lock/status register
    pub unlock_reg: u8,
    /// Calibration offset register
    pub offset_reg: u8,
    /// Serial number, upper register pair
    pub serial_high_reg: u8,
    /// Serial number, lower register pair
    pub serial_low_reg: u8,
    /// Bit in the lock register set while the EEPROM is busy
    pub busy_bit: u8,
    /// Bit in the lock register set while the EEPROM is writable
    pub unlocked_bit: u8,
    /// Value written to the lock register to unlock
    pub unlock_pattern: u16,
    /// Value written to the lock register to lock
    pub lock_pattern: u16,
}

impl SensorProfile {
    /// TI TMP117
    pub const TMP117: Self = Self {
        result_reg: 0x00,
        id_reg: 0x0F,
        id_mask: 0x0FFF,
        unlock_reg: 0x04,
        offset_reg: 0x07,
        serial_high_reg: 0x05,
        serial_low_reg: 0x06,
        busy_bit: 14,
        unlocked_bit: 15,
        unlock_pattern: 0x8000,
        lock_pattern: 0x0000,
    };
}

impl Default for SensorProfile {
    fn default() -> Self {
        Self::TMP117
    }
}

/// Retry policy of the memory guard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GuardPolicy {
    /// Attempts after the first status read before giving up
    pub max_attempts: u8,
    /// Delay between attempts in milliseconds
    pub poll_interval_ms: u32,
}

impl Default for GuardPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 15,
            poll_interval_ms: 10,
        }
    }
}

/// Time the EEPROM needs after a write before it can be read back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SettleDelays {
    /// After a calibration offset write
    pub calibration_ms: u32,
    /// After both serial number register pairs are written
    pub serial_ms: u32,
}

impl Default for SettleDelays {
    fn default() -> Self {
        Self {
            calibration_ms: 10,
            serial_ms: 50,
        }
    }
}

/// Timing of everything the sensor worker waits for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorTiming {
    /// Memory guard retry policy
    pub guard: GuardPolicy,
    /// Post-write settle delays
    pub settle: SettleDelays,
    /// Spacing of temperature samples
    pub sample: SampleTiming,
}

/// Spacing of repeated temperature samples
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SampleTiming {
    /// Delay between consecutive samples in milliseconds
    pub interval_ms: u32,
}

impl Default for SampleTiming {
    fn default() -> Self {
        Self { interval_ms: 1000 }
    }
}

/// Timing of the light waveforms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WaveformTiming {
    /// Duration of each on and off half of a blink
    pub blink_half_ms: u32,
    /// Delay between 1% steps of a pulse ramp
    pub pulse_step_ms: u32,
}

impl Default for WaveformTiming {
    fn default() -> Self {
        Self {
            blink_half_ms: 500,
            pulse_step_ms: 5,
        }
    }
}
