//! Temperature sensor requests, outcomes and typed operations

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::signal::Signal;
use embedded_hal_async::delay::DelayNs;
use probelight_hal::I2cFailure;

use crate::actor::{Actor, Enqueue};

/// Temperature written to an output slot when a sample could not be taken
///
/// Below absolute zero, so it can never be confused with a reading.
pub const TEMPERATURE_SENTINEL: f32 = -296.0;

/// Outcome slot for write-then-verify operations
pub type WriteOutcome<M> = Signal<M, Result<(), ConfigError>>;

/// Sensor actor
pub type SensorActor<'a, M> = Actor<M, SensorRequest<'a, M>>;

/// Direction the memory guard drives the protected region towards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LockState {
    /// Write-protected; safe for reads
    Locked,
    /// Writable
    Unlocked,
}

/// Why the memory guard gave up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GuardCause {
    /// A status read or lock write did not complete
    Transport(I2cFailure),
    /// The region never settled in the target state within the attempt budget
    Timeout,
}

/// Memory guard failure with the last observed region state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GuardFault {
    /// What ended the attempt
    pub cause: GuardCause,
    /// Region was mid-operation at the last status read
    pub busy: bool,
    /// Region was not in the requested lock state at the last status read
    pub wrong_lock: bool,
}

impl GuardFault {
    /// Busy was observed
    pub const BUSY: u8 = 1 << 0;
    /// Wrong lock state was observed
    pub const WRONG_LOCK: u8 = 1 << 1;
    /// Transport failure
    pub const TRANSPORT: u8 = 1 << 2;
    /// Attempt budget exhausted
    pub const TIMEOUT: u8 = 1 << 3;

    /// Compatible status word for this fault
    pub fn bits(&self) -> u8 {
        let mut bits = 0;
        if self.busy {
            bits |= Self::BUSY;
        }
        if self.wrong_lock {
            bits |= Self::WRONG_LOCK;
        }
        bits |= match self.cause {
            GuardCause::Transport(_) => Self::TRANSPORT,
            GuardCause::Timeout => Self::TIMEOUT,
        };
        bits
    }

    /// Status word for a whole guard result; zero means success
    pub fn status_word(result: Result<(), GuardFault>) -> u8 {
        match result {
            Ok(()) => 0,
            Err(fault) => fault.bits(),
        }
    }
}

/// Failure of a persisted-configuration read or write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// No meaningful exchange took place
    Transport(I2cFailure),
    /// The protected region could not be brought into the required state
    Guard(GuardFault),
    /// The write went through but the device reads back something else
    Verification,
    /// Value cannot be represented in the device encoding
    InvalidValue,
}

impl ConfigError {
    /// Check whether this failure means the bus itself did not deliver
    pub fn is_transport(&self) -> bool {
        matches!(self, ConfigError::Transport(_))
    }

    /// Human-readable text for log lines
    ///
    /// Transport failures report the bus-level description.
    pub fn description(&self) -> &'static str {
        match self {
            ConfigError::Transport(e) => e.description(),
            ConfigError::Guard(fault) if fault.busy => "EEPROM stayed busy",
            ConfigError::Guard(_) => "EEPROM lock state did not change",
            ConfigError::Verification => "read back differs from value written",
            ConfigError::InvalidValue => "value not representable by the device",
        }
    }
}

impl From<I2cFailure> for ConfigError {
    fn from(e: I2cFailure) -> Self {
        ConfigError::Transport(e)
    }
}

impl From<GuardFault> for ConfigError {
    fn from(fault: GuardFault) -> Self {
        match fault.cause {
            GuardCause::Transport(e) => ConfigError::Transport(e),
            GuardCause::Timeout => ConfigError::Guard(fault),
        }
    }
}

/// Operations the sensor worker understands
///
/// Read requests carry the slot the result is published to. A failed read
/// leaves its slot untouched, except temperature samples which publish
/// [`TEMPERATURE_SENTINEL`].
pub enum SensorRequest<'a, M: RawMutex> {
    /// Probe the device address
    Detect {
        /// Receives `true` when the device acknowledged
        found: &'a Signal<M, bool>,
    },
    /// Take `count` samples one tick apart, publishing the running average
    ReadTemperature {
        /// Number of samples
        count: u8,
        /// Receives the running average (°C) after every tick
        average: &'a Signal<M, f32>,
    },
    /// Read the device identification number
    ReadIdentity {
        /// Receives the masked id
        id: &'a Signal<M, u16>,
    },
    /// Read the stored calibration offset
    ReadCalibration {
        /// Receives the offset in °C
        offset: &'a Signal<M, f32>,
    },
    /// Store and verify a calibration offset
    WriteCalibration {
        /// Offset in °C
        offset: f32,
        /// Receives the verified outcome
        outcome: &'a WriteOutcome<M>,
    },
    /// Read the stored serial number
    ReadSerial {
        /// Receives the serial number
        serial: &'a Signal<M, u32>,
    },
    /// Store and verify a serial number
    WriteSerial {
        /// Serial number, below 2^24
        serial: u32,
        /// Receives the verified outcome
        outcome: &'a WriteOutcome<M>,
    },
}

impl<'a, M: RawMutex> Actor<M, SensorRequest<'a, M>> {
    /// Probe the sensor
    pub async fn detect<D: DelayNs>(&self, delay: &mut D, found: &'a Signal<M, bool>) -> Enqueue {
        self.enqueue(delay, SensorRequest::Detect { found }).await
    }

    /// Sample the temperature `count` times, one second apart
    ///
    /// Cancellable with [`stop`](Actor::stop).
    pub async fn read_value<D: DelayNs>(
        &self,
        delay: &mut D,
        count: u8,
        average: &'a Signal<M, f32>,
    ) -> Enqueue {
        self.enqueue(delay, SensorRequest::ReadTemperature { count, average })
            .await
    }

    /// Read the device identification number
    pub async fn read_identity<D: DelayNs>(&self, delay: &mut D, id: &'a Signal<M, u16>) -> Enqueue {
        self.enqueue(delay, SensorRequest::ReadIdentity { id }).await
    }

    /// Read the stored calibration offset
    pub async fn read_calibration<D: DelayNs>(
        &self,
        delay: &mut D,
        offset: &'a Signal<M, f32>,
    ) -> Enqueue {
        self.enqueue(delay, SensorRequest::ReadCalibration { offset })
            .await
    }

    /// Store a calibration offset and verify it by reading it back
    pub async fn write_calibration<D: DelayNs>(
        &self,
        delay: &mut D,
        offset: f32,
        outcome: &'a WriteOutcome<M>,
    ) -> Enqueue {
        self.enqueue(delay, SensorRequest::WriteCalibration { offset, outcome })
            .await
    }

    /// Read the stored serial number
    pub async fn read_serial<D: DelayNs>(&self, delay: &mut D, serial: &'a Signal<M, u32>) -> Enqueue {
        self.enqueue(delay, SensorRequest::ReadSerial { serial })
            .await
    }

    /// Store a serial number and verify it by reading it back
    pub async fn write_serial<D: DelayNs>(
        &self,
        delay: &mut D,
        serial: u32,
        outcome: &'a WriteOutcome<M>,
    ) -> Enqueue {
        self.enqueue(delay, SensorRequest::WriteSerial { serial, outcome })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::{Identity, Status};
    use embassy_futures::block_on;
    use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;

    struct NoDelay;

    impl DelayNs for NoDelay {
        async fn delay_ns(&mut self, _ns: u32) {}
    }

    #[test]
    fn test_guard_fault_bits() {
        let timeout = GuardFault {
            cause: GuardCause::Timeout,
            busy: true,
            wrong_lock: false,
        };
        assert_eq!(timeout.bits(), GuardFault::BUSY | GuardFault::TIMEOUT);

        let transport = GuardFault {
            cause: GuardCause::Transport(I2cFailure::AddressNack),
            busy: false,
            wrong_lock: true,
        };
        assert_eq!(
            transport.bits(),
            GuardFault::WRONG_LOCK | GuardFault::TRANSPORT
        );

        assert_eq!(GuardFault::status_word(Ok(())), 0);
        assert_eq!(GuardFault::status_word(Err(timeout)), 0b1001);
    }

    #[test]
    fn test_guard_transport_fault_is_transport_error() {
        let fault = GuardFault {
            cause: GuardCause::Transport(I2cFailure::DataNack),
            busy: false,
            wrong_lock: true,
        };
        let err = ConfigError::from(fault);
        assert_eq!(err, ConfigError::Transport(I2cFailure::DataNack));
        assert!(err.is_transport());
    }

    #[test]
    fn test_guard_timeout_is_not_transport_error() {
        let fault = GuardFault {
            cause: GuardCause::Timeout,
            busy: true,
            wrong_lock: true,
        };
        let err = ConfigError::from(fault);
        assert_eq!(err, ConfigError::Guard(fault));
        assert!(!err.is_transport());
        assert!(!ConfigError::Verification.is_transport());
    }

    #[test]
    fn test_config_error_description() {
        let nack = ConfigError::Transport(I2cFailure::AddressNack);
        assert_eq!(nack.description(), I2cFailure::AddressNack.description());

        let stuck = ConfigError::Guard(GuardFault {
            cause: GuardCause::Timeout,
            busy: true,
            wrong_lock: true,
        });
        assert_eq!(stuck.description(), "EEPROM stayed busy");

        let unchanged = ConfigError::Guard(GuardFault {
            cause: GuardCause::Timeout,
            busy: false,
            wrong_lock: true,
        });
        assert_eq!(unchanged.description(), "EEPROM lock state did not change");
        assert_ne!(
            ConfigError::Verification.description(),
            ConfigError::InvalidValue.description()
        );
    }

    #[test]
    fn test_typed_operation_builds_request() {
        let found: Signal<CriticalSectionRawMutex, bool> = Signal::new();
        let average: Signal<CriticalSectionRawMutex, f32> = Signal::new();
        let actor: SensorActor<'_, CriticalSectionRawMutex> =
            Actor::new(Identity::new("Probe", 0x48));
        actor.mark_ready();

        let result = block_on(actor.detect(&mut NoDelay, &found));
        assert!(result.is_accepted());
        assert_eq!(actor.status(), Status::Busy);

        // A second caller is turned away without corrupting the slot
        let result = block_on(actor.read_value(&mut NoDelay, 3, &average));
        assert_eq!(result, Enqueue::Dropped);
        assert!(actor.has_pending());
        assert!(!average.signaled());
    }
}
