//! I2C transport abstractions
//!
//! The firmware treats the bus as an opaque transaction: write some bytes,
//! read some bytes, succeed or fail with a classified [`I2cFailure`].

use embedded_hal::i2c::{Error as _, ErrorKind, NoAcknowledgeSource};

/// Classified reason an I2C exchange failed
///
/// Every chip-level error is folded into one of these kinds. Anything that
/// does not map cleanly lands in [`I2cFailure::Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum I2cFailure {
    /// The exchange did not finish within its time budget
    Timeout,
    /// SCL was held low by a peripheral for too long
    ClockTimeout,
    /// Peripheral did not acknowledge its address
    AddressNack,
    /// Peripheral did not acknowledge a data byte
    DataNack,
    /// Another master won arbitration
    ArbitrationLost,
    /// Exchange returned before all bytes were moved
    Incomplete,
    /// Bus already in use
    BusBusy,
    /// Exchange was cancelled before completion
    Cancelled,
    /// Exchange parameters were rejected by the controller
    Invalid,
    /// Generic or unrecognized failure
    Error,
}

impl I2cFailure {
    /// Human-readable description used in status lines
    pub const fn description(self) -> &'static str {
        match self {
            I2cFailure::Timeout => "I2C transaction timed out",
            I2cFailure::ClockTimeout => "I2C serial clock line timed out",
            I2cFailure::AddressNack => "I2C address not acknowledged",
            I2cFailure::DataNack => "I2C data byte not acknowledged",
            I2cFailure::ArbitrationLost => "I2C arbitration lost to another master",
            I2cFailure::Incomplete => "I2C transaction returned before completion",
            I2cFailure::BusBusy => "I2C bus is already in use",
            I2cFailure::Cancelled => "I2C transaction cancelled",
            I2cFailure::Invalid => "I2C transaction invalid",
            I2cFailure::Error => "I2C generic error",
        }
    }
}

impl From<ErrorKind> for I2cFailure {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address) => I2cFailure::AddressNack,
            ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data) => I2cFailure::DataNack,
            ErrorKind::ArbitrationLoss => I2cFailure::ArbitrationLost,
            ErrorKind::Overrun => I2cFailure::Incomplete,
            _ => I2cFailure::Error,
        }
    }
}

/// I2C bus master
///
/// One call is one bounded exchange with a peripheral. Implementations must
/// not retry internally; retry policy belongs to the protocol above.
#[allow(async_fn_in_trait)]
pub trait I2cBus {
    /// Write `write` then read `read.len()` bytes from the device at `address`
    ///
    /// An empty `read` performs a write-only exchange. An empty `write`
    /// performs a read-only exchange.
    ///
    /// # Arguments
    /// * `address` - 7-bit I2C address
    /// * `write` - Bytes to write (typically a register pointer, maybe data)
    /// * `read` - Buffer to fill
    async fn transfer(
        &mut self,
        address: u8,
        write: &[u8],
        read: &mut [u8],
    ) -> Result<(), I2cFailure>;
}

impl<T: I2cBus + ?Sized> I2cBus for &mut T {
    async fn transfer(
        &mut self,
        address: u8,
        write: &[u8],
        read: &mut [u8],
    ) -> Result<(), I2cFailure> {
        (**self).transfer(address, write, read).await
    }
}

/// Adapter from any `embedded-hal-async` I2C master
///
/// Error kinds reported by the underlying driver are classified through
/// `From<ErrorKind>`.
pub struct EhI2c<T> {
    inner: T,
}

impl<T> EhI2c<T> {
    /// Wrap an `embedded-hal-async` I2C master
    pub const fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Get the wrapped driver back
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: embedded_hal_async::i2c::I2c> I2cBus for EhI2c<T> {
    async fn transfer(
        &mut self,
        address: u8,
        write: &[u8],
        read: &mut [u8],
    ) -> Result<(), I2cFailure> {
        let result = if read.is_empty() {
            self.inner.write(address, write).await
        } else if write.is_empty() {
            self.inner.read(address, read).await
        } else {
            self.inner.write_read(address, write, read).await
        };
        result.map_err(|e| I2cFailure::from(e.kind()))
    }
}

/// I2C configuration
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct I2cConfig {
    /// Clock frequency in Hz
    pub frequency: u32,
    /// Upper bound for a single exchange in milliseconds
    pub timeout_ms: u32,
}

impl Default for I2cConfig {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl I2cConfig {
    /// Standard mode (100 kHz)
    pub const STANDARD: Self = Self {
        frequency: 100_000,
        timeout_ms: 50,
    };

    /// Fast mode (400 kHz)
    pub const FAST: Self = Self {
        frequency: 400_000,
        timeout_ms: 20,
    };
}
