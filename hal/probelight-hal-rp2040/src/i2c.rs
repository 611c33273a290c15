//! I2C bus with a per-exchange timeout
//!
//! The RP2040 I2C block can hang waiting on a peripheral that holds SCL low.
//! Each exchange is bounded by the configured timeout and reported as
//! [`I2cFailure::Timeout`] when it runs out.

use embassy_rp::i2c::{self, Async, I2c, Instance};
use embassy_time::{with_timeout, Duration};
use probelight_hal::{EhI2c, I2cBus, I2cConfig, I2cFailure};

/// Any async I2C master with a bounded exchange time
pub struct TimedI2c<T> {
    inner: EhI2c<T>,
    timeout: Duration,
}

impl<T: embedded_hal_async::i2c::I2c> TimedI2c<T> {
    /// Wrap a driver, bounding every exchange by `timeout_ms`
    pub fn new(inner: T, timeout_ms: u32) -> Self {
        Self {
            inner: EhI2c::new(inner),
            timeout: Duration::from_millis(timeout_ms as u64),
        }
    }
}

impl<'d, I: Instance> TimedI2c<I2c<'d, I, Async>> {
    /// Wrap an RP2040 async I2C driver using the timeout from `config`
    pub fn rp2040(inner: I2c<'d, I, Async>, config: &I2cConfig) -> Self {
        Self::new(inner, config.timeout_ms)
    }
}

/// RP2040 driver configuration for the bus clock in `config`
pub fn rp2040_config(config: &I2cConfig) -> i2c::Config {
    let mut rp = i2c::Config::default();
    rp.frequency = config.frequency;
    rp
}

impl<T: embedded_hal_async::i2c::I2c> I2cBus for TimedI2c<T> {
    async fn transfer(
        &mut self,
        address: u8,
        write: &[u8],
        read: &mut [u8],
    ) -> Result<(), I2cFailure> {
        with_timeout(self.timeout, self.inner.transfer(address, write, read))
            .await
            .map_err(|_| I2cFailure::Timeout)?
    }
}
