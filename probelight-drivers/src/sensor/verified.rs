//! Persisted values with write-then-verify
//!
//! Reads acquire the guard in the locked direction. Writes acquire it in the
//! unlock direction, write, let the EEPROM settle and then read the value back
//! through the read path, which also locks the region again. A read-back that
//! differs from what was written is a verification failure, never a
//! transport failure.

use embedded_hal_async::delay::DelayNs;
use probelight_core::device::{ConfigError, LockState};
use probelight_hal::I2cBus;

use super::guard;
use super::tmp117::Tmp117;

/// Calibration offset resolution in °C per LSB
pub const OFFSET_LSB: f32 = 1.0 / 128.0;

/// Serial numbers must be below this
pub const SERIAL_LIMIT: u32 = 1 << 24;

/// Encode an offset in °C as the device's signed fixed-point value
///
/// Truncates towards zero. Offsets that are not finite or fall outside the
/// representable ±256 °C range are rejected.
pub fn quantize_offset(offset: f32) -> Result<i16, ConfigError> {
    if !(-256.0..256.0).contains(&offset) {
        return Err(ConfigError::InvalidValue);
    }
    Ok((offset * 128.0) as i16)
}

/// Decode a raw fixed-point register value to °C
pub fn offset_from_raw(raw: i16) -> f32 {
    raw as f32 * OFFSET_LSB
}

/// Split a serial number into its (high, low) register values
pub fn split_serial(serial: u32) -> Result<(u16, u16), ConfigError> {
    if serial >= SERIAL_LIMIT {
        return Err(ConfigError::InvalidValue);
    }
    Ok(((serial >> 16) as u16, serial as u16))
}

/// Join (high, low) register values into a serial number
pub fn join_serial(high: u16, low: u16) -> u32 {
    (u32::from(high) << 16) | u32::from(low)
}

impl<B: I2cBus, D: DelayNs> Tmp117<B, D> {
    /// Guarded read of one EEPROM register
    async fn read_protected(&mut self, reg: u8) -> Result<u16, ConfigError> {
        guard::acquire(
            &mut self.link,
            &mut self.delay,
            &self.profile,
            &self.timing.guard,
            LockState::Locked,
        )
        .await?;
        Ok(self.link.read(reg).await?)
    }

    /// Guarded write of one EEPROM register
    ///
    /// The caller waits out the settle time once all of its registers are
    /// written.
    async fn write_protected(&mut self, reg: u8, value: u16) -> Result<(), ConfigError> {
        guard::acquire(
            &mut self.link,
            &mut self.delay,
            &self.profile,
            &self.timing.guard,
            LockState::Unlocked,
        )
        .await?;
        self.link.write(reg, value).await?;
        Ok(())
    }

    /// Read the stored calibration offset in °C
    pub async fn read_offset(&mut self) -> Result<f32, ConfigError> {
        let raw = self.read_protected(self.profile.offset_reg).await? as i16;
        Ok(offset_from_raw(raw))
    }

    /// Store a calibration offset and verify it
    pub async fn write_offset(&mut self, offset: f32) -> Result<(), ConfigError> {
        let raw = quantize_offset(offset)?;
        self.write_protected(self.profile.offset_reg, raw as u16)
            .await?;
        self.delay
            .delay_ms(self.timing.settle.calibration_ms)
            .await;

        let stored = self.read_protected(self.profile.offset_reg).await? as i16;
        if stored != raw {
            warn!(
                "offset readback mismatch: wrote {=i16}, read {=i16}",
                raw,
                stored
            );
            return Err(ConfigError::Verification);
        }
        Ok(())
    }

    /// Read the stored serial number
    pub async fn read_serial(&mut self) -> Result<u32, ConfigError> {
        let high = self.read_protected(self.profile.serial_high_reg).await?;
        let low = self.read_protected(self.profile.serial_low_reg).await?;
        Ok(join_serial(high, low))
    }

    /// Store a serial number and verify it
    ///
    /// Each register pair is its own guarded transaction. If the second one
    /// fails the device holds a half-written serial; the error is returned
    /// as-is. The EEPROM settles once, after both pairs.
    pub async fn write_serial(&mut self, serial: u32) -> Result<(), ConfigError> {
        let (high, low) = split_serial(serial)?;
        self.write_protected(self.profile.serial_high_reg, high)
            .await?;
        self.write_protected(self.profile.serial_low_reg, low)
            .await?;
        self.delay.delay_ms(self.timing.settle.serial_ms).await;

        let stored = self.read_serial().await?;
        if stored != serial {
            warn!(
                "serial readback mismatch: wrote {=u32}, read {=u32}",
                serial,
                stored
            );
            return Err(ConfigError::Verification);
        }
        Ok(())
    }
}
