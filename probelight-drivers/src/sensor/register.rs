//! 16-bit register access over I2C
//!
//! The TMP117 exposes big-endian 16-bit registers behind an 8-bit pointer.
//! Every exchange goes through buffers owned by the link, so their size is
//! fixed at compile time.

use probelight_hal::{I2cBus, I2cFailure};

/// Pointer byte plus one register value
const TX_LEN: usize = 3;
/// One register value
const RX_LEN: usize = 2;

/// Register-level link to one device
pub struct RegisterLink<B> {
    bus: B,
    address: u8,
    tx: [u8; TX_LEN],
    rx: [u8; RX_LEN],
}

impl<B: I2cBus> RegisterLink<B> {
    /// Create a link to the device at `address`
    pub fn new(bus: B, address: u8) -> Self {
        Self {
            bus,
            address,
            tx: [0; TX_LEN],
            rx: [0; RX_LEN],
        }
    }

    /// 7-bit address of the device
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Set the register pointer without transferring data
    ///
    /// Used as a presence check: the exchange only succeeds if the device
    /// acknowledges its address.
    pub async fn point(&mut self, reg: u8) -> Result<(), I2cFailure> {
        self.tx[0] = reg;
        self.bus.transfer(self.address, &self.tx[..1], &mut []).await
    }

    /// Read one register
    pub async fn read(&mut self, reg: u8) -> Result<u16, I2cFailure> {
        self.tx[0] = reg;
        self.bus
            .transfer(self.address, &self.tx[..1], &mut self.rx)
            .await?;
        Ok(u16::from_be_bytes(self.rx))
    }

    /// Write one register
    pub async fn write(&mut self, reg: u8, value: u16) -> Result<(), I2cFailure> {
        let [hi, lo] = value.to_be_bytes();
        self.tx = [reg, hi, lo];
        self.bus.transfer(self.address, &self.tx, &mut []).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensor::fake::FakeTmp117;
    use embassy_futures::block_on;

    #[test]
    fn test_read_is_big_endian() {
        let mut fake = FakeTmp117::new();
        fake.registers[0x0F] = 0x1117;
        let mut link = RegisterLink::new(&mut fake, FakeTmp117::ADDRESS);

        assert_eq!(block_on(link.read(0x0F)), Ok(0x1117));
    }

    #[test]
    fn test_write_then_read() {
        let mut fake = FakeTmp117::new();
        let mut link = RegisterLink::new(&mut fake, FakeTmp117::ADDRESS);

        block_on(link.write(0x02, 0xABCD)).unwrap();
        assert_eq!(block_on(link.read(0x02)), Ok(0xABCD));
    }

    #[test]
    fn test_wrong_address_is_nack() {
        let mut fake = FakeTmp117::new();
        let mut link = RegisterLink::new(&mut fake, 0x49);

        assert_eq!(block_on(link.point(0x00)), Err(I2cFailure::AddressNack));
        assert_eq!(block_on(link.read(0x00)), Err(I2cFailure::AddressNack));
    }
}
