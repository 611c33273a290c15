//! Simulated TMP117 for host tests

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embedded_hal_async::delay::DelayNs;
use probelight_core::config::SensorProfile;
use probelight_core::CancelToken;
use probelight_hal::{I2cBus, I2cFailure};
use std::collections::VecDeque;
use std::vec::Vec;

const PROFILE: SensorProfile = SensorProfile::TMP117;

/// Register file with the EEPROM lock behaviour of the real part
pub struct FakeTmp117 {
    pub registers: [u16; 16],
    pub unlocked: bool,
    /// Status reads still to report the EEPROM as busy
    pub busy_reads: u32,
    /// Queued temperature results; falls back to the result register when empty
    pub temperatures: VecDeque<Result<i16, I2cFailure>>,
    /// Every exchange from this index on fails with `fail_with`
    pub fail_after: Option<usize>,
    pub fail_with: I2cFailure,
    /// Register whose writes are acknowledged but not stored
    pub drop_writes_to: Option<u8>,
    pub exchanges: usize,
    pub status_reads: usize,
    /// Register writes in order, lock writes included
    pub writes: Vec<(u8, u16)>,
}

impl FakeTmp117 {
    pub const ADDRESS: u8 = 0x48;

    pub fn new() -> Self {
        let mut registers = [0; 16];
        registers[PROFILE.id_reg as usize] = 0x0117;
        Self {
            registers,
            unlocked: false,
            busy_reads: 0,
            temperatures: VecDeque::new(),
            fail_after: None,
            fail_with: I2cFailure::DataNack,
            drop_writes_to: None,
            exchanges: 0,
            status_reads: 0,
            writes: Vec::new(),
        }
    }

    fn status(&mut self) -> u16 {
        self.status_reads += 1;
        let mut status = 0;
        if self.busy_reads > 0 {
            self.busy_reads -= 1;
            status |= 1 << PROFILE.busy_bit;
        }
        if self.unlocked {
            status |= 1 << PROFILE.unlocked_bit;
        }
        status
    }

    fn is_eeprom(reg: u8) -> bool {
        reg == PROFILE.offset_reg || reg == PROFILE.serial_high_reg || reg == PROFILE.serial_low_reg
    }
}

impl I2cBus for FakeTmp117 {
    async fn transfer(
        &mut self,
        address: u8,
        write: &[u8],
        read: &mut [u8],
    ) -> Result<(), I2cFailure> {
        if address != Self::ADDRESS {
            return Err(I2cFailure::AddressNack);
        }
        let exchange = self.exchanges;
        self.exchanges += 1;
        if self.fail_after.is_some_and(|after| exchange >= after) {
            return Err(self.fail_with);
        }

        let reg = *write.first().ok_or(I2cFailure::Invalid)?;
        if (reg as usize) >= self.registers.len() {
            return Err(I2cFailure::DataNack);
        }

        match (write.len(), read.len()) {
            (1, 0) => Ok(()),
            (1, 2) => {
                let value = if reg == PROFILE.unlock_reg {
                    self.status()
                } else if reg == PROFILE.result_reg {
                    match self.temperatures.pop_front() {
                        Some(sample) => sample? as u16,
                        None => self.registers[reg as usize],
                    }
                } else {
                    self.registers[reg as usize]
                };
                read.copy_from_slice(&value.to_be_bytes());
                Ok(())
            }
            (3, 0) => {
                let value = u16::from_be_bytes([write[1], write[2]]);
                self.writes.push((reg, value));
                if reg == PROFILE.unlock_reg {
                    self.unlocked = value & (1 << PROFILE.unlocked_bit) != 0;
                } else if Self::is_eeprom(reg) && !self.unlocked {
                    // Locked EEPROM ignores writes
                } else if self.drop_writes_to != Some(reg) {
                    self.registers[reg as usize] = value;
                }
                Ok(())
            }
            _ => Err(I2cFailure::Invalid),
        }
    }
}

/// Delay that records what it was asked to wait
///
/// When `watch` is set, every sample-interval wait also takes whatever the
/// driver last published there, so per-tick outputs can be checked. When
/// `stop_at_interval` is set, the first sample-interval wait cancels it, as a
/// `stop` arriving while a tick is in flight would.
#[derive(Default)]
pub struct RecordingDelay<'a> {
    pub waits_ms: Vec<u32>,
    pub watch: Option<&'a Signal<CriticalSectionRawMutex, f32>>,
    pub observed: Vec<Option<f32>>,
    pub stop_at_interval: Option<&'a CancelToken>,
}

impl RecordingDelay<'_> {
    pub fn total_ms(&self) -> u32 {
        self.waits_ms.iter().sum()
    }
}

impl DelayNs for RecordingDelay<'_> {
    async fn delay_ns(&mut self, ns: u32) {
        self.delay_ms(ns / 1_000_000).await;
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.waits_ms.push(ms);
        if ms == 1000 {
            if let Some(slot) = self.watch {
                self.observed.push(slot.try_take());
            }
            if let Some(cancel) = self.stop_at_interval {
                cancel.cancel();
            }
        }
    }
}
