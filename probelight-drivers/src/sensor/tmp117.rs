//! TMP117 precision temperature sensor
//!
//! The worker side of the sensor actor. Every request is executed to
//! completion, its result is published to the request's output slot and a
//! status line is logged. Failures never escape: a failed read leaves its
//! slot untouched (temperature samples publish the sentinel instead) and a
//! failed write publishes its error.

use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal_async::delay::DelayNs;
use probelight_core::config::{SensorProfile, SensorTiming};
use probelight_core::device::SensorRequest;
use probelight_core::{CancelToken, Device};
use probelight_hal::{I2cBus, I2cFailure};

use super::register::RegisterLink;

/// Temperature resolution in °C per LSB of the result register
pub const TEMPERATURE_LSB: f32 = 0.0078125;

/// TMP117 driver
pub struct Tmp117<B, D> {
    pub(super) link: RegisterLink<B>,
    pub(super) delay: D,
    pub(super) profile: SensorProfile,
    pub(super) timing: SensorTiming,
}

impl<B: I2cBus, D: DelayNs> Tmp117<B, D> {
    /// Create a driver with the TMP117 register map and default timing
    pub fn new(bus: B, address: u8, delay: D) -> Self {
        Self::with_profile(bus, address, delay, SensorProfile::TMP117, SensorTiming::default())
    }

    /// Create a driver for a compatible part with its own register map
    pub fn with_profile(
        bus: B,
        address: u8,
        delay: D,
        profile: SensorProfile,
        timing: SensorTiming,
    ) -> Self {
        Self {
            link: RegisterLink::new(bus, address),
            delay,
            profile,
            timing,
        }
    }

    /// 7-bit address of the sensor
    pub fn address(&self) -> u8 {
        self.link.address()
    }

    /// Check that the sensor acknowledges its address
    pub async fn detect(&mut self) -> Result<(), I2cFailure> {
        self.link.point(self.profile.result_reg).await
    }

    /// Read the device identification number
    pub async fn read_identity(&mut self) -> Result<u16, I2cFailure> {
        let id = self.link.read(self.profile.id_reg).await?;
        Ok(id & self.profile.id_mask)
    }

    /// Read one temperature sample in °C
    pub async fn read_celsius(&mut self) -> Result<f32, I2cFailure> {
        let raw = self.link.read(self.profile.result_reg).await? as i16;
        Ok(raw as f32 * TEMPERATURE_LSB)
    }
}

impl<'a, M, B, D> Device<SensorRequest<'a, M>> for Tmp117<B, D>
where
    M: RawMutex,
    B: I2cBus,
    D: DelayNs,
{
    async fn execute(&mut self, request: SensorRequest<'a, M>, cancel: &CancelToken) {
        let address = self.address();
        match request {
            SensorRequest::Detect { found } => match self.detect().await {
                Ok(()) => {
                    info!("sensor detected at {=u8:#x}", address);
                    found.signal(true);
                }
                Err(e) => {
                    warn!(
                        "no sensor at {=u8:#x}: {=str}",
                        address,
                        e.description()
                    );
                    found.signal(false);
                }
            },
            SensorRequest::ReadTemperature { count, average } => {
                self.sample(count, average, cancel).await;
            }
            SensorRequest::ReadIdentity { id } => match self.read_identity().await {
                Ok(value) => {
                    info!("device id: {=u16:#x}", value);
                    id.signal(value);
                }
                Err(e) => warn!("device id read failed: {=str}", e.description()),
            },
            SensorRequest::ReadCalibration { offset } => match self.read_offset().await {
                Ok(value) => {
                    info!("stored offset: {=f32} C", value);
                    offset.signal(value);
                }
                Err(e) => warn!("offset read failed: {=str}", e.description()),
            },
            SensorRequest::WriteCalibration { offset, outcome } => {
                let result = self.write_offset(offset).await;
                match result {
                    Ok(()) => info!("offset {=f32} C stored", offset),
                    Err(e) => warn!("offset write failed: {=str}", e.description()),
                }
                outcome.signal(result);
            }
            SensorRequest::ReadSerial { serial } => match self.read_serial().await {
                Ok(value) => {
                    info!("serial number: {=u32}", value);
                    serial.signal(value);
                }
                Err(e) => warn!("serial read failed: {=str}", e.description()),
            },
            SensorRequest::WriteSerial { serial, outcome } => {
                let result = self.write_serial(serial).await;
                match result {
                    Ok(()) => info!("serial number {=u32} stored", serial),
                    Err(e) => warn!("serial write failed: {=str}", e.description()),
                }
                outcome.signal(result);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensor::fake::{FakeTmp117, RecordingDelay};
    use embassy_futures::block_on;
    use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
    use embassy_sync::signal::Signal;
    use probelight_core::device::{ConfigError, SensorActor, WriteOutcome};
    use probelight_core::{Actor, Enqueue, Identity, Status};

    type Cs = CriticalSectionRawMutex;

    #[test]
    fn test_detect_present_and_absent() {
        let found: Signal<Cs, bool> = Signal::new();
        let cancel = CancelToken::new();
        let mut fake = FakeTmp117::new();
        let mut delay = RecordingDelay::default();

        let mut tmp = Tmp117::new(&mut fake, FakeTmp117::ADDRESS, &mut delay);
        block_on(tmp.execute(SensorRequest::Detect { found: &found }, &cancel));
        assert_eq!(found.try_take(), Some(true));

        let mut fake = FakeTmp117::new();
        let mut delay = RecordingDelay::default();
        let mut tmp = Tmp117::new(&mut fake, 0x4A, &mut delay);
        block_on(tmp.execute(SensorRequest::Detect { found: &found }, &cancel));
        assert_eq!(found.try_take(), Some(false));
    }

    #[test]
    fn test_identity_is_masked() {
        let id: Signal<Cs, u16> = Signal::new();
        let cancel = CancelToken::new();
        let mut fake = FakeTmp117::new();
        fake.registers[0x0F] = 0x2117;
        let mut delay = RecordingDelay::default();

        let mut tmp = Tmp117::new(&mut fake, FakeTmp117::ADDRESS, &mut delay);
        block_on(tmp.execute(SensorRequest::ReadIdentity { id: &id }, &cancel));

        assert_eq!(id.try_take(), Some(0x0117));
    }

    #[test]
    fn test_failed_read_leaves_slot_untouched() {
        let offset: Signal<Cs, f32> = Signal::new();
        let serial: Signal<Cs, u32> = Signal::new();
        let cancel = CancelToken::new();
        let mut fake = FakeTmp117::new();
        fake.fail_after = Some(0);
        let mut delay = RecordingDelay::default();

        let mut tmp = Tmp117::new(&mut fake, FakeTmp117::ADDRESS, &mut delay);
        block_on(tmp.execute(SensorRequest::ReadCalibration { offset: &offset }, &cancel));
        block_on(tmp.execute(SensorRequest::ReadSerial { serial: &serial }, &cancel));

        assert!(!offset.signaled());
        assert!(!serial.signaled());
    }

    #[test]
    fn test_write_publishes_outcome() {
        let outcome: WriteOutcome<Cs> = Signal::new();
        let cancel = CancelToken::new();
        let mut fake = FakeTmp117::new();
        let mut delay = RecordingDelay::default();

        let mut tmp = Tmp117::new(&mut fake, FakeTmp117::ADDRESS, &mut delay);
        block_on(tmp.execute(
            SensorRequest::WriteSerial {
                serial: 4242,
                outcome: &outcome,
            },
            &cancel,
        ));
        assert_eq!(outcome.try_take(), Some(Ok(())));

        block_on(tmp.execute(
            SensorRequest::WriteCalibration {
                offset: f32::NAN,
                outcome: &outcome,
            },
            &cancel,
        ));
        assert_eq!(outcome.try_take(), Some(Err(ConfigError::InvalidValue)));
    }

    #[test]
    fn test_actor_round_trip() {
        let offset: Signal<Cs, f32> = Signal::new();
        let outcome: WriteOutcome<Cs> = Signal::new();
        let actor: SensorActor<'_, Cs> = Actor::new(Identity::new("Probe", FakeTmp117::ADDRESS));
        let mut fake = FakeTmp117::new();
        let mut delay = RecordingDelay::default();
        let mut caller_delay = RecordingDelay::default();
        let mut tmp = Tmp117::new(&mut fake, FakeTmp117::ADDRESS, &mut delay);

        actor.mark_ready();
        assert!(block_on(actor.write_calibration(&mut caller_delay, -1.25, &outcome)).is_accepted());
        block_on(actor.serve_one(&mut tmp));
        assert_eq!(outcome.try_take(), Some(Ok(())));

        assert!(block_on(actor.read_calibration(&mut caller_delay, &offset)).is_accepted());
        block_on(actor.serve_one(&mut tmp));
        assert_eq!(offset.try_take(), Some(-1.25));
        assert_eq!(actor.status(), Status::Ready);
    }

    #[test]
    fn test_busy_actor_drops_and_keeps_pending() {
        let average: Signal<Cs, f32> = Signal::new();
        let found: Signal<Cs, bool> = Signal::new();
        let actor: SensorActor<'_, Cs> = Actor::new(Identity::new("Probe", FakeTmp117::ADDRESS));
        let mut fake = FakeTmp117::new();
        fake.temperatures.push_back(Ok(3200));
        let mut delay = RecordingDelay::default();
        let mut caller_delay = RecordingDelay::default();

        actor.mark_ready();
        assert!(block_on(actor.read_value(&mut caller_delay, 1, &average)).is_accepted());

        // The gate stays closed for the whole poll window
        let mut late_delay = RecordingDelay::default();
        assert_eq!(
            block_on(actor.detect(&mut late_delay, &found)),
            Enqueue::Dropped
        );
        assert_eq!(late_delay.total_ms(), 10);

        let mut tmp = Tmp117::new(&mut fake, FakeTmp117::ADDRESS, &mut delay);
        block_on(actor.serve_one(&mut tmp));
        assert_eq!(average.try_take(), Some(25.0));
        assert!(!found.signaled());
    }
}
