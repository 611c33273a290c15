//! Sensor worker task

use defmt::*;
use embassy_rp::i2c::{Async, I2c};
use embassy_rp::peripherals::I2C0;
use embassy_time::Delay;

use probelight_drivers::Tmp117;
use probelight_hal_rp2040::TimedI2c;

use crate::channels::Sensor;

/// TMP117 on I2C0
pub type SensorDevice = Tmp117<TimedI2c<I2c<'static, I2C0, Async>>, Delay>;

/// Runs every sensor request to completion, one at a time
#[embassy_executor::task]
pub async fn sensor_task(actor: &'static Sensor, mut device: SensorDevice) {
    info!(
        "Sensor worker '{}' started at {=u8:#x}",
        actor.identity().name(),
        device.address()
    );
    actor.run(&mut device).await
}
