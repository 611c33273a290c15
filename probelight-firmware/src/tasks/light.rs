//! Light worker task

use defmt::*;
use embassy_time::Delay;

use probelight_drivers::PwmLight;
use probelight_hal_rp2040::SlicePwm;

use crate::channels::Light;

/// Indicator LED on a PWM slice
pub type LightDevice = PwmLight<SlicePwm<'static>, Delay>;

/// Runs every light request to completion, one at a time
#[embassy_executor::task]
pub async fn light_task(actor: &'static Light, mut device: LightDevice) {
    info!("Light worker '{}' started", actor.identity().name());
    actor.run(&mut device).await
}
