//! Probelight - temperature probe firmware
//!
//! Main firmware binary for RP2040 boards carrying a TMP117 precision
//! temperature sensor and a PWM indicator light. Each peripheral is owned by
//! its own actor worker; the supervisor task drives both.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::i2c::{I2c, InterruptHandler as I2cInterruptHandler};
use embassy_rp::peripherals::I2C0;
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use embassy_time::Delay;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use probelight_core::config::SensorTiming;
use probelight_core::{Actor, Identity};
use probelight_drivers::{PwmLight, Tmp117};
use probelight_hal::I2cConfig;
use probelight_hal_rp2040::i2c::rp2040_config;
use probelight_hal_rp2040::{PwmChannel, SlicePwm, TimedI2c};

use crate::channels::{Light, Sensor};
use crate::tasks::SupervisorConfig;

mod channels;
mod config;
mod tasks;

bind_interrupts!(struct Irqs {
    I2C0_IRQ => I2cInterruptHandler<I2C0>;
});

// Actors are shared with their worker and the supervisor for the program's lifetime
static SENSOR: StaticCell<Sensor> = StaticCell::new();
static LIGHT: StaticCell<Light> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Probelight firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let board = config::load();
    let timing = SensorTiming::default();

    // Sensor on I2C0: SDA gpio4, SCL gpio5
    let bus_config = I2cConfig {
        frequency: board.sensor.i2c_frequency,
        ..I2cConfig::FAST
    };
    let i2c = I2c::new_async(p.I2C0, p.PIN_5, p.PIN_4, Irqs, rp2040_config(&bus_config));
    let tmp117 = Tmp117::with_profile(
        TimedI2c::rp2040(i2c, &bus_config),
        board.sensor.address,
        Delay,
        Default::default(),
        timing,
    );

    // Light on PWM slice 4 channel B: gpio25
    let pwm = Pwm::new_output_b(p.PWM_SLICE4, p.PIN_25, PwmConfig::default());
    let led = PwmLight::new(SlicePwm::new(pwm, PwmChannel::B, board.light.pwm_top), Delay);

    let sensor: &'static Sensor = SENSOR.init(Actor::new(Identity::new(
        board.sensor.name.as_str(),
        board.sensor.address,
    )));
    let light: &'static Light = LIGHT.init(Actor::new(Identity::new(board.light.name.as_str(), 0)));

    spawner.spawn(tasks::sensor_task(sensor, tmp117)).unwrap();
    spawner.spawn(tasks::light_task(light, led)).unwrap();
    spawner
        .spawn(tasks::supervisor_task(
            sensor,
            light,
            SupervisorConfig::new(&board.startup, timing.sample.interval_ms),
        ))
        .unwrap();

    info!("All tasks spawned");
}
