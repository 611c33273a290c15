//! Startup sequence and periodic readings
//!
//! The supervisor is the only caller of the actors. It never touches the
//! hardware; it enqueues requests and watches the output slots.
//!
//! 1. Detect the sensor, blinking the light until it answers
//! 2. Read and log the device id, serial number and stored offset
//! 3. Pulse the light to show the probe is ready
//! 4. Take an averaged reading every sample period, blinking on failures

use defmt::*;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{with_timeout, Delay, Duration, Timer};

use probelight_core::config::StartupConfig;
use probelight_core::device::TEMPERATURE_SENTINEL;
use probelight_core::Enqueue;

use crate::channels::{Light, Sensor, DEVICE_ID, OFFSET, SENSOR_FOUND, SERIAL, TEMPERATURE};

/// How long to wait for a single-shot result before treating it as missing
const REPLY_TIMEOUT_MS: u64 = 1_000;

/// Slack on top of the nominal sample interval
const TICK_SLACK_MS: u64 = 500;

/// Pause between detection attempts
const DETECT_RETRY_MS: u64 = 2_000;

/// Supervisor settings from the `[startup]` section
pub struct SupervisorConfig {
    /// Pulses shown once the sensor answers
    pub pulse_count: u8,
    /// Samples per reading
    pub sample_count: u8,
    /// Seconds between readings
    pub sample_period_s: u16,
    /// Blinks shown on a sensor failure
    pub error_blinks: u8,
    /// Nominal spacing of samples within a reading
    pub sample_interval_ms: u32,
}

impl SupervisorConfig {
    /// Build from board configuration and the driver's sample interval
    pub fn new(startup: &StartupConfig, sample_interval_ms: u32) -> Self {
        Self {
            pulse_count: startup.pulse_count,
            sample_count: startup.sample_count.max(1),
            sample_period_s: startup.sample_period_s.max(1),
            error_blinks: startup.error_blinks,
            sample_interval_ms,
        }
    }
}

/// Wait for a worker to publish to `slot`
async fn reply<T>(slot: &Signal<CriticalSectionRawMutex, T>, timeout_ms: u64) -> Option<T> {
    with_timeout(Duration::from_millis(timeout_ms), slot.wait())
        .await
        .ok()
}

fn note_dropped(what: &str, result: Enqueue) {
    if result == Enqueue::Dropped {
        debug!("{} request dropped, worker busy", what);
    }
}

/// Drives the startup sequence, then samples forever
#[embassy_executor::task]
pub async fn supervisor_task(sensor: &'static Sensor, light: &'static Light, config: SupervisorConfig) {
    let mut delay = Delay;
    info!("Supervisor started");

    // 1. Detect
    loop {
        SENSOR_FOUND.reset();
        note_dropped("detect", sensor.detect(&mut delay, &SENSOR_FOUND).await);
        if reply(&SENSOR_FOUND, REPLY_TIMEOUT_MS).await == Some(true) {
            break;
        }
        note_dropped("blink", light.blink(&mut delay, config.error_blinks).await);
        Timer::after_millis(DETECT_RETRY_MS).await;
    }

    // 2. Identify
    DEVICE_ID.reset();
    note_dropped("identity", sensor.read_identity(&mut delay, &DEVICE_ID).await);
    if reply(&DEVICE_ID, REPLY_TIMEOUT_MS).await.is_none() {
        warn!("Device id unavailable");
    }

    SERIAL.reset();
    note_dropped("serial", sensor.read_serial(&mut delay, &SERIAL).await);
    if reply(&SERIAL, REPLY_TIMEOUT_MS).await.is_none() {
        warn!("Serial number unavailable");
    }

    OFFSET.reset();
    note_dropped("offset", sensor.read_calibration(&mut delay, &OFFSET).await);
    if reply(&OFFSET, REPLY_TIMEOUT_MS).await.is_none() {
        warn!("Calibration offset unavailable");
    }

    // 3. Ready
    note_dropped("pulse", light.pulse(&mut delay, config.pulse_count).await);

    // 4. Periodic readings
    let tick_timeout = config.sample_interval_ms as u64 + TICK_SLACK_MS;
    loop {
        Timer::after_secs(config.sample_period_s as u64).await;

        TEMPERATURE.reset();
        let request = sensor
            .read_value(&mut delay, config.sample_count, &TEMPERATURE)
            .await;
        if !request.is_accepted() {
            note_dropped("temperature", request);
            continue;
        }

        let mut failed_ticks: u8 = 0;
        let mut latest = None;
        for _ in 0..config.sample_count {
            match reply(&TEMPERATURE, tick_timeout).await {
                Some(t) if t == TEMPERATURE_SENTINEL => failed_ticks += 1,
                Some(t) => latest = Some(t),
                None => {
                    // Worker stalled; stop the reading so the next one is accepted
                    sensor.stop();
                    failed_ticks += 1;
                    break;
                }
            }
        }

        match latest {
            Some(t) => info!("Temperature: {=f32} C ({=u8} failed)", t, failed_ticks),
            None => warn!("No temperature this period"),
        }
        if failed_ticks > 0 {
            note_dropped("blink", light.blink(&mut delay, config.error_blinks).await);
        }
    }
}
