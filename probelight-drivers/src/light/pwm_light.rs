//! PWM-driven indicator light
//!
//! Brightness 0 stops the PWM output entirely instead of driving a zero duty
//! cycle. Blink and pulse repeat `count` times and check for cancellation
//! before every repeat, so a stop lets the current repeat finish.

use embedded_hal_async::delay::DelayNs;
use probelight_core::config::WaveformTiming;
use probelight_core::device::{LightRequest, MAX_BRIGHTNESS};
use probelight_core::{CancelToken, Device};
use probelight_hal::PwmOutput;

use super::waveform::{brightness_to_duty, pulse_ramp};

/// Indicator light on one PWM output
pub struct PwmLight<P, D> {
    pwm: P,
    delay: D,
    timing: WaveformTiming,
    brightness: u8,
}

impl<P: PwmOutput, D: DelayNs> PwmLight<P, D> {
    /// Create a light with default waveform timing; the output starts off
    pub fn new(pwm: P, delay: D) -> Self {
        Self::with_timing(pwm, delay, WaveformTiming::default())
    }

    /// Create a light with custom waveform timing
    pub fn with_timing(mut pwm: P, delay: D, timing: WaveformTiming) -> Self {
        pwm.stop();
        Self {
            pwm,
            delay,
            timing,
            brightness: 0,
        }
    }

    /// Current brightness percentage
    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    /// Get the PWM output back
    pub fn release(self) -> P {
        self.pwm
    }

    /// Set a steady brightness; 0 stops the output
    pub fn set_brightness(&mut self, brightness: u8) {
        let brightness = brightness.min(MAX_BRIGHTNESS);
        self.brightness = brightness;
        if brightness == 0 {
            self.pwm.stop();
            return;
        }
        let duty = brightness_to_duty(brightness, self.pwm.max_duty());
        self.pwm.set_duty(duty);
        if !self.pwm.is_running() {
            self.pwm.start();
        }
    }

    /// Full on, then off, half a period each, `count` times
    pub async fn blink(&mut self, count: u8, cancel: &CancelToken) {
        for _ in 0..count {
            if cancel.is_cancelled() {
                break;
            }
            self.set_brightness(MAX_BRIGHTNESS);
            self.delay.delay_ms(self.timing.blink_half_ms).await;
            self.set_brightness(0);
            self.delay.delay_ms(self.timing.blink_half_ms).await;
        }
    }

    /// Ramp 0 → 100 → 0 in 1 % steps, `count` times
    pub async fn pulse(&mut self, count: u8, cancel: &CancelToken) {
        for _ in 0..count {
            if cancel.is_cancelled() {
                break;
            }
            for step in pulse_ramp() {
                self.set_brightness(step);
                self.delay.delay_ms(self.timing.pulse_step_ms).await;
            }
        }
    }
}

impl<P: PwmOutput, D: DelayNs> Device<LightRequest> for PwmLight<P, D> {
    async fn execute(&mut self, request: LightRequest, cancel: &CancelToken) {
        match request {
            LightRequest::SetBrightness(brightness) => {
                self.set_brightness(brightness);
                debug!("brightness {=u8}%", self.brightness);
            }
            LightRequest::Blink(count) => self.blink(count, cancel).await,
            LightRequest::Pulse(count) => self.pulse(count, cancel).await,
        }
    }
}
