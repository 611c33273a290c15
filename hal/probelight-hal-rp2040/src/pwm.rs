//! PWM slice output
//!
//! One channel of an RP2040 PWM slice. The counter wraps at `top`, so the
//! duty range is `0..=top`. Stopping parks the compare value at zero (output
//! low) and disables the slice.

use embassy_rp::pwm::{Config, Pwm};
use probelight_hal::PwmOutput;

/// Slice channel driving the output pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PwmChannel {
    /// Even-numbered GPIO of the slice
    A,
    /// Odd-numbered GPIO of the slice
    B,
}

/// PWM output on one slice channel
pub struct SlicePwm<'d> {
    pwm: Pwm<'d>,
    config: Config,
    channel: PwmChannel,
    duty: u16,
    running: bool,
}

impl<'d> SlicePwm<'d> {
    /// Take over a configured slice; the output starts stopped
    pub fn new(pwm: Pwm<'d>, channel: PwmChannel, top: u16) -> Self {
        let mut config = Config::default();
        config.top = top;
        let mut out = Self {
            pwm,
            config,
            channel,
            duty: 0,
            running: false,
        };
        out.apply(0, false);
        out
    }

    fn apply(&mut self, compare: u16, enable: bool) {
        match self.channel {
            PwmChannel::A => self.config.compare_a = compare,
            PwmChannel::B => self.config.compare_b = compare,
        }
        self.config.enable = enable;
        self.pwm.set_config(&self.config);
    }
}

impl PwmOutput for SlicePwm<'_> {
    fn max_duty(&self) -> u16 {
        self.config.top
    }

    fn set_duty(&mut self, duty: u16) {
        self.duty = duty.min(self.config.top);
        if self.running {
            self.apply(self.duty, true);
        }
    }

    fn start(&mut self) {
        self.running = true;
        self.apply(self.duty, true);
    }

    fn stop(&mut self) {
        self.running = false;
        self.apply(0, false);
    }

    fn is_running(&self) -> bool {
        self.running
    }
}
