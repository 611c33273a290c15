//! PWM output abstractions
//!
//! A duty-cycle output that can be stopped entirely (output idles low) and
//! restarted, matching how indicator LEDs are driven.

/// Duty-cycle output channel
///
/// Implementations should handle the actual counter/compare configuration
/// for the specific chip.
pub trait PwmOutput {
    /// Duty value that corresponds to 100% on-time
    fn max_duty(&self) -> u16;

    /// Set the duty cycle (0..=max_duty)
    ///
    /// Takes effect immediately while running; otherwise applies on the next
    /// [`start`](PwmOutput::start).
    fn set_duty(&mut self, duty: u16);

    /// Begin driving the output
    fn start(&mut self);

    /// Stop the output (idle low)
    fn stop(&mut self);

    /// Check whether the output is currently being driven
    fn is_running(&self) -> bool;
}
