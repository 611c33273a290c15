//! Brightness mapping and waveform shapes

use probelight_core::device::MAX_BRIGHTNESS;

/// Map a brightness percentage onto the duty range
///
/// Linear, clamped to [`MAX_BRIGHTNESS`].
pub fn brightness_to_duty(brightness: u8, max_duty: u16) -> u16 {
    let brightness = brightness.min(MAX_BRIGHTNESS) as u32;
    (max_duty as u32 * brightness / MAX_BRIGHTNESS as u32) as u16
}

/// Brightness steps of one pulse: 0 up to 100, then back down to 0
pub fn pulse_ramp() -> impl Iterator<Item = u8> {
    (0..=MAX_BRIGHTNESS).chain((0..=MAX_BRIGHTNESS).rev())
}
