//! Indicator light requests and typed operations

use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal_async::delay::DelayNs;

use crate::actor::{Actor, Enqueue};

/// Brightness percentage that means full on; larger requests are clamped
pub const MAX_BRIGHTNESS: u8 = 100;

/// Light actor
pub type LightActor<M> = Actor<M, LightRequest>;

/// Operations the light worker understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LightRequest {
    /// Set a steady brightness (0 = off, clamped to 100)
    SetBrightness(u8),
    /// Alternate full/off, once per count
    Blink(u8),
    /// Ramp 0 → 100 → 0, once per count
    Pulse(u8),
}

impl<M: RawMutex> Actor<M, LightRequest> {
    /// Set a steady brightness percentage
    pub async fn write_value<D: DelayNs>(&self, delay: &mut D, brightness: u8) -> Enqueue {
        self.enqueue(delay, LightRequest::SetBrightness(brightness))
            .await
    }

    /// Blink `count` times; cancellable with [`stop`](Actor::stop)
    pub async fn blink<D: DelayNs>(&self, delay: &mut D, count: u8) -> Enqueue {
        self.enqueue(delay, LightRequest::Blink(count)).await
    }

    /// Pulse `count` times; cancellable with [`stop`](Actor::stop)
    pub async fn pulse<D: DelayNs>(&self, delay: &mut D, count: u8) -> Enqueue {
        self.enqueue(delay, LightRequest::Pulse(count)).await
    }
}
