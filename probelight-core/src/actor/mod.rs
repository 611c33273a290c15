//! Per-device actor
//!
//! Each peripheral is owned by exactly one worker. Callers never touch the
//! hardware; they hand a request to the worker through a one-slot gate:
//!
//! ```text
//!  caller                        actor                        worker
//!  ──────                        ─────                        ──────
//!  enqueue(req) ──poll ≤10ms──▶  status: Ready ─CAS─▶ Busy
//!                                pending ◀── req
//!                                wake ──────────────────────▶ execute(req)
//!                                status ◀── Ready ─────────── done
//! ```
//!
//! The gate is a single compare-and-swap on the status word, so two callers
//! racing for a Ready actor cannot both succeed. A caller that cannot claim
//! the gate within the poll budget gives up silently: back-pressure is an
//! expected outcome, not an error.

mod cancel;
mod identity;

pub use cancel::CancelToken;
pub use identity::{bounded_name, Identity, MAX_NAME_LEN};

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::signal::Signal;
use embedded_hal_async::delay::DelayNs;
use portable_atomic::{AtomicU8, Ordering};

/// Number of status polls a caller makes before dropping its request
pub const ENQUEUE_POLLS: u8 = 10;

/// Spacing between status polls in milliseconds
pub const ENQUEUE_POLL_MS: u32 = 1;

const INITIALIZING: u8 = 0;
const READY: u8 = 1;
const BUSY: u8 = 2;

/// Worker status as seen by callers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Status {
    /// Worker has not started yet
    Initializing,
    /// Worker is idle and will accept a request
    Ready,
    /// A request is pending or executing
    Busy,
}

impl Status {
    fn from_raw(raw: u8) -> Self {
        match raw {
            READY => Status::Ready,
            BUSY => Status::Busy,
            _ => Status::Initializing,
        }
    }
}

/// Result of handing a request to an actor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Enqueue {
    /// The worker has been signaled with the request
    Accepted,
    /// The actor stayed busy for the whole poll budget; nothing was queued
    Dropped,
}

impl Enqueue {
    /// Check whether the request reached the worker
    pub fn is_accepted(self) -> bool {
        self == Enqueue::Accepted
    }
}

/// One kind of peripheral driven by an actor's worker
///
/// Implemented once per device kind for its request type `R`, the tagged
/// operation with its arguments and output slots. `execute` runs a single
/// request to completion; repeating requests poll `cancel` between units of
/// work.
#[allow(async_fn_in_trait)]
pub trait Device<R> {
    /// Execute one request
    async fn execute(&mut self, request: R, cancel: &CancelToken);
}

/// Request gate and worker bookkeeping for one peripheral
///
/// `M` selects the mutex flavour protecting the pending slot
/// (`CriticalSectionRawMutex` on the target). `R` is the device's request
/// type.
pub struct Actor<M: RawMutex, R> {
    identity: Identity,
    status: AtomicU8,
    pending: Signal<M, R>,
    cancel: CancelToken,
}

impl<M: RawMutex, R> Actor<M, R> {
    /// Create an actor in the `Initializing` state
    pub fn new(identity: Identity) -> Self {
        Self {
            identity,
            status: AtomicU8::new(INITIALIZING),
            pending: Signal::new(),
            cancel: CancelToken::new(),
        }
    }

    /// Name and address of the peripheral
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Current worker status
    pub fn status(&self) -> Status {
        Status::from_raw(self.status.load(Ordering::Acquire))
    }

    /// Check whether a request is waiting to be picked up by the worker
    pub fn has_pending(&self) -> bool {
        self.pending.signaled()
    }

    /// Hand a request to the worker
    ///
    /// Polls for `Ready` up to [`ENQUEUE_POLLS`] times, [`ENQUEUE_POLL_MS`]
    /// apart. On success the gate is claimed, the request stored and the
    /// worker woken in one step. Otherwise the request is dropped and the
    /// actor is left exactly as it was.
    pub async fn enqueue<D: DelayNs>(&self, delay: &mut D, request: R) -> Enqueue {
        let mut polls = 0;
        loop {
            if self
                .status
                .compare_exchange(READY, BUSY, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                self.cancel.reset();
                self.pending.signal(request);
                return Enqueue::Accepted;
            }

            if polls == ENQUEUE_POLLS {
                return Enqueue::Dropped;
            }
            polls += 1;
            delay.delay_ms(ENQUEUE_POLL_MS).await;
        }
    }

    /// Stop the repeating operation in flight, if any
    ///
    /// A no-op while Ready. While Busy, the current unit of work completes
    /// and the operation ends before the next one. A request that has been
    /// queued but not yet started sees the cancellation too.
    pub fn stop(&self) {
        if self.status() == Status::Busy {
            self.cancel.cancel();
        }
    }

    /// Open the gate for the first request
    ///
    /// Called by the worker before its first wait; [`run`](Self::run) does
    /// this itself.
    pub fn mark_ready(&self) {
        self.status.store(READY, Ordering::Release);
    }

    /// Wait for one request, execute it and reopen the gate
    pub async fn serve_one<D>(&self, device: &mut D)
    where
        D: Device<R>,
    {
        let request = self.pending.wait().await;
        device.execute(request, &self.cancel).await;
        self.status.store(READY, Ordering::Release);
    }

    /// Worker loop; never returns
    pub async fn run<D>(&self, device: &mut D) -> !
    where
        D: Device<R>,
    {
        self.mark_ready();
        loop {
            self.serve_one(device).await;
        }
    }
}
