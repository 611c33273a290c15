//! EEPROM memory guard
//!
//! The calibration offset and serial number live in a write-protected EEPROM
//! region. Before any access the region is driven into the required lock
//! state and must be idle:
//!
//! ```text
//!            ┌──────── read status ◀───────────────┐
//!            ▼                                     │
//!   idle && target state? ── yes ──▶ Ok            │
//!            │ no                                  │
//!   busy? ── no ──▶ write lock pattern             │
//!            │                                     │
//!   attempts > budget? ── yes ──▶ Timeout          │
//!            │ no                                  │
//!            └──── wait poll interval ─────────────┘
//! ```
//!
//! A transport failure ends the attempt at once and carries the last
//! observed busy/lock bits.

use embedded_hal_async::delay::DelayNs;
use probelight_core::config::{GuardPolicy, SensorProfile};
use probelight_core::device::{GuardCause, GuardFault, LockState};
use probelight_hal::I2cBus;

use super::register::RegisterLink;

/// Bring the EEPROM region into `target` and wait for it to be idle
pub async fn acquire<B: I2cBus, D: DelayNs>(
    link: &mut RegisterLink<B>,
    delay: &mut D,
    profile: &SensorProfile,
    policy: &GuardPolicy,
    target: LockState,
) -> Result<(), GuardFault> {
    // Nothing observed yet: assume the region is in the wrong state
    let mut busy = false;
    let mut wrong_lock = true;
    let mut attempts: u8 = 0;

    let pattern = match target {
        LockState::Locked => profile.lock_pattern,
        LockState::Unlocked => profile.unlock_pattern,
    };

    loop {
        let status = link.read(profile.unlock_reg).await.map_err(|e| GuardFault {
            cause: GuardCause::Transport(e),
            busy,
            wrong_lock,
        })?;

        busy = status & (1 << profile.busy_bit) != 0;
        let unlocked = status & (1 << profile.unlocked_bit) != 0;
        wrong_lock = match target {
            LockState::Locked => unlocked,
            LockState::Unlocked => !unlocked,
        };

        if !busy && !wrong_lock {
            return Ok(());
        }

        if !busy {
            link.write(profile.unlock_reg, pattern)
                .await
                .map_err(|e| GuardFault {
                    cause: GuardCause::Transport(e),
                    busy,
                    wrong_lock,
                })?;
        }

        attempts = attempts.saturating_add(1);
        if attempts > policy.max_attempts {
            warn!(
                "eeprom guard timed out (busy={=bool}, wrong_lock={=bool})",
                busy,
                wrong_lock
            );
            return Err(GuardFault {
                cause: GuardCause::Timeout,
                busy,
                wrong_lock,
            });
        }

        delay.delay_ms(policy.poll_interval_ms).await;
    }
}
