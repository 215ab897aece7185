//! BCM2837 free-running system timer
//!
//! The system timer counts at a fixed 1 MHz independent of the core
//! clock, which makes it the natural time base for blocking delays.
//! Only the lower 32 counter bits (`CLO`) are read; the wrap every
//! ~71.6 minutes is handled with wrapping arithmetic.

use lychnos_hal::DelayMs;
use portable_atomic::{AtomicBool, Ordering};

use crate::gpio::MapError;

/// Physical base address of the system timer block (BCM2837).
pub const SYSTIMER_BASE: usize = 0x3F00_3000;

/// Byte offset of the lower 32 bits of the free-running counter.
const CLO: usize = 0x04;

/// The counter runs at 1 MHz.
const TICKS_PER_MS: u32 = 1_000;

static TIMER_CLAIMED: AtomicBool = AtomicBool::new(false);

/// Handle to the free-running system timer counter.
///
/// Claimed at most once per process, like the GPIO window. Read-only
/// hardware access; the counter cannot be disturbed from here.
#[derive(Debug)]
pub struct SystemTimer {
    clo: *const u32,
}

impl SystemTimer {
    /// Claim the system timer at its fixed BCM2837 physical base.
    pub fn claim() -> Result<Self, MapError> {
        if TIMER_CLAIMED.swap(true, Ordering::AcqRel) {
            return Err(MapError::AlreadyMapped);
        }
        Ok(Self {
            clo: (SYSTIMER_BASE + CLO) as *const u32,
        })
    }

    /// Release the timer.
    pub fn release(self) {}

    /// Current counter value in microseconds, wrapping.
    fn ticks(&self) -> u32 {
        // SAFETY: the claim flag guarantees this is the only handle and
        // CLO is a read-only register inside the timer block.
        unsafe { self.clo.read_volatile() }
    }
}

impl Drop for SystemTimer {
    fn drop(&mut self) {
        TIMER_CLAIMED.store(false, Ordering::Release);
    }
}

impl DelayMs for SystemTimer {
    /// Busy-wait on the counter.
    ///
    /// Delays longer than `u32::MAX` microseconds (about 71 minutes)
    /// are clamped to that bound.
    fn delay_ms(&mut self, ms: u32) {
        let target = ms.saturating_mul(TICKS_PER_MS);
        let start = self.ticks();
        while self.ticks().wrapping_sub(start) < target {
            core::hint::spin_loop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Claim bookkeeping only; the counter itself needs real hardware.
    #[test]
    fn test_claim_is_exclusive() {
        let timer = SystemTimer::claim().unwrap();
        assert_eq!(SystemTimer::claim().unwrap_err(), MapError::AlreadyMapped);

        timer.release();
        assert!(SystemTimer::claim().is_ok());
    }
}
