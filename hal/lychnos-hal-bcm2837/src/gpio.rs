//! BCM2837 GPIO register window
//!
//! The GPIO block lives at physical `0x3F20_0000` on the Pi 2/3 and
//! spans `0xB0` bytes (function select through the pull-up/down clock
//! registers). The window is mapped exactly once per process lifetime
//! and unmapped exactly once at shutdown; ownership of the
//! [`GpioWindow`] handle is what makes register access legal.

use lychnos_hal::RegisterBus;
use portable_atomic::{AtomicBool, Ordering};

/// Physical base address of the GPIO register block (BCM2837, Pi 2/3).
pub const GPIO_BASE: usize = 0x3F20_0000;

/// Size of the register window in bytes.
pub const GPIO_WINDOW_LEN: usize = 0xB0;

/// One handle per process. Cleared again when the window is dropped.
static GPIO_CLAIMED: AtomicBool = AtomicBool::new(false);

/// Errors from claiming a memory-mapped peripheral.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MapError {
    /// The peripheral is already claimed elsewhere in this process.
    AlreadyMapped,
}

/// Exclusive handle to the memory-mapped GPIO register window.
///
/// At most one `GpioWindow` exists at any time. The handle is neither
/// `Send` nor `Sync`; whoever owns it is the single writer the
/// [`RegisterBus`] contract requires.
#[derive(Debug)]
pub struct GpioWindow {
    base: *mut u32,
}

impl GpioWindow {
    /// Claim the GPIO window at its fixed BCM2837 physical base.
    ///
    /// Fails with [`MapError::AlreadyMapped`] if a window is already
    /// live; no pin operation is safe without a successfully mapped
    /// window, so callers must treat this as fatal to startup.
    pub fn map() -> Result<Self, MapError> {
        // SAFETY: GPIO_BASE is the documented GPIO block address for
        // the BCM2837, identity-addressable in the environments this
        // crate targets (bare metal / kernel identity mapping).
        unsafe { Self::map_at(GPIO_BASE) }
    }

    /// Claim the GPIO window at a non-default base address.
    ///
    /// Escape hatch for the other BCM283x peripheral maps (Pi 1 at
    /// `0x2020_0000`, Pi 4 at `0xFE20_0000`).
    ///
    /// # Safety
    ///
    /// `base` must be the address of a BCM283x-compatible GPIO register
    /// block that is addressable in the current execution environment,
    /// and nothing outside the returned handle may touch that block
    /// while the handle is live.
    pub unsafe fn map_at(base: usize) -> Result<Self, MapError> {
        if GPIO_CLAIMED.swap(true, Ordering::AcqRel) {
            return Err(MapError::AlreadyMapped);
        }
        #[cfg(feature = "defmt")]
        defmt::info!("gpio window mapped at {=usize:x}", base);
        Ok(Self {
            base: base as *mut u32,
        })
    }

    /// Release the window.
    ///
    /// Consumes the handle, so no register access can follow. A later
    /// [`GpioWindow::map`] succeeds again.
    pub fn unmap(self) {}
}

impl Drop for GpioWindow {
    fn drop(&mut self) {
        GPIO_CLAIMED.store(false, Ordering::Release);
    }
}

impl RegisterBus for GpioWindow {
    fn read_word(&self, byte_offset: usize) -> u32 {
        debug_assert!(byte_offset % 4 == 0);
        debug_assert!(byte_offset < GPIO_WINDOW_LEN);
        // SAFETY: the claim flag guarantees this is the only handle and
        // the asserts keep the access inside the mapped block. Volatile
        // because the value is hardware state, not memory.
        unsafe { self.base.add(byte_offset / 4).read_volatile() }
    }

    fn write_word(&mut self, byte_offset: usize, value: u32) {
        debug_assert!(byte_offset % 4 == 0);
        debug_assert!(byte_offset < GPIO_WINDOW_LEN);
        // SAFETY: as in read_word.
        unsafe { self.base.add(byte_offset / 4).write_volatile(value) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test for the whole claim lifecycle: tests run in parallel
    // threads and the claim flag is process-wide.
    #[test]
    fn test_map_is_exclusive() {
        let window = GpioWindow::map().unwrap();
        assert_eq!(GpioWindow::map().unwrap_err(), MapError::AlreadyMapped);

        window.unmap();
        let again = GpioWindow::map().unwrap();
        drop(again);

        // Dropping releases the claim just like an explicit unmap
        assert!(GpioWindow::map().is_ok());
    }
}
