//! Shared test doubles for the HAL traits.

use heapless::Vec;
use lychnos_hal::{DelayMs, RegisterBus};

use crate::gpio::{GPCLR0, GPLEV0, GPSET0};

/// In-memory register bank standing in for the mapped GPIO window.
///
/// Mimics the write-1-to-set hardware: writes to the set and clear
/// banks fold into the level registers instead of being stored, so a
/// test can drive pins and then read their state back through the
/// level bank like real hardware. Every write is also recorded in
/// order for call-sequence assertions.
pub struct SimBank {
    /// Backing store, one slot per register in the window.
    pub regs: [u32; 44],
    /// `(byte_offset, value)` pairs in write order.
    pub writes: Vec<(usize, u32), 256>,
}

impl SimBank {
    pub fn new() -> Self {
        Self {
            regs: [0; 44],
            writes: Vec::new(),
        }
    }

    /// Number of writes recorded so far.
    pub fn write_count(&self) -> usize {
        self.writes.len()
    }
}

impl RegisterBus for SimBank {
    fn read_word(&self, byte_offset: usize) -> u32 {
        assert!(byte_offset % 4 == 0);
        self.regs[byte_offset / 4]
    }

    fn write_word(&mut self, byte_offset: usize, value: u32) {
        assert!(byte_offset % 4 == 0);
        self.writes.push((byte_offset, value)).unwrap();

        match byte_offset {
            o if o == GPSET0 || o == GPSET0 + 4 => {
                let level = GPLEV0 + (o - GPSET0);
                self.regs[level / 4] |= value;
            }
            o if o == GPCLR0 || o == GPCLR0 + 4 => {
                let level = GPLEV0 + (o - GPCLR0);
                self.regs[level / 4] &= !value;
            }
            o => self.regs[o / 4] = value,
        }
    }
}

/// Delay double that records every requested wait.
pub struct SimDelay {
    /// Requested delays in call order, milliseconds.
    pub slept: Vec<u32, 256>,
}

impl SimDelay {
    pub fn new() -> Self {
        Self { slept: Vec::new() }
    }

    /// Total time the sequence would have slept, milliseconds.
    pub fn total_ms(&self) -> u32 {
        self.slept.iter().sum()
    }
}

impl DelayMs for SimDelay {
    fn delay_ms(&mut self, ms: u32) {
        self.slept.push(ms).unwrap();
    }
}
