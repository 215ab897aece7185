//! BCM2837 GPIO pin control
//!
//! Register layout: six function-select registers packing ten pins at
//! three bits each, followed by paired set, clear and level banks of
//! 32 pins per register. Output levels are driven through the
//! dedicated set and clear banks: writing a 1 bit forces exactly that
//! pin high or low without touching its neighbours, so the output path
//! needs no read-modify-write. Function select does need one, which is
//! why the controller insists on being the single writer.
//!
//! Every operation validates the pin number before any offset
//! arithmetic; an out-of-range pin can never reach a register.

use lychnos_hal::RegisterBus;

/// Number of GPIO lines on the BCM2837 (pins 0 through 53).
pub const PIN_COUNT: u8 = 54;

// Register byte offsets within the GPIO window.
pub(crate) const GPFSEL0: usize = 0x00;
pub(crate) const GPSET0: usize = 0x1C;
pub(crate) const GPCLR0: usize = 0x28;
pub(crate) const GPLEV0: usize = 0x34;

/// Pins packed into one function-select register.
const PINS_PER_FSEL: u8 = 10;

/// Mask of one 3-bit function-select field.
const FSEL_MASK: u32 = 0b111;

/// GPIO pin function codes (3-bit function-select field values).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u32)]
pub enum Function {
    Input = 0b000,
    Output = 0b001,
    Alt0 = 0b100,
    Alt1 = 0b101,
    Alt2 = 0b110,
    Alt3 = 0b111,
    Alt4 = 0b011,
    Alt5 = 0b010,
}

/// Errors from pin operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GpioError {
    /// Pin number outside the hardware range.
    ///
    /// Carries the number as the caller gave it, which may be negative
    /// when it came straight from the command parser.
    PinOutOfRange(i32),
}

/// Validate a parsed pin number against the hardware range.
pub fn checked_pin(pin: i32) -> Result<u8, GpioError> {
    if (0..i32::from(PIN_COUNT)).contains(&pin) {
        Ok(pin as u8)
    } else {
        Err(GpioError::PinOutOfRange(pin))
    }
}

pub(crate) fn check_pin(pin: u8) -> Result<(), GpioError> {
    if pin < PIN_COUNT {
        Ok(())
    } else {
        Err(GpioError::PinOutOfRange(i32::from(pin)))
    }
}

/// Register-level pin controller.
///
/// Owns the register bus. All mutation goes through `&mut self`, which
/// keeps the function-select read-modify-write single-writer by
/// construction.
pub struct GpioController<B> {
    bus: B,
}

impl<B: RegisterBus> GpioController<B> {
    pub fn new(bus: B) -> Self {
        Self { bus }
    }

    /// Consume the controller and hand the bus back, e.g. to unmap it.
    pub fn into_bus(self) -> B {
        self.bus
    }

    /// Get access to the underlying bus.
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Select `function` for `pin`.
    ///
    /// Read-modify-write of the pin's 3-bit field; the other nine pins
    /// in the register keep their configuration. Idempotent for a
    /// fixed function.
    pub fn set_function(&mut self, pin: u8, function: Function) -> Result<(), GpioError> {
        check_pin(pin)?;
        let reg = GPFSEL0 + 4 * usize::from(pin / PINS_PER_FSEL);
        let shift = u32::from(pin % PINS_PER_FSEL) * 3;

        let mut value = self.bus.read_word(reg);
        value &= !(FSEL_MASK << shift);
        value |= (function as u32) << shift;
        self.bus.write_word(reg, value);
        Ok(())
    }

    /// Configure `pin` as a plain output.
    pub fn set_output(&mut self, pin: u8) -> Result<(), GpioError> {
        self.set_function(pin, Function::Output)
    }

    /// Drive `pin` high.
    ///
    /// A single write to the set bank; atomic as far as the bus is
    /// concerned and the other pins are untouched.
    pub fn set(&mut self, pin: u8) -> Result<(), GpioError> {
        check_pin(pin)?;
        let (reg, mask) = bank_bit(GPSET0, pin);
        self.bus.write_word(reg, mask);
        Ok(())
    }

    /// Drive `pin` low. Same semantics as [`GpioController::set`].
    pub fn clear(&mut self, pin: u8) -> Result<(), GpioError> {
        check_pin(pin)?;
        let (reg, mask) = bank_bit(GPCLR0, pin);
        self.bus.write_word(reg, mask);
        Ok(())
    }

    /// Read the current level of `pin` from the level bank.
    pub fn level(&self, pin: u8) -> Result<bool, GpioError> {
        check_pin(pin)?;
        let (reg, mask) = bank_bit(GPLEV0, pin);
        Ok(self.bus.read_word(reg) & mask != 0)
    }
}

/// Register offset and bit mask for `pin` within a two-register bank.
fn bank_bit(bank: usize, pin: u8) -> (usize, u32) {
    (bank + 4 * usize::from(pin / 32), 1 << (pin % 32))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::SimBank;

    #[test]
    fn test_set_then_clear_roundtrip() {
        let mut gpio = GpioController::new(SimBank::new());

        for pin in [0, 21, 31, 32, 40, 53] {
            gpio.set(pin).unwrap();
            assert!(gpio.level(pin).unwrap(), "pin {} should be high", pin);

            gpio.clear(pin).unwrap();
            assert!(!gpio.level(pin).unwrap(), "pin {} should be low", pin);
        }
    }

    #[test]
    fn test_set_does_not_disturb_other_pins() {
        let mut gpio = GpioController::new(SimBank::new());

        gpio.set(5).unwrap();
        gpio.set(6).unwrap();
        gpio.set(40).unwrap();
        gpio.clear(5).unwrap();

        assert!(!gpio.level(5).unwrap());
        assert!(gpio.level(6).unwrap());
        assert!(gpio.level(40).unwrap());
    }

    #[test]
    fn test_set_targets_the_right_bank() {
        let mut gpio = GpioController::new(SimBank::new());

        gpio.set(21).unwrap();
        gpio.set(40).unwrap();
        gpio.clear(40).unwrap();

        let writes = &gpio.into_bus().writes;
        assert_eq!(writes[0], (GPSET0, 1 << 21));
        assert_eq!(writes[1], (GPSET0 + 4, 1 << 8));
        assert_eq!(writes[2], (GPCLR0 + 4, 1 << 8));
    }

    #[test]
    fn test_set_function_field_math() {
        let mut gpio = GpioController::new(SimBank::new());

        // Pin 21 lives in GPFSEL2, field at bits 3..6
        gpio.set_output(21).unwrap();
        let bank = gpio.into_bus();
        assert_eq!(bank.regs[(GPFSEL0 + 8) / 4], 0b001 << 3);
    }

    #[test]
    fn test_set_function_is_idempotent() {
        let mut gpio = GpioController::new(SimBank::new());

        gpio.set_output(16).unwrap();
        let once = gpio.fsel_snapshot();
        gpio.set_output(16).unwrap();
        assert_eq!(gpio.fsel_snapshot(), once);
    }

    #[test]
    fn test_set_function_preserves_neighbours() {
        let mut gpio = GpioController::new(SimBank::new());

        gpio.set_function(20, Function::Alt3).unwrap();
        gpio.set_output(21).unwrap();

        let bank = gpio.into_bus();
        let reg = bank.regs[(GPFSEL0 + 8) / 4];
        assert_eq!(reg & FSEL_MASK, 0b111); // pin 20 still Alt3
        assert_eq!((reg >> 3) & FSEL_MASK, 0b001); // pin 21 now output
    }

    #[test]
    fn test_out_of_range_pin_is_rejected_before_any_write() {
        let mut gpio = GpioController::new(SimBank::new());

        assert_eq!(gpio.set(54), Err(GpioError::PinOutOfRange(54)));
        assert_eq!(gpio.clear(200), Err(GpioError::PinOutOfRange(200)));
        assert_eq!(gpio.set_output(54), Err(GpioError::PinOutOfRange(54)));
        assert_eq!(gpio.level(54), Err(GpioError::PinOutOfRange(54)));

        assert!(gpio.into_bus().writes.is_empty());
    }

    #[test]
    fn test_checked_pin() {
        assert_eq!(checked_pin(0), Ok(0));
        assert_eq!(checked_pin(53), Ok(53));
        assert_eq!(checked_pin(54), Err(GpioError::PinOutOfRange(54)));
        assert_eq!(checked_pin(-1), Err(GpioError::PinOutOfRange(-1)));
    }

    impl GpioController<SimBank> {
        /// Current contents of the six function-select registers.
        fn fsel_snapshot(&self) -> [u32; 6] {
            let mut snapshot = [0; 6];
            for (i, slot) in snapshot.iter_mut().enumerate() {
                *slot = self.bus.regs[(GPFSEL0 + 4 * i) / 4];
            }
            snapshot
        }
    }
}
