//! Timed on/off sequencing for a single pin.

use lychnos_hal::{DelayMs, RegisterBus};

use crate::gpio::{check_pin, GpioController, GpioError};

/// Phase timing for one blink cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BlinkTiming {
    /// Milliseconds the pin stays high per cycle.
    pub on_ms: u32,
    /// Milliseconds the pin stays low per cycle.
    pub off_ms: u32,
}

impl BlinkTiming {
    /// Full cycle period in milliseconds.
    pub const fn period_ms(self) -> u32 {
        self.on_ms + self.off_ms
    }
}

impl Default for BlinkTiming {
    /// 50 ms high, 50 ms low: a 100 ms period at 50% duty cycle.
    fn default() -> Self {
        Self {
            on_ms: 50,
            off_ms: 50,
        }
    }
}

/// Drives a square on/off waveform on one pin.
///
/// [`BlinkSequencer::run`] blocks its caller for the whole sequence;
/// there is no cancellation, so a command dispatcher calling in stays
/// unresponsive until the last cycle completes. That matches the
/// single-command-stream model this controller is built around.
pub struct BlinkSequencer<D> {
    delay: D,
    timing: BlinkTiming,
}

impl<D: DelayMs> BlinkSequencer<D> {
    pub fn new(delay: D) -> Self {
        Self::with_timing(delay, BlinkTiming::default())
    }

    pub fn with_timing(delay: D, timing: BlinkTiming) -> Self {
        Self { delay, timing }
    }

    /// Blink `pin` for `duration_ms`.
    ///
    /// Runs `duration_ms / period` complete set-wait-clear-wait
    /// cycles; a duration shorter than one period yields zero cycles
    /// and returns without touching the pin.
    pub fn run<B: RegisterBus>(
        &mut self,
        gpio: &mut GpioController<B>,
        pin: u8,
        duration_ms: u32,
    ) -> Result<(), GpioError> {
        check_pin(pin)?;

        let period = self.timing.period_ms();
        if period == 0 {
            return Ok(());
        }

        for _ in 0..duration_ms / period {
            gpio.set(pin)?;
            self.delay.delay_ms(self.timing.on_ms);
            gpio.clear(pin)?;
            self.delay.delay_ms(self.timing.off_ms);
        }
        Ok(())
    }

    /// Consume the sequencer and hand the delay provider back.
    pub fn into_delay(self) -> D {
        self.delay
    }

    /// Get access to the underlying delay provider.
    pub fn delay(&self) -> &D {
        &self.delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpio::{GPCLR0, GPSET0};
    use crate::testing::{SimBank, SimDelay};

    #[test]
    fn test_500ms_is_exactly_five_cycles() {
        let mut gpio = GpioController::new(SimBank::new());
        let mut blink = BlinkSequencer::new(SimDelay::new());

        blink.run(&mut gpio, 21, 500).unwrap();

        let bank = gpio.into_bus();
        assert_eq!(bank.write_count(), 10);
        for pair in bank.writes.chunks(2) {
            assert_eq!(pair[0], (GPSET0, 1 << 21));
            assert_eq!(pair[1], (GPCLR0, 1 << 21));
        }

        let delay = blink.into_delay();
        assert_eq!(delay.slept.len(), 10);
        assert!(delay.slept.iter().all(|&ms| ms == 50));
        assert_eq!(delay.total_ms(), 500);
    }

    #[test]
    fn test_sub_period_duration_is_a_no_op() {
        let mut gpio = GpioController::new(SimBank::new());
        let mut blink = BlinkSequencer::new(SimDelay::new());

        blink.run(&mut gpio, 21, 99).unwrap();
        blink.run(&mut gpio, 21, 0).unwrap();

        assert_eq!(gpio.into_bus().write_count(), 0);
        assert!(blink.into_delay().slept.is_empty());
    }

    #[test]
    fn test_partial_trailing_cycle_is_dropped() {
        let mut gpio = GpioController::new(SimBank::new());
        let mut blink = BlinkSequencer::new(SimDelay::new());

        // 250 ms fits two complete 100 ms cycles
        blink.run(&mut gpio, 16, 250).unwrap();

        assert_eq!(gpio.into_bus().write_count(), 4);
    }

    #[test]
    fn test_custom_timing() {
        let mut gpio = GpioController::new(SimBank::new());
        let timing = BlinkTiming {
            on_ms: 20,
            off_ms: 80,
        };
        let mut blink = BlinkSequencer::with_timing(SimDelay::new(), timing);

        blink.run(&mut gpio, 7, 300).unwrap();

        let delay = blink.into_delay();
        assert_eq!(delay.slept.len(), 6);
        assert_eq!(delay.slept[0], 20);
        assert_eq!(delay.slept[1], 80);
    }

    #[test]
    fn test_out_of_range_pin_is_rejected_up_front() {
        let mut gpio = GpioController::new(SimBank::new());
        let mut blink = BlinkSequencer::new(SimDelay::new());

        assert_eq!(
            blink.run(&mut gpio, 54, 500),
            Err(GpioError::PinOutOfRange(54))
        );
        assert_eq!(gpio.into_bus().write_count(), 0);
    }

    #[test]
    fn test_zero_period_timing_is_a_no_op() {
        let mut gpio = GpioController::new(SimBank::new());
        let timing = BlinkTiming {
            on_ms: 0,
            off_ms: 0,
        };
        let mut blink = BlinkSequencer::with_timing(SimDelay::new(), timing);

        blink.run(&mut gpio, 21, 5000).unwrap();
        assert_eq!(gpio.into_bus().write_count(), 0);
    }
}
