//! Command interpretation and the byte-channel contract.
//!
//! A [`LedController`] is the single owner of the pin controller, the
//! blink sequencer and the last-error text. Every command dispatch
//! runs under `&mut self`, so exactly one command is ever in flight.
//! That exclusive borrow is the serialization boundary for the whole
//! control surface. A host environment with concurrent channel writers
//! must put its own mutual exclusion around the controller; nothing
//! here yields mid-command, and a blink blocks the stream until it
//! finishes.
//!
//! Channel mapping:
//!
//! - device `write`  → [`LedController::write`]
//! - device `read`   → [`LedController::read_error`]
//! - device open/close → [`LedController::opened`] / [`LedController::closed`]
//! - module unload   → [`LedController::shutdown`]
//!
//! Protocol failures are recorded in the last-error text and never
//! surface through the channel return path; transfer faults between
//! the channel and its caller are the channel's own concern.

use heapless::Vec;
use lychnos_hal::{DelayMs, RegisterBus};
use lychnos_protocol::{parse_command, Action, MAX_INPUT};

use crate::blink::BlinkSequencer;
use crate::error::LastError;
use crate::gpio::{checked_pin, GpioController, GpioError};

/// Pins wired to the three status LEDs on the reference board.
pub const DEFAULT_LED_PINS: [u8; 3] = [21, 20, 16];

/// Duration of one `blink` command, milliseconds.
///
/// The grammar carries no duration argument, so every blink runs five
/// seconds. Making this configurable per command would change the
/// protocol surface.
pub const BLINK_DURATION_MS: u32 = 5_000;

/// Upper bound on LED pins configured at startup.
pub const MAX_LED_PINS: usize = 8;

/// The command interpreter and channel-facing control surface.
///
/// # Example
///
/// Wiring on real hardware (host tests use the simulated bank
/// instead):
///
/// ```ignore
/// use lychnos_core::{LedController, DEFAULT_LED_PINS};
/// use lychnos_hal_bcm2837::{GpioWindow, SystemTimer};
///
/// let window = GpioWindow::map()?;
/// let timer = SystemTimer::claim()?;
/// let mut controller = LedController::new(window, timer, &DEFAULT_LED_PINS)?;
///
/// controller.write(b"21:on");
///
/// let (window, timer) = controller.shutdown();
/// window.unmap();
/// timer.release();
/// ```
pub struct LedController<B, D> {
    gpio: GpioController<B>,
    blink: BlinkSequencer<D>,
    last_error: LastError,
    led_pins: Vec<u8, MAX_LED_PINS>,
}

impl<B: RegisterBus, D: DelayMs> LedController<B, D> {
    /// Build the controller and configure every pin in `led_pins` as
    /// an output.
    ///
    /// Fails if a listed pin is out of range; pins beyond
    /// [`MAX_LED_PINS`] are ignored.
    pub fn new(bus: B, delay: D, led_pins: &[u8]) -> Result<Self, GpioError> {
        let mut gpio = GpioController::new(bus);
        let mut pins = Vec::new();
        for &pin in led_pins.iter().take(MAX_LED_PINS) {
            gpio.set_output(pin)?;
            let _ = pins.push(pin);
        }

        #[cfg(feature = "defmt")]
        defmt::info!("led controller ready, {} pins configured", pins.len());

        Ok(Self {
            gpio,
            blink: BlinkSequencer::new(delay),
            last_error: LastError::new(),
            led_pins: pins,
        })
    }

    /// Channel write callback: consume one command line.
    ///
    /// At most [`MAX_INPUT`] bytes are looked at; the rest is dropped.
    /// Returns the number of bytes accepted. Failures are recorded in
    /// the last-error text and never propagate to the channel.
    pub fn write(&mut self, input: &[u8]) -> usize {
        let input = &input[..input.len().min(MAX_INPUT)];
        self.handle_input(input);
        input.len()
    }

    fn handle_input(&mut self, input: &[u8]) {
        // Writers that send a terminating NUL mean end-of-line by it
        let input = match input.iter().position(|&b| b == 0) {
            Some(nul) => &input[..nul],
            None => input,
        };

        // The protocol is text; undecodable bytes cannot match the
        // grammar either
        let Ok(text) = core::str::from_utf8(input) else {
            self.last_error.set(format_args!("Invalid input format"));
            return;
        };

        let command = match parse_command(text) {
            Ok(command) => command,
            Err(_) => {
                self.last_error.set(format_args!("Invalid input format"));
                return;
            }
        };

        let Some(action) = Action::from_token(command.action.as_str()) else {
            self.last_error
                .set(format_args!("Unknown action: {}", command.action.as_str()));
            return;
        };

        let pin = match checked_pin(command.pin) {
            Ok(pin) => pin,
            Err(GpioError::PinOutOfRange(pin)) => {
                self.last_error.set(format_args!("Pin out of range: {}", pin));
                return;
            }
        };

        let result = match action {
            Action::On => self.gpio.set(pin),
            Action::Off => self.gpio.clear(pin),
            Action::Blink => self.blink.run(&mut self.gpio, pin, BLINK_DURATION_MS),
        };

        if let Err(GpioError::PinOutOfRange(pin)) = result {
            self.last_error.set(format_args!("Pin out of range: {}", pin));
        }
    }

    /// Channel read callback: copy last-error text from `offset`.
    ///
    /// Returns the number of bytes copied; 0 at end of text (EOF).
    pub fn read_error(&self, offset: usize, buf: &mut [u8]) -> usize {
        self.last_error.read_at(offset, buf)
    }

    /// Current last-error text, for hosts that can hand out a str
    /// directly.
    pub fn last_error(&self) -> &str {
        self.last_error.as_str()
    }

    /// Channel open hook.
    pub fn opened(&self) {
        #[cfg(feature = "defmt")]
        defmt::info!("command channel opened");
    }

    /// Channel close hook.
    pub fn closed(&self) {
        #[cfg(feature = "defmt")]
        defmt::info!("command channel closed");
    }

    /// Shut down: drive every configured LED pin low, then hand the
    /// bus and delay provider back so the caller can unmap them.
    pub fn shutdown(mut self) -> (B, D) {
        for &pin in &self.led_pins {
            // Pins were validated in new()
            let _ = self.gpio.clear(pin);
        }

        #[cfg(feature = "defmt")]
        defmt::info!("led controller shut down, all leds off");

        (self.gpio.into_bus(), self.blink.into_delay())
    }
}
