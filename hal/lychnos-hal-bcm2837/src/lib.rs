//! BCM2837-specific HAL for the Lychnos LED controller
//!
//! Implements the `lychnos-hal` traits against the Raspberry Pi 3 SoC:
//! the GPIO register block for [`lychnos_hal::RegisterBus`] and the
//! free-running 1 MHz system timer for [`lychnos_hal::DelayMs`].
//!
//! Both peripherals are process-wide singletons. Each is claimed at
//! most once ([`GpioWindow::map`], [`SystemTimer::claim`]); a second
//! claim fails with [`MapError::AlreadyMapped`] instead of handing out
//! an aliasing handle.
//!
//! This is the only Lychnos crate containing `unsafe` code: the
//! volatile register accesses behind the claimed handles.

#![no_std]

pub mod gpio;
pub mod timer;

pub use gpio::{GpioWindow, MapError, GPIO_BASE, GPIO_WINDOW_LEN};
pub use timer::SystemTimer;
