//! Lychnos Hardware Abstraction Layer
//!
//! This crate defines the two hardware-facing traits the LED controller
//! is written against. Register access and time both come in through
//! here, so the control logic in `lychnos-core` never touches a real
//! address and can run against simulated hardware in tests.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Command channel (external: chardev,    │
//! │  serial console, test harness)          │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  lychnos-core (pin control, blink,      │
//! │  command dispatch)                      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  lychnos-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ lychnos-hal-  │       │ simulated     │
//! │   bcm2837     │       │ bank (tests)  │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`bus::RegisterBus`] - 32-bit register window access
//! - [`delay::DelayMs`] - Blocking millisecond delay

#![no_std]
#![deny(unsafe_code)]

pub mod bus;
pub mod delay;

// Re-export key traits at crate root for convenience
pub use bus::RegisterBus;
pub use delay::DelayMs;
