//! Pin-command protocol for the Lychnos LED controller
//!
//! Commands arrive over a byte channel as one short text line:
//!
//! ```text
//! <pin>:<action>
//! ```
//!
//! where `<pin>` is a decimal integer and `<action>` is a word of at
//! most nine characters, e.g. `21:on`, `20:off`, `16:blink`. The
//! grammar accepts any word; deciding whether a word names a real
//! action is the dispatcher's job, so that an unknown action can be
//! reported by name instead of as a syntax error.
//!
//! Parsing never allocates and never panics, whatever bytes arrive.

#![no_std]
#![deny(unsafe_code)]

pub mod action;
pub mod command;

pub use action::Action;
pub use command::{parse_command, Command, ParseError, MAX_ACTION_LEN, MAX_INPUT};
