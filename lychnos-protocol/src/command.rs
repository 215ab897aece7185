//! Command line parsing
//!
//! One line of text maps to one pin operation. The scanner mirrors how
//! a C-style `"%d:%9s"` conversion treats the line: optional leading
//! whitespace, a signed decimal pin number, a literal colon, optional
//! whitespace, then a word of at most [`MAX_ACTION_LEN`] bytes. Bytes
//! after the word (a trailing newline from `echo`, say) are ignored.

use heapless::String;

/// Maximum command line length in bytes. Longer input is truncated by
/// the channel before it reaches the parser.
pub const MAX_INPUT: usize = 255;

/// Maximum action token length in bytes. A longer word is cut at this
/// bound and the remainder ignored, so it surfaces as an unknown
/// action rather than a syntax error.
pub const MAX_ACTION_LEN: usize = 9;

/// Errors from parsing a command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Input does not match `<pin>:<action>`.
    InvalidFormat,
}

/// A parsed command line.
///
/// The pin is carried as the full signed integer the caller wrote;
/// checking it against the real pin range is the dispatcher's job, so
/// the out-of-range report can show the offending number.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Command {
    /// Pin number as written (possibly outside the hardware range)
    pub pin: i32,
    /// Action token, owned bounded copy
    pub action: String<MAX_ACTION_LEN>,
}

/// Parse one command line.
///
/// Returns [`ParseError::InvalidFormat`] when the line has no colon,
/// no parseable pin number, or no action word. Never panics, whatever
/// the input.
pub fn parse_command(input: &str) -> Result<Command, ParseError> {
    let bytes = input.as_bytes();
    let mut pos = 0;

    // Leading whitespace before the pin number is tolerated
    while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
        pos += 1;
    }

    let number_start = pos;
    if pos < bytes.len() && (bytes[pos] == b'+' || bytes[pos] == b'-') {
        pos += 1;
    }
    let digits_start = pos;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    if pos == digits_start {
        return Err(ParseError::InvalidFormat);
    }
    let pin: i32 = input[number_start..pos]
        .parse()
        .map_err(|_| ParseError::InvalidFormat)?;

    // The colon must follow the number immediately
    if bytes.get(pos) != Some(&b':') {
        return Err(ParseError::InvalidFormat);
    }
    pos += 1;

    // Whitespace between the colon and the word is tolerated
    while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
        pos += 1;
    }

    // The word runs to the next whitespace or end of input, capped at
    // MAX_ACTION_LEN bytes on a character boundary.
    let rest = &input[pos..];
    let mut word_end = 0;
    for (idx, ch) in rest.char_indices() {
        if ch.is_ascii_whitespace() || idx + ch.len_utf8() > MAX_ACTION_LEN {
            break;
        }
        word_end = idx + ch.len_utf8();
    }
    if word_end == 0 {
        return Err(ParseError::InvalidFormat);
    }

    let mut action = String::new();
    // Cannot overflow: word_end is capped at the string's capacity
    action
        .push_str(&rest[..word_end])
        .map_err(|_| ParseError::InvalidFormat)?;

    Ok(Command { pin, action })
}
