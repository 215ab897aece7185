//! Last-error bookkeeping for the command channel.

use core::fmt::{self, Write};

use heapless::String;

/// Capacity of the stored error text in bytes.
pub const LAST_ERROR_CAPACITY: usize = 256;

/// Most recent human-readable failure description.
///
/// Empty at startup, overwritten on every parse or dispatch failure
/// and never cleared on success; a stale message persists until the
/// next failure overwrites it. Read back through the channel with EOF
/// semantics via [`LastError::read_at`].
#[derive(Debug, Default)]
pub struct LastError {
    text: String<LAST_ERROR_CAPACITY>,
}

impl LastError {
    pub const fn new() -> Self {
        Self {
            text: String::new(),
        }
    }

    /// Replace the stored text.
    ///
    /// Output beyond the capacity is dropped; the message is truncated
    /// on a character boundary, never rejected.
    pub fn set(&mut self, args: fmt::Arguments<'_>) {
        self.text.clear();
        let _ = Truncating(&mut self.text).write_fmt(args);
    }

    pub fn as_str(&self) -> &str {
        self.text.as_str()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Copy up to `buf.len()` bytes of the text starting at `offset`.
    ///
    /// Returns the number of bytes copied; 0 once `offset` reaches the
    /// end of the text. That is EOF, not an error.
    pub fn read_at(&self, offset: usize, buf: &mut [u8]) -> usize {
        let bytes = self.text.as_bytes();
        if offset >= bytes.len() {
            return 0;
        }
        let n = buf.len().min(bytes.len() - offset);
        buf[..n].copy_from_slice(&bytes[offset..offset + n]);
        n
    }
}

/// Formatter sink that fills the remaining capacity and silently drops
/// the rest, instead of failing the whole write like `heapless::String`
/// does on overflow.
struct Truncating<'a>(&'a mut String<LAST_ERROR_CAPACITY>);

impl Write for Truncating<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let room = LAST_ERROR_CAPACITY - self.0.len();
        if s.len() <= room {
            // Full chunk fits; capacity was just checked
            let _ = self.0.push_str(s);
        } else {
            let mut end = room;
            while !s.is_char_boundary(end) {
                end -= 1;
            }
            let _ = self.0.push_str(&s[..end]);
        }
        Ok(())
    }
}
