//! Blocking delay abstraction

/// Blocking millisecond delay.
///
/// The calling context is suspended for at least `ms` milliseconds;
/// implementations are free to busy-wait. Injected wherever timed
/// sequencing is needed so tests can observe requested delays without
/// real wall-clock waits.
pub trait DelayMs {
    /// Block for at least `ms` milliseconds.
    fn delay_ms(&mut self, ms: u32);
}
