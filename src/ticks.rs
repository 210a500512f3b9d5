//! Wraparound-safe tick arithmetic.
//!
//! Animation timestamps are truncated to a 32-bit millisecond counter and
//! compared with wrapping subtraction, so timing gates stay correct across
//! counter overflow.

use embassy_time::Instant;

/// Truncate an instant to a 32-bit millisecond counter.
#[allow(clippy::cast_possible_truncation)]
pub fn millis(now: Instant) -> u32 {
    now.as_millis() as u32
}

/// Milliseconds elapsed between two counter values, wraparound-safe.
pub const fn elapsed_ms(now_ms: u32, earlier_ms: u32) -> u32 {
    now_ms.wrapping_sub(earlier_ms)
}
