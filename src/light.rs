//! The per-channel light contract.

use embassy_time::Instant;

use crate::config::ConfigRecord;

/// Contract shared by every lighting channel.
///
/// Object-safe: the tick driver stores `&mut dyn Light` and polls each one
/// in sequence.
pub trait Light {
    /// One-time init. Drives the output to its rest state and seeds the
    /// animation timestamps. Call exactly once, before the first `update`.
    fn setup(&mut self, now: Instant);

    /// Advance the channel by one tick.
    ///
    /// Returns `true` iff any outwardly visible value changed. Safe to
    /// call at any frequency; channels rate-limit themselves.
    fn update(&mut self, now: Instant) -> bool;

    /// Switch to the next selectable pattern, wrapping to 0.
    fn next_pattern(&mut self);

    /// Currently selected pattern id.
    fn selected_pattern(&self) -> u8;

    /// Blocking acknowledgment sequence for configuration-mode entry.
    ///
    /// Runs its fixed choreography to completion; only call while the
    /// channel is otherwise idle. Animation state is left intact.
    fn pulse(&mut self);

    /// Copy the live configuration into a wire record.
    fn serialize(&self) -> ConfigRecord;

    /// Bulk-load configuration from a wire record.
    ///
    /// Touches configuration only, never animation state. The pattern id
    /// is wrapped to the channel's selectable range, and the config change
    /// flag is raised so the transport can resynchronize its observers.
    fn deserialize(&mut self, record: &ConfigRecord);
}
