//! Frame-gated pattern animation state.

use embassy_time::Instant;

use crate::config::MAX_PATTERN_ID;
use crate::generator::FlickerFn;
use crate::ticks;

/// Minimum time between accepted frames (~60 FPS).
const FRAME_MS: u32 = 16;

/// Classification of one update attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Frame {
    /// Inside the frame gate; nothing was computed.
    Skipped,
    /// Accepted frame with a fresh flicker brightness.
    Flicker(u8),
    /// Accepted frame on a pattern id beyond the flicker range; the
    /// channel renders its idle wash instead.
    Idle,
}

/// Pattern animation capability.
///
/// Owns the per-light animation state: brightness, previous pattern id,
/// step counter and the last accepted frame timestamp. Pattern selection
/// itself lives in the shared config.
#[derive(Debug)]
pub struct PatternAnimation {
    generator: FlickerFn,
    flicker_patterns: u8,
    brightness: u8,
    prev_pattern: u8,
    step: u8,
    last_frame_ms: u32,
}

impl PatternAnimation {
    /// Create animation state over a flicker generator.
    ///
    /// `flicker_patterns` is clamped to the wire id range (1..=127).
    pub fn new(generator: FlickerFn, flicker_patterns: u8) -> Self {
        Self {
            generator,
            flicker_patterns: flicker_patterns.clamp(1, MAX_PATTERN_ID),
            brightness: 0,
            prev_pattern: 0,
            step: 0,
            last_frame_ms: 0,
        }
    }

    pub fn setup(&mut self, now: Instant) {
        self.last_frame_ms = ticks::millis(now);
    }

    /// Number of patterns the flicker generator covers.
    pub const fn flicker_patterns(&self) -> u8 {
        self.flicker_patterns
    }

    /// Latest computed flicker brightness.
    pub const fn brightness(&self) -> u8 {
        self.brightness
    }

    /// Attempt one animation frame for the given pattern.
    pub fn tick(&mut self, now: Instant, pattern: u8) -> Frame {
        let now_ms = ticks::millis(now);
        let elapsed = ticks::elapsed_ms(now_ms, self.last_frame_ms);
        if elapsed < FRAME_MS {
            return Frame::Skipped;
        }
        self.last_frame_ms = now_ms;
        self.step = self.step.wrapping_add(1);

        if pattern < self.flicker_patterns {
            self.brightness = (self.generator)(elapsed, pattern, self.prev_pattern, self.step);
            self.prev_pattern = pattern;
            Frame::Flicker(self.brightness)
        } else {
            self.prev_pattern = pattern;
            Frame::Idle
        }
    }
}
